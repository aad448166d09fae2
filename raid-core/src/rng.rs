//! Injectable randomness: deterministic per-run streams and draw helpers.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::participant::ParticipantId;

/// Simulation domain a random stream is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamDomain {
    /// Per-participant overall effectiveness roll.
    Effectiveness,
    /// Per-participant stage failures and point draws.
    Stages,
    /// Team trip duration variation and wipe truncation.
    Duration,
    /// Team jackpot trial and flawless bonus.
    TeamLoot,
    /// Per-participant unique, filler, pity and pet rolls.
    ParticipantLoot,
}

impl StreamDomain {
    const fn tag(self) -> &'static [u8] {
        match self {
            Self::Effectiveness => b"effectiveness",
            Self::Stages => b"stages",
            Self::Duration => b"duration",
            Self::TeamLoot => b"team-loot",
            Self::ParticipantLoot => b"participant-loot",
        }
    }
}

/// Source of the random streams used by one encounter run.
///
/// Each call hands out an independent stream so that one participant's
/// draws never shift another's.
pub trait RngProvider {
    type Stream: RngCore;

    /// Stream shared by the whole team.
    fn team_stream(&mut self, domain: StreamDomain) -> Self::Stream;

    /// Stream owned by one participant.
    fn participant_stream(&mut self, domain: StreamDomain, id: &ParticipantId) -> Self::Stream;
}

/// Deterministic provider: the same nonce and ids reproduce the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRngProvider {
    run_nonce: u64,
}

impl SeededRngProvider {
    #[must_use]
    pub const fn new(run_nonce: u64) -> Self {
        Self { run_nonce }
    }

    #[must_use]
    pub const fn run_nonce(&self) -> u64 {
        self.run_nonce
    }
}

impl RngProvider for SeededRngProvider {
    type Stream = CountingRng<SmallRng>;

    fn team_stream(&mut self, domain: StreamDomain) -> Self::Stream {
        CountingRng::new(derive_stream_seed(self.run_nonce, &[domain.tag()]))
    }

    fn participant_stream(&mut self, domain: StreamDomain, id: &ParticipantId) -> Self::Stream {
        CountingRng::new(derive_stream_seed(
            self.run_nonce,
            &[domain.tag(), b":", id.as_str().as_bytes()],
        ))
    }
}

/// Non-deterministic provider for production runs.
#[derive(Debug)]
pub struct EntropyRngProvider {
    root: ChaCha20Rng,
}

impl EntropyRngProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ChaCha20Rng::from_entropy(),
        }
    }
}

impl Default for EntropyRngProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RngProvider for EntropyRngProvider {
    type Stream = ChaCha20Rng;

    fn team_stream(&mut self, _domain: StreamDomain) -> Self::Stream {
        ChaCha20Rng::seed_from_u64(self.root.next_u64())
    }

    fn participant_stream(&mut self, _domain: StreamDomain, _id: &ParticipantId) -> Self::Stream {
        ChaCha20Rng::seed_from_u64(self.root.next_u64())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(run_nonce: u64, parts: &[&[u8]]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&run_nonce.to_le_bytes()) else {
        return run_nonce;
    };
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Bernoulli trial succeeding with `percent`% probability.
pub fn percent_chance<R: Rng + ?Sized>(rng: &mut R, percent: f64) -> bool {
    if percent <= 0.0 {
        return false;
    }
    rng.r#gen::<f64>() * 100.0 < percent
}

/// Bernoulli trial succeeding one time in `n`.
pub fn one_in<R: Rng + ?Sized>(rng: &mut R, n: u32) -> bool {
    n > 0 && rng.gen_range(0..n) == 0
}

/// Randomly vary `value` by up to `percent`% in either direction.
pub fn apply_variation<R: Rng + ?Sized>(rng: &mut R, value: f64, percent: f64) -> f64 {
    if percent <= 0.0 {
        return value;
    }
    let swing = rng.gen_range(-percent..=percent);
    value * (1.0 + swing / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streams_are_reproducible_and_independent() {
        let id = ParticipantId::new("alpha");
        let mut first = SeededRngProvider::new(42);
        let mut second = SeededRngProvider::new(42);
        let a = first.participant_stream(StreamDomain::Stages, &id).next_u64();
        let b = second.participant_stream(StreamDomain::Stages, &id).next_u64();
        assert_eq!(a, b);

        let other = first
            .participant_stream(StreamDomain::Stages, &ParticipantId::new("beta"))
            .next_u64();
        let other_domain = first
            .participant_stream(StreamDomain::ParticipantLoot, &id)
            .next_u64();
        assert_ne!(a, other);
        assert_ne!(a, other_domain);
        assert_ne!(
            SeededRngProvider::new(43)
                .participant_stream(StreamDomain::Stages, &id)
                .next_u64(),
            a
        );
    }

    #[test]
    fn counting_rng_tracks_draws() {
        let mut stream = SeededRngProvider::new(1).team_stream(StreamDomain::Duration);
        assert_eq!(stream.draws(), 0);
        let _ = stream.next_u32();
        let _ = stream.next_u64();
        assert_eq!(stream.draws(), 2);
    }

    #[test]
    fn chance_helpers_respect_bounds() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert!(!percent_chance(&mut rng, 0.0));
        assert!(percent_chance(&mut rng, 100.0));
        assert!(!one_in(&mut rng, 0));
        assert!(one_in(&mut rng, 1));
        for _ in 0..200 {
            let varied = apply_variation(&mut rng, 1_000.0, 5.0);
            assert!((950.0..=1_050.0).contains(&varied));
        }
        assert!((apply_variation(&mut rng, 10.0, 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_provider_hands_out_streams() {
        let mut provider = EntropyRngProvider::new();
        let mut stream = provider.team_stream(StreamDomain::TeamLoot);
        let _ = stream.next_u64();
    }
}
