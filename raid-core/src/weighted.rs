//! Weighted random selection shared by the loot tables and recipient picks.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pick an index with probability proportional to its weight.
///
/// Zero-weight entries are never chosen. Returns `None` when the weights
/// sum to zero.
pub fn pick_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().map(|weight| u64::from(*weight)).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for (idx, weight) in weights.iter().enumerate() {
        let weight = u64::from(*weight);
        if weight == 0 {
            continue;
        }
        if roll < weight {
            return Some(idx);
        }
        roll -= weight;
    }
    None
}

/// Pick one of `entries` by weight, returning a reference to its key.
pub fn pick_by_weight<'a, K, R>(entries: &'a [(K, u32)], rng: &mut R) -> Option<&'a K>
where
    R: Rng + ?Sized,
{
    let weights: Vec<u32> = entries.iter().map(|(_, weight)| *weight).collect();
    pick_index(&weights, rng).and_then(|idx| entries.get(idx).map(|(key, _)| key))
}

/// One row of a [`WeightedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    pub value: T,
    pub weight: u32,
}

/// Ordered table of weighted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedTable<T> {
    entries: Vec<WeightedEntry<T>>,
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> WeightedTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, value: T, weight: u32) -> Self {
        self.push(value, weight);
        self
    }

    pub fn push(&mut self, value: T, weight: u32) {
        self.entries.push(WeightedEntry { value, weight });
    }

    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.weight)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &WeightedEntry<T>> {
        self.entries.iter()
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let weights: Vec<u32> = self.entries.iter().map(|entry| entry.weight).collect();
        pick_index(&weights, rng).and_then(|idx| self.entries.get(idx).map(|entry| &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn zero_weights_are_never_picked() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let pick = pick_index(&[0, 5, 0, 1], &mut rng);
            assert!(matches!(pick, Some(1 | 3)));
        }
        assert_eq!(pick_index(&[0, 0], &mut rng), None);
        assert_eq!(pick_index(&[], &mut rng), None);
    }

    #[test]
    fn pick_by_weight_follows_weights() {
        let mut rng = SmallRng::seed_from_u64(11);
        let entries = [("heavy", 9_u32), ("light", 1_u32)];
        let heavy = (0..2_000)
            .filter(|_| pick_by_weight(&entries, &mut rng) == Some(&"heavy"))
            .count();
        assert!((1_700..=1_900).contains(&heavy), "heavy picked {heavy} times");
    }

    #[test]
    fn table_rolls_only_its_values() {
        let table = WeightedTable::new().with("a", 1).with("b", 2);
        assert_eq!(table.total_weight(), 3);
        assert_eq!(table.len(), 2);
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..50 {
            assert!(matches!(table.roll(&mut rng), Some(&"a" | &"b")));
        }
        assert_eq!(WeightedTable::<u8>::new().roll(&mut rng), None);
    }
}
