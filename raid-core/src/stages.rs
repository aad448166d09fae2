//! The fixed sequence of encounter stages.
use serde::Serialize;

/// One room of the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: u8,
    pub name: &'static str,
    /// Relative share of the trip duration spent in this stage.
    pub time_weight: u32,
    pub difficulty: u8,
}

pub const STAGES: [Stage; 5] = [
    Stage {
        id: 1,
        name: "Akkha",
        time_weight: 1,
        difficulty: 1,
    },
    Stage {
        id: 2,
        name: "Ba-Ba",
        time_weight: 1,
        difficulty: 1,
    },
    Stage {
        id: 3,
        name: "Kephri",
        time_weight: 1,
        difficulty: 1,
    },
    Stage {
        id: 4,
        name: "Zebak",
        time_weight: 1,
        difficulty: 1,
    },
    Stage {
        id: 5,
        name: "Warden",
        time_weight: 2,
        difficulty: 3,
    },
];

#[must_use]
pub fn stage_by_id(id: u8) -> Option<&'static Stage> {
    STAGES.iter().find(|stage| stage.id == id)
}

#[must_use]
pub fn total_time_weight() -> u32 {
    STAGES.iter().map(|stage| stage.time_weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_stage_weighs_double() {
        assert_eq!(STAGES.len(), 5);
        assert_eq!(total_time_weight(), 6);
        assert_eq!(stage_by_id(5).map(|stage| stage.time_weight), Some(2));
        assert!(stage_by_id(0).is_none());
        assert!(STAGES.windows(2).all(|pair| pair[0].id < pair[1].id));
    }
}
