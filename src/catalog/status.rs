use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectStatus {
    Operational,
    Degraded,
    Inactive,
    Stealth,
    Deorbited,
}

impl ObjectStatus {
    /// Statuses that survive every tick until the catalog is rebuilt.
    pub fn is_sticky(self) -> bool {
        matches!(self, ObjectStatus::Deorbited)
    }

    /// Whether a category may be pinned to this status.
    pub fn is_pinnable(self) -> bool {
        matches!(self, ObjectStatus::Inactive | ObjectStatus::Stealth)
    }
}

/// Result of one propagation attempt, as seen by the status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Propagated,
    NonPhysical,
    Fault,
}

/// Status transition table.
///
/// | current   | Propagated           | NonPhysical | Fault     |
/// |-----------|----------------------|-------------|-----------|
/// | Deorbited | Deorbited            | Deorbited   | Deorbited |
/// | other     | pinned / Operational | Deorbited   | Degraded  |
pub fn transition(current: ObjectStatus, pinned: Option<ObjectStatus>, outcome: Outcome) -> ObjectStatus {
    match (current, outcome) {
        (ObjectStatus::Deorbited, _) => ObjectStatus::Deorbited,
        (_, Outcome::NonPhysical) => ObjectStatus::Deorbited,
        (_, Outcome::Fault) => ObjectStatus::Degraded,
        (_, Outcome::Propagated) => pinned.unwrap_or(ObjectStatus::Operational),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ObjectStatus::*;

    const ALL: [ObjectStatus; 5] = [Operational, Degraded, Inactive, Stealth, Deorbited];

    #[test]
    fn deorbited_is_terminal() {
        for outcome in [Outcome::Propagated, Outcome::NonPhysical, Outcome::Fault] {
            assert_eq!(transition(Deorbited, None, outcome), Deorbited);
            assert_eq!(transition(Deorbited, Some(Stealth), outcome), Deorbited);
        }
    }

    #[test]
    fn degraded_recovers_on_success() {
        assert_eq!(transition(Degraded, None, Outcome::Propagated), Operational);
        assert_eq!(transition(Degraded, Some(Stealth), Outcome::Propagated), Stealth);
    }

    #[test]
    fn fault_degrades_everything_but_deorbited() {
        for status in ALL.into_iter().filter(|s| *s != Deorbited) {
            assert_eq!(transition(status, None, Outcome::Fault), Degraded);
        }
    }

    #[test]
    fn non_physical_always_deorbits() {
        for status in ALL {
            assert_eq!(transition(status, Some(Inactive), Outcome::NonPhysical), Deorbited);
        }
    }

    #[test]
    fn pinned_status_replaces_operational() {
        assert_eq!(transition(Operational, Some(Inactive), Outcome::Propagated), Inactive);
        assert_eq!(transition(Operational, None, Outcome::Propagated), Operational);
    }

    #[test]
    fn display_uses_upper_case() {
        assert_eq!(Deorbited.to_string(), "DEORBITED");
        assert!(Deorbited.is_sticky());
        assert!(!Degraded.is_sticky());
    }
}
