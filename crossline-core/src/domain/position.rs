use serde::{Deserialize, Serialize};

/// Net position as reported by the host at decision time.
///
/// The host is the single source of truth. The core never caches or mutates a
/// snapshot; one is passed in for every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Signed quantity: positive = long, negative = short, zero = flat.
    pub quantity: i64,
}

impl PositionSnapshot {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn new(quantity: i64) -> Self {
        Self { quantity }
    }

    pub fn state(&self) -> PositionState {
        PositionState::from_quantity(self.quantity)
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }
}

/// Position state derived from the sign of the snapshot quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn from_quantity(quantity: i64) -> Self {
        match quantity {
            q if q > 0 => PositionState::Long,
            q if q < 0 => PositionState::Short,
            _ => PositionState::Flat,
        }
    }
}

impl std::fmt::Display for PositionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionState::Flat => write!(f, "Flat"),
            PositionState::Long => write!(f, "Long"),
            PositionState::Short => write!(f, "Short"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_quantity_sign() {
        assert_eq!(PositionSnapshot::new(3).state(), PositionState::Long);
        assert_eq!(PositionSnapshot::new(-1).state(), PositionState::Short);
        assert_eq!(PositionSnapshot::flat().state(), PositionState::Flat);
    }

    #[test]
    fn predicates() {
        let long = PositionSnapshot::new(1);
        assert!(long.is_long() && !long.is_short() && !long.is_flat());
        let short = PositionSnapshot::new(-2);
        assert!(short.is_short() && !short.is_long());
        assert!(PositionSnapshot::flat().is_flat());
    }

    #[test]
    fn snapshot_carries_only_the_signed_quantity() {
        let json = serde_json::to_string(&PositionSnapshot::new(-2)).unwrap();
        assert_eq!(json, r#"{"quantity":-2}"#);
        let back: PositionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PositionSnapshot::new(-2));
    }
}
