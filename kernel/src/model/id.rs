use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn raw(self) -> Uuid {
        self.0
    }

    /// Short code quoted to requesters: `#` plus the last eight hex digits, uppercased.
    pub fn reference_code(&self) -> String {
        let simple = self.0.simple().to_string();
        format!("#{}", simple[simple.len() - 8..].to_uppercase())
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReservationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ReservationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_code_uses_trailing_digits() {
        let id: ReservationId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.reference_code(), "#0E5FE0C8");
    }
}
