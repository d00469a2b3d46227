//! Identity and timestamps shared by every entity.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Current UTC time at microsecond precision, the resolution of `TIMESTAMPTZ`.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BaseFields {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BaseFields {
    /// Fresh identity: UUID v4 id, both timestamps set to now.
    pub fn generate() -> Self {
        let ts = now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    /// Advance `updated_at`. Always moves forward, even when the clock has not
    /// ticked since the last touch.
    pub fn touch(&mut self) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = now().max(floor);
    }
}

impl Default for BaseFields {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = BaseFields::generate();
        let b = BaseFields::generate();
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn touch_is_strictly_monotonic() {
        let mut base = BaseFields::generate();
        let mut last = base.updated_at;
        for _ in 0..100 {
            base.touch();
            assert!(base.updated_at > last);
            last = base.updated_at;
        }
        assert!(base.created_at < base.updated_at);
    }

    #[test]
    fn touch_keeps_microsecond_precision() {
        let mut base = BaseFields::generate();
        base.touch();
        assert_eq!(base.updated_at.timestamp_subsec_nanos() % 1_000, 0);
    }
}
