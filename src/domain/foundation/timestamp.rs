use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A UTC instant. Serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self > other
    }

    /// Shifts by whole days; negative values go back in time.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Payment processor payloads carry epoch seconds. `None` when the value
    /// cannot be represented.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_seconds_round_trip_through_period_end() {
        // 2024-01-15T00:00:00Z
        let period_end = Timestamp::from_unix_secs(1_705_276_800).unwrap();
        assert_eq!(
            period_end.as_datetime().to_rfc3339(),
            "2024-01-15T00:00:00+00:00"
        );
        assert_eq!(period_end.as_unix_secs(), 1_705_276_800);
        assert!(Timestamp::from_unix_secs(i64::MAX).is_none());
    }

    #[test]
    fn add_days_orders_both_ways() {
        let now = Timestamp::now();
        assert!(now.add_days(30).is_after(&now));
        assert!(!now.add_days(-1).is_after(&now));
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let ts = Timestamp::from_unix_secs(1_705_276_800).unwrap();
        let json = serde_json::to_value(ts).unwrap();
        assert!(json.as_str().unwrap().starts_with("2024-01-15T00:00:00"));
    }
}
