use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// Monthly scan allowance for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub limit: u32,
    pub used: u64,
    pub remaining: u64,
}

impl QuotaStatus {
    pub fn new(limit: u32, used: u64) -> Self {
        Self { limit, used, remaining: u64::from(limit).saturating_sub(used) }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Midnight UTC on the first day of `now`'s calendar month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(QuotaStatus::new(5, 2).remaining, 3);
        assert_eq!(QuotaStatus::new(5, 7).remaining, 0);
        assert!(QuotaStatus::new(5, 5).is_exhausted());
    }

    #[test]
    fn test_month_start() {
        let now = Utc.with_ymd_and_hms(2026, 3, 17, 14, 5, 9).unwrap();
        assert_eq!(month_start(now), Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }
}
