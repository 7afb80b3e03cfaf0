use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Timestamps of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    /// Birth time, when the platform reports one
    pub created: Option<SystemTime>,
    /// Last modification time
    pub modified: SystemTime,
    /// Size in bytes
    pub len: u64,
}

/// Length of `days` as a [`Duration`].
pub(crate) fn threshold_duration(days: u32) -> Duration {
    Duration::from_secs(days as u64 * SECONDS_PER_DAY)
}

/// Time elapsed between `then` and `now`. Timestamps in the future count as
/// zero.
pub(crate) fn elapsed_since(now: SystemTime, then: SystemTime) -> Duration {
    now.duration_since(then).unwrap_or(Duration::ZERO)
}

/// Whether a file with these timestamps is old enough to delete.
///
/// Both the creation and the modification time must be at least `threshold`
/// old; a file is too young as soon as either elapsed time is strictly less
/// than the threshold. A missing creation time does not block deletion.
pub fn is_expired(times: &FileTimes, threshold: Duration, now: SystemTime) -> bool {
    if elapsed_since(now, times.modified) < threshold {
        return false;
    }

    match times.created {
        Some(created) => elapsed_since(now, created) >= threshold,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_ago(now: SystemTime, days: u64) -> SystemTime {
        now - Duration::from_secs(days * SECONDS_PER_DAY)
    }

    fn times(now: SystemTime, created_days: u64, modified_days: u64) -> FileTimes {
        FileTimes {
            created: Some(days_ago(now, created_days)),
            modified: days_ago(now, modified_days),
            len: 0,
        }
    }

    #[test]
    fn test_both_timestamps_old_enough() {
        let now = SystemTime::now();
        assert!(is_expired(&times(now, 10, 10), threshold_duration(7), now));
    }

    #[test]
    fn test_recent_write_keeps_file() {
        let now = SystemTime::now();
        assert!(!is_expired(&times(now, 10, 3), threshold_duration(7), now));
    }

    #[test]
    fn test_recent_creation_keeps_file() {
        let now = SystemTime::now();
        assert!(!is_expired(&times(now, 3, 10), threshold_duration(7), now));
    }

    #[test]
    fn test_exact_threshold_is_expired() {
        let now = SystemTime::now();
        assert!(is_expired(&times(now, 7, 7), threshold_duration(7), now));

        let just_under = FileTimes {
            created: Some(days_ago(now, 7) + Duration::from_secs(1)),
            modified: days_ago(now, 7),
            len: 0,
        };
        assert!(!is_expired(&just_under, threshold_duration(7), now));
    }

    #[test]
    fn test_missing_creation_time_uses_modification_only() {
        let now = SystemTime::now();
        let old = FileTimes {
            created: None,
            modified: days_ago(now, 8),
            len: 0,
        };
        let young = FileTimes {
            created: None,
            modified: days_ago(now, 1),
            len: 0,
        };
        assert!(is_expired(&old, threshold_duration(7), now));
        assert!(!is_expired(&young, threshold_duration(7), now));
    }

    #[test]
    fn test_future_timestamps_count_as_new() {
        let now = SystemTime::now();
        let future = FileTimes {
            created: Some(now + Duration::from_secs(3600)),
            modified: now + Duration::from_secs(3600),
            len: 0,
        };
        assert!(!is_expired(&future, threshold_duration(1), now));
        // A zero threshold still expires it: zero elapsed is not below zero.
        assert!(is_expired(&future, threshold_duration(0), now));
    }
}
