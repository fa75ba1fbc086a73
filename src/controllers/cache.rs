use chrono::{DateTime, Duration, Utc};

/// How long a fetched list is served without asking Reddit again.
pub fn cache_ttl() -> Duration {
    Duration::hours(1)
}

/// A value fetched from the API together with when it was fetched
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: Option<T>,
    last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            value: None,
            last_updated: None,
        }
    }
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value while `last_updated + 1h` is still after `now`.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&T> {
        match (&self.value, self.last_updated) {
            (Some(value), Some(updated)) if updated + cache_ttl() > now => Some(value),
            _ => None,
        }
    }

    pub fn store(&mut self, value: T, now: DateTime<Utc>) {
        self.value = Some(value);
        self.last_updated = Some(now);
    }

    pub fn invalidate(&mut self) {
        self.last_updated = None;
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_is_never_fresh() {
        let cache: Cached<Vec<u8>> = Cached::new();
        assert!(cache.fresh(Utc::now()).is_none());
        assert!(cache.last_updated().is_none());
    }

    #[test]
    fn value_expires_after_one_hour() {
        let stored_at = Utc::now();
        let mut cache = Cached::new();
        cache.store(vec![1, 2, 3], stored_at);

        let almost = stored_at + Duration::minutes(59);
        assert_eq!(cache.fresh(almost), Some(&vec![1, 2, 3]));
        assert!(cache.fresh(stored_at + Duration::hours(1)).is_none());
        assert!(cache.fresh(stored_at + Duration::hours(2)).is_none());
    }

    #[test]
    fn invalidate_forces_a_refetch() {
        let now = Utc::now();
        let mut cache = Cached::new();
        cache.store("sidebar", now);
        cache.invalidate();
        assert!(cache.fresh(now).is_none());
    }
}
