use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::Witness;

const DEFAULT_TTL_SECS: u64 = 300;

/// Witness lists per work site, kept briefly so re-rendering a rejected form
/// does not hit the directory again.
#[derive(Clone)]
pub struct WitnessCache {
    entries: Arc<Mutex<HashMap<String, (Instant, Vec<Witness>)>>>,
    ttl: Duration,
}

impl Default for WitnessCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl WitnessCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Cached list for the site, if still fresh. Stale entries are dropped on lookup.
    pub fn get(&self, work_site_id: &str) -> Option<Vec<Witness>> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match map.get(work_site_id) {
            Some((stored, list)) if stored.elapsed() < self.ttl => Some(list.clone()),
            Some(_) => {
                map.remove(work_site_id);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, work_site_id: &str, witnesses: Vec<Witness>) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(work_site_id.to_string(), (Instant::now(), witnesses));
    }
}
