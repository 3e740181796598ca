use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Server-side stand-in for a disabled submit button: at most one outstanding
/// request per key. Keys combine the session and the form or report acted on.
#[derive(Clone, Default)]
pub struct SubmitGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Held while a request is outstanding; releases the key when dropped.
pub struct SubmitTicket {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`. Returns None if a request under that key is still running.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<SubmitTicket> {
        let key = key.into();
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key.clone()) {
            return None;
        }
        Some(SubmitTicket {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.key);
    }
}
