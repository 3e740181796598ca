pub mod cache;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

pub use cache::WitnessCache;

/// Entry from the remote witness directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Witness {
    /// Dropdown label, e.g. `jdoe (Acme Power)`.
    pub fn display_name(&self) -> String {
        if self.company.trim().is_empty() {
            self.username.clone()
        } else {
            format!("{} ({})", self.username, self.company)
        }
    }
}

/// Alert shown when two witness slots hold the same person.
pub const DUPLICATE_WITNESS_MESSAGE: &str = "Witness cannot be same";

/// True when no witness id appears in more than one slot. Empty slots are ignored.
pub fn witnesses_distinct(selected: &[Option<i64>]) -> bool {
    let mut seen = HashSet::new();
    selected.iter().flatten().all(|id| seen.insert(*id))
}
