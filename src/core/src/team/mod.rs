use serde::{Deserialize, Serialize};

/// Roster entry supplied by the match/roster provider for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub short_name: Option<String>,
}

impl Team {
    pub fn new(id: u32, name: &str) -> Self {
        Team {
            id,
            name: String::from(name),
            short_name: None,
        }
    }

    pub fn with_short_name(mut self, short_name: &str) -> Self {
        self.short_name = Some(String::from(short_name));
        self
    }
}
