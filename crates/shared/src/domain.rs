use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);

/// One profile as returned by the random-user directory, consumed as-is.
///
/// Only the fields the roster renders are modeled; everything else the API
/// sends is carried unmodified in `extra`. Ids are unique within one fetched
/// batch but not across batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// First letter of the first and last name, uppercased. Empty name parts
    /// contribute nothing.
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for name in [&self.first_name, &self.last_name] {
            if let Some(first) = name.chars().next() {
                initials.extend(first.to_uppercase());
            }
        }
        initials
    }
}
