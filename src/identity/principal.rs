use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identity of a caller or of the subject of an authorization decision.
/// Only equality is interpreted; the inner string is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new<S: Into<String>>(id: S) -> Self { Principal(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self { Principal(s.to_string()) }
}

impl From<String> for Principal {
    fn from(s: String) -> Self { Principal(s) }
}
