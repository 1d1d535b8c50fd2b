use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identity of a deployed component; used as the source of the events it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ComponentId {
    pub kind: &'static str,
    pub id: Uuid,
}

impl ComponentId {
    pub fn new(kind: &'static str) -> Self { Self { kind, id: Uuid::new_v4() } }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.kind, self.id) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub Uuid);

impl PoolId {
    pub fn new() -> Self { PoolId(Uuid::new_v4()) }
}

impl Default for PoolId {
    fn default() -> Self { Self::new() }
}

impl Display for PoolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "pool:{}", self.0) }
}

/// Liquidity asset identifier (token address or symbol); opaque like `Principal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl From<&str> for AssetId {
    fn from(s: &str) -> Self { AssetId(s.to_string()) }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

/// Handle returned by an external controller factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerHandle {
    pub kind: String,
    pub id: Uuid,
}

impl ControllerHandle {
    pub fn new<S: Into<String>>(kind: S) -> Self { Self { kind: kind.into(), id: Uuid::new_v4() } }
}
