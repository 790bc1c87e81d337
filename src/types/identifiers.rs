//! Identifier types for the checkpoint simulator
//!
//! Jobs, centers and random streams are addressed by small integer handles
//! assigned by their owners. Runs are tagged with a UUID so report folders
//! from different invocations never collide.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Identifier of a simulated passenger, assigned monotonically by a job factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JOB_{}", self.0)
    }
}

/// Identifier of a center within one network; it is the center's position in
/// the topology's fan-out order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CenterId(pub usize);

impl CenterId {
    /// Position of the center inside the model's center table
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CENTER_{}", self.0)
    }
}

/// Index of an independent random-number stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId(pub u32);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STREAM_{}", self.0)
    }
}

/// Unique identifier for one invocation of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN_{}", self.0.simple())
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("RUN_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("RUN_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(RunId(uuid))
    }
}

/// Display names of the centers of a network, used only when rendering
/// metric keys at the reporting boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterNames {
    names: BTreeMap<CenterId, String>,
}

impl CenterNames {
    /// Create an empty name table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the display name of a center
    pub fn insert(&mut self, id: CenterId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Name of a center, falling back to its numeric identifier
    pub fn name(&self, id: CenterId) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Iterate over `(id, name)` pairs in center order
    pub fn iter(&self) -> impl Iterator<Item = (CenterId, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of named centers
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no center has been named
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(CenterId, String)> for CenterNames {
    fn from_iter<I: IntoIterator<Item = (CenterId, String)>>(iter: I) -> Self {
        Self { names: iter.into_iter().collect() }
    }
}
