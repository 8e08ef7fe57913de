//! Identifiers for simulation entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable handle for a process in the simulation arena
///
/// Handles are plain indices into the process table. They are assigned in
/// creation order and never reused within a run, so index order is also
/// arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(usize);

impl ProcessId {
    /// Creates a process ID from an arena index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ProcessId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process({})", self.0)
    }
}

/// Unique identifier for one simulation run
///
/// Comparison runs share an input but each gets its own run ID so their
/// results can be told apart once exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_id_index_roundtrip() {
        let id = ProcessId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(ProcessId::from(7), id);
    }

    #[test]
    fn test_process_id_orders_by_index() {
        assert!(ProcessId::new(0) < ProcessId::new(1));
        assert!(ProcessId::new(10) > ProcessId::new(2));
    }

    #[test]
    fn test_process_id_display() {
        assert_eq!(format!("{}", ProcessId::new(3)), "Process(3)");
    }

    #[test]
    fn test_run_id_creation() {
        let id1 = RunId::new();
        let id2 = RunId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_run_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = RunId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert!(format!("{}", id).starts_with("Run("));
    }

    #[test]
    fn test_process_id_serializes_as_index() {
        let json = serde_json::to_string(&ProcessId::new(4)).unwrap();
        assert_eq!(json, "4");
    }
}
