use crate::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use ulid::Ulid;

/// Reason a dropped connection does not become an edge.
///
/// These reflect normal user behaviour (dropping on yourself or on a filled
/// node), so callers treat them as a quiet no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRefusal {
    MissingSource,
    MissingTarget,
    SelfLoop,
    TargetNotEmpty,
}

impl fmt::Display for ConnectionRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConnectionRefusal::MissingSource => "source node no longer exists",
            ConnectionRefusal::MissingTarget => "target node no longer exists",
            ConnectionRefusal::SelfLoop => "a node cannot connect to itself",
            ConnectionRefusal::TargetNotEmpty => "target node already has content",
        };
        f.write_str(msg)
    }
}

/// Guard run before `GraphStore::add_edge`.
///
/// Parallel edges and additional inbound edges are allowed as long as the
/// target is still empty.
pub fn check_connection(
    store: &GraphStore,
    source_id: Ulid,
    target_id: Ulid,
) -> Result<(), ConnectionRefusal> {
    if source_id == target_id {
        return Err(ConnectionRefusal::SelfLoop);
    }
    if !store.contains_node(source_id) {
        return Err(ConnectionRefusal::MissingSource);
    }
    let target = store
        .get_node(target_id)
        .ok_or(ConnectionRefusal::MissingTarget)?;
    if !target.is_empty() {
        return Err(ConnectionRefusal::TargetNotEmpty);
    }
    Ok(())
}

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,
    Error,
}

/// Types of integrity issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    DanglingEdge,
    SelfLoop,
    ParallelEdge,
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub issue_type: ValidationIssueType,
    pub message: String,
    pub edge_id: Ulid,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    /// Get all errors
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get all info messages
    pub fn info(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Info)
            .collect()
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Integrity report over the whole store
pub fn validate(store: &GraphStore) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mut seen_pairs = HashSet::new();

    for edge in store.edges() {
        if !store.contains_node(edge.source_id) || !store.contains_node(edge.target_id) {
            result.issues.push(ValidationIssue {
                severity: ValidationSeverity::Error,
                issue_type: ValidationIssueType::DanglingEdge,
                message: format!(
                    "Edge {} references a missing node ({} -> {})",
                    edge.id, edge.source_id, edge.target_id
                ),
                edge_id: edge.id,
            });
        }

        if edge.source_id == edge.target_id {
            result.issues.push(ValidationIssue {
                severity: ValidationSeverity::Error,
                issue_type: ValidationIssueType::SelfLoop,
                message: format!("Edge {} connects node {} to itself", edge.id, edge.source_id),
                edge_id: edge.id,
            });
        }

        if !seen_pairs.insert((edge.source_id, edge.target_id)) {
            result.issues.push(ValidationIssue {
                severity: ValidationSeverity::Info,
                issue_type: ValidationIssueType::ParallelEdge,
                message: format!(
                    "Edge {} duplicates an existing connection {} -> {}",
                    edge.id, edge.source_id, edge.target_id
                ),
                edge_id: edge.id,
            });
        }
    }

    result
}
