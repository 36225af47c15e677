//! Lowering policy configuration

use serde::{Deserialize, Serialize};

/// What to do with a class-container sequence that is not all top-level functions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixedSequencePolicy {
    /// Lower only the first node and drop the rest
    #[default]
    FirstElement,
    /// Fail with [`crate::LoweringError::UnsupportedNode`]
    Reject,
}

/// What to do with body statements that have no canonical counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedStatementPolicy {
    /// Drop the statement
    #[default]
    Skip,
    /// Fail with [`crate::LoweringError::UnsupportedNode`]
    Reject,
}

/// Policies applied by [`crate::LoweringContext`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoweringConfig {
    /// Handling of non-uniform class-container sequences
    pub mixed_sequences: MixedSequencePolicy,
    /// Handling of statements other than `return`
    pub unmapped_statements: UnmappedStatementPolicy,
}
