//! Lowering error types

use miette::Diagnostic;
use thiserror::Error;
use ufc_iast::NodeShape;
use ufc_ir::IrError;

/// Result alias for lowering operations
pub type Result<T, E = LoweringError> = std::result::Result<T, E>;

/// Errors that occur while lowering IAST to canonical IR
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LoweringError {
    /// A node does not have the shape the current operation requires
    #[error("expected {expected} node, found {found}")]
    #[diagnostic(code(lower::structural))]
    Structural {
        /// Shape the operation needed
        expected: &'static str,
        /// Shape that was supplied
        found: NodeShape,
    },

    /// The lowered node would break an IR invariant
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] IrError),

    /// Class-container lowering was given no nodes
    #[error("cannot lower an empty sequence of nodes")]
    #[diagnostic(code(lower::empty_input))]
    EmptyInput,

    /// Class-container lowering was given a shape it cannot host
    #[error("unsupported node: {found}")]
    #[diagnostic(
        code(lower::unsupported_node),
        help("a class container must be a class or a run of top-level functions")
    )]
    UnsupportedNode {
        /// Description of the offending shape
        found: String,
    },
}

impl LoweringError {
    pub(crate) fn structural(expected: &'static str, found: NodeShape) -> Self {
        Self::Structural { expected, found }
    }

    pub(crate) fn unsupported(found: impl ToString) -> Self {
        Self::UnsupportedNode {
            found: found.to_string(),
        }
    }
}
