//! Validation errors for canonical IR construction

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// A canonical node would violate a data-model invariant
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum IrError {
    /// Binary expression built with an empty operator
    #[error("binary expression is missing its operator")]
    #[diagnostic(code(ir::missing_operator))]
    MissingOperator,

    /// Operator outside the fixed set
    #[error("invalid operator `{operator}`")]
    #[diagnostic(
        code(ir::invalid_operator),
        help("expected one of + - * / && || == != < > <= >=")
    )]
    InvalidOperator {
        /// Operator as given
        operator: String,
    },

    /// Binary expression built with an empty operand
    #[error("binary expression is missing its {side} operand")]
    #[diagnostic(code(ir::missing_operand))]
    MissingOperand {
        /// Which operand is empty
        side: OperandSide,
    },

    /// Function or class with an empty name
    #[error("{kind} name must be a non-empty string")]
    #[diagnostic(code(ir::empty_name))]
    EmptyName {
        /// What was being named
        kind: NameKind,
    },

    /// Function or class name that begins with a digit
    #[error("{kind} name `{name}` cannot start with a digit")]
    #[diagnostic(code(ir::leading_digit))]
    LeadingDigit {
        /// What was being named
        kind: NameKind,
        /// Name as given
        name: String,
    },
}

/// Operand position in a binary expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandSide {
    /// Left-hand side
    Left,
    /// Right-hand side
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(formatter, "left"),
            Self::Right => write!(formatter, "right"),
        }
    }
}

/// Kind of named IR node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// [`crate::IrFunction`]
    Function,
    /// [`crate::IrClass`]
    Class,
}

impl fmt::Display for NameKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => write!(formatter, "function"),
            Self::Class => write!(formatter, "class"),
        }
    }
}
