//! Canonical, language-agnostic intermediate representation
//!
//! Every node is validated when it is constructed and exposes no way to
//! mutate it afterwards. Nodes own their children outright, so a lowered
//! tree is a plain ownership tree: class → function → return → expression.

mod display;
pub mod error;
mod ident;
pub mod visitor;

pub use error::{IrError, NameKind, OperandSide};
pub use visitor::{IrStats, IrVisitor};

use ident::validate_name;
use std::fmt;
use std::str::FromStr;

/// Name of the synthetic class hosting top-level functions
pub const GLOBAL_SCOPE: &str = "GlobalScope";

/// Return type used when the source declares none
pub const DEFAULT_RETURN_TYPE: &str = "void";

/// Operators representable in a canonical binary expression
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl BinaryOperator {
    /// Every valid operator
    pub const ALL: [Self; 12] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::And,
        Self::Or,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Gt,
        Self::Le,
        Self::Ge,
    ];

    /// Source token for this operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::And => "&&",
            Self::Or => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = IrError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() {
            return Err(IrError::MissingOperator);
        }
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| IrError::InvalidOperator {
                operator: token.to_string(),
            })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Binary expression over two textual operands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrBinaryExpression {
    operator: BinaryOperator,
    left: String,
    right: String,
}

impl IrBinaryExpression {
    /// Creates a binary expression
    ///
    /// # Errors
    ///
    /// Fails if any part is empty or the operator is not in the fixed set.
    pub fn new(
        operator: &str,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Result<Self, IrError> {
        let left = left.into();
        let right = right.into();

        if operator.is_empty() {
            return Err(IrError::MissingOperator);
        }
        if left.is_empty() {
            return Err(IrError::MissingOperand {
                side: OperandSide::Left,
            });
        }
        if right.is_empty() {
            return Err(IrError::MissingOperand {
                side: OperandSide::Right,
            });
        }

        Ok(Self {
            operator: operator.parse()?,
            left,
            right,
        })
    }

    /// The operator
    #[must_use]
    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    /// The operator token, exactly as accepted by [`Self::new`]
    #[must_use]
    pub fn operator_str(&self) -> &'static str {
        self.operator.as_str()
    }

    /// Left operand
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Right operand
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }
}

/// Return statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrReturn {
    expression: Option<IrBinaryExpression>,
}

impl IrReturn {
    /// A bare `return`
    #[must_use]
    pub fn bare() -> Self {
        Self { expression: None }
    }

    /// A `return` carrying a value
    #[must_use]
    pub fn value(expression: IrBinaryExpression) -> Self {
        Self {
            expression: Some(expression),
        }
    }

    /// Returned expression, if any
    #[must_use]
    pub fn expression(&self) -> Option<&IrBinaryExpression> {
        self.expression.as_ref()
    }

    /// Whether this is a bare `return`
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.expression.is_none()
    }
}

/// Function with its retained body
///
/// The body only holds return statements; other statement shapes are not
/// part of the canonical model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrFunction {
    name: String,
    parameters: Vec<String>,
    body: Vec<IrReturn>,
    return_type: String,
}

impl IrFunction {
    /// Creates a function
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty or starts with a digit.
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<String>,
        body: Vec<IrReturn>,
        return_type: impl Into<String>,
    ) -> Result<Self, IrError> {
        let name = name.into();
        validate_name(NameKind::Function, &name)?;
        Ok(Self {
            name,
            parameters,
            body,
            return_type: return_type.into(),
        })
    }

    /// Function name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in declaration order
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Retained return statements in source order
    #[must_use]
    pub fn body(&self) -> &[IrReturn] {
        &self.body
    }

    /// Declared return type
    #[must_use]
    pub fn return_type(&self) -> &str {
        &self.return_type
    }
}

/// Class: a named, ordered collection of functions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrClass {
    name: String,
    methods: Vec<IrFunction>,
}

impl IrClass {
    /// Creates a class
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty or starts with a digit.
    pub fn new(name: impl Into<String>, methods: Vec<IrFunction>) -> Result<Self, IrError> {
        let name = name.into();
        validate_name(NameKind::Class, &name)?;
        Ok(Self { name, methods })
    }

    /// Creates the synthetic container for top-level functions
    #[must_use]
    pub fn global_scope(methods: Vec<IrFunction>) -> Self {
        Self {
            name: GLOBAL_SCOPE.to_string(),
            methods,
        }
    }

    /// Class name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in source order
    #[must_use]
    pub fn methods(&self) -> &[IrFunction] {
        &self.methods
    }

    /// Whether this is the synthetic container for top-level functions
    #[must_use]
    pub fn is_global_scope(&self) -> bool {
        self.name == GLOBAL_SCOPE
    }
}

/// Any canonical node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrNode {
    /// Class
    Class(IrClass),
    /// Function
    Function(IrFunction),
    /// Return statement
    Return(IrReturn),
    /// Binary expression
    BinaryExpression(IrBinaryExpression),
}

impl From<IrClass> for IrNode {
    fn from(class: IrClass) -> Self {
        Self::Class(class)
    }
}

impl From<IrFunction> for IrNode {
    fn from(function: IrFunction) -> Self {
        Self::Function(function)
    }
}

impl From<IrReturn> for IrNode {
    fn from(ret: IrReturn) -> Self {
        Self::Return(ret)
    }
}

impl From<IrBinaryExpression> for IrNode {
    fn from(expr: IrBinaryExpression) -> Self {
        Self::BinaryExpression(expr)
    }
}
