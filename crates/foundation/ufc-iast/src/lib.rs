//! Per-language abstract syntax tree (IAST) shared by every frontend
//!
//! Frontends for distinct source languages all hand their output to the
//! lowering engine as [`SourceNode`] trees. The node set is closed: each
//! construct the engine understands is an explicit variant, so adding a
//! construct is a compile-time checked change in every consumer.

mod frontend;

pub use frontend::{Frontend, SourceLanguage};

use std::fmt;

/// A node produced by a frontend, prior to normalization
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    /// Top-level function, from a language without an enclosing class construct
    FreeFunction(FunctionNode),
    /// Function declared inside a class
    Method(FunctionNode),
    /// Class definition
    Class(ClassNode),
    /// Return statement
    Return(ReturnNode),
    /// Binary operation
    BinaryOp(BinaryOpNode),
    /// Variable reference
    Variable(VariableNode),
    /// Literal value
    Literal(LiteralKind),
    /// Frontend-specific construct the IAST does not model
    Unknown {
        /// Frontend's own name for the construct
        kind: String,
        /// Source text of the construct
        text: String,
    },
}

/// Discriminant of a [`SourceNode`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// [`SourceNode::FreeFunction`]
    FreeFunction,
    /// [`SourceNode::Method`]
    Method,
    /// [`SourceNode::Class`]
    Class,
    /// [`SourceNode::Return`]
    Return,
    /// [`SourceNode::BinaryOp`]
    BinaryOp,
    /// [`SourceNode::Variable`]
    Variable,
    /// [`SourceNode::Literal`]
    Literal,
    /// [`SourceNode::Unknown`] with its frontend kind
    Unknown(String),
}

impl fmt::Display for NodeShape {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeFunction => write!(formatter, "free_function"),
            Self::Method => write!(formatter, "method"),
            Self::Class => write!(formatter, "class"),
            Self::Return => write!(formatter, "return"),
            Self::BinaryOp => write!(formatter, "binary_op"),
            Self::Variable => write!(formatter, "variable"),
            Self::Literal => write!(formatter, "literal"),
            Self::Unknown(kind) => write!(formatter, "unknown({kind})"),
        }
    }
}

/// Function or method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterNode>,
    /// Body, absent for declarations without a definition
    pub body: Option<BlockNode>,
    /// Declared return type
    pub return_type: Option<String>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNode {
    /// Parameter name
    pub name: String,
    /// Declared type, when the language spells one
    pub ty: Option<String>,
}

/// Statement block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockNode {
    /// Statements in source order
    pub statements: Vec<SourceNode>,
}

/// Class definition
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    /// Class name
    pub name: String,
    /// Member functions; frontends are expected to emit [`SourceNode::Method`]
    pub methods: Vec<SourceNode>,
}

/// Return statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    /// Returned expression, `None` for a bare `return`
    pub expression: Option<Box<SourceNode>>,
}

/// Binary operation
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpNode {
    /// Operator token as written in the source
    pub operator: String,
    /// Left operand
    pub left: Box<SourceNode>,
    /// Right operand
    pub right: Box<SourceNode>,
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNode {
    /// Referenced name
    pub name: String,
}

/// Literal kinds
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
    /// Character literal
    Char(char),
    /// Boolean literal
    Bool(bool),
    /// Null/nil literal
    Null,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:?}"),
            Self::String(value) => write!(formatter, "{value:?}"),
            Self::Char(value) => write!(formatter, "{value:?}"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Null => write!(formatter, "null"),
        }
    }
}

impl SourceNode {
    /// Returns the discriminant of this node
    #[must_use]
    pub fn shape(&self) -> NodeShape {
        match self {
            Self::FreeFunction(_) => NodeShape::FreeFunction,
            Self::Method(_) => NodeShape::Method,
            Self::Class(_) => NodeShape::Class,
            Self::Return(_) => NodeShape::Return,
            Self::BinaryOp(_) => NodeShape::BinaryOp,
            Self::Variable(_) => NodeShape::Variable,
            Self::Literal(_) => NodeShape::Literal,
            Self::Unknown { kind, .. } => NodeShape::Unknown(kind.clone()),
        }
    }

    /// The node's `name` capability, if it has one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FreeFunction(function) | Self::Method(function) => Some(&function.name),
            Self::Class(class) => Some(&class.name),
            Self::Variable(variable) => Some(&variable.name),
            Self::Return(_) | Self::BinaryOp(_) | Self::Literal(_) | Self::Unknown { .. } => None,
        }
    }

    /// Whether this is a top-level function
    #[must_use]
    pub fn is_free_function(&self) -> bool {
        matches!(self, Self::FreeFunction(_))
    }

    /// Creates a variable reference
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(VariableNode { name: name.into() })
    }

    /// Creates an integer literal
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Literal(LiteralKind::Integer(value))
    }

    /// Creates a binary operation
    pub fn binary(operator: impl Into<String>, left: Self, right: Self) -> Self {
        Self::BinaryOp(BinaryOpNode {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Creates a bare `return`
    #[must_use]
    pub fn bare_return() -> Self {
        Self::Return(ReturnNode { expression: None })
    }

    /// Creates a `return <expression>`
    #[must_use]
    pub fn return_value(expression: Self) -> Self {
        Self::Return(ReturnNode {
            expression: Some(Box::new(expression)),
        })
    }

    /// Creates a construct the IAST does not model
    pub fn unknown(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Unknown {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

/// Printable textual form, used for operands that carry no name
impl fmt::Display for SourceNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeFunction(function) | Self::Method(function) => {
                write!(formatter, "{}", function.name)
            }
            Self::Class(class) => write!(formatter, "{}", class.name),
            Self::Variable(variable) => write!(formatter, "{}", variable.name),
            Self::Literal(literal) => write!(formatter, "{literal}"),
            Self::BinaryOp(op) => write!(formatter, "{} {} {}", op.left, op.operator, op.right),
            Self::Return(ret) => match &ret.expression {
                Some(expression) => write!(formatter, "return {expression}"),
                None => write!(formatter, "return"),
            },
            Self::Unknown { kind, text } if text.is_empty() => {
                write!(formatter, "<unknown({kind})>")
            }
            Self::Unknown { text, .. } => write!(formatter, "{text}"),
        }
    }
}

impl FunctionNode {
    /// Creates a function with no parameters and no body
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            body: None,
            return_type: None,
        }
    }

    /// Adds untyped parameters by name
    #[must_use]
    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(names.into_iter().map(|name| ParameterNode {
            name: name.into(),
            ty: None,
        }));
        self
    }

    /// Adds a single parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterNode) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the body
    #[must_use]
    pub fn with_statements(mut self, statements: Vec<SourceNode>) -> Self {
        self.body = Some(BlockNode { statements });
        self
    }

    /// Sets the declared return type
    #[must_use]
    pub fn returning(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Body statements, empty when there is no body
    #[must_use]
    pub fn statements(&self) -> &[SourceNode] {
        self.body.as_ref().map_or(&[], |block| block.statements.as_slice())
    }

    /// Wraps as a top-level function
    #[must_use]
    pub fn into_free_function(self) -> SourceNode {
        SourceNode::FreeFunction(self)
    }

    /// Wraps as a method
    #[must_use]
    pub fn into_method(self) -> SourceNode {
        SourceNode::Method(self)
    }
}

impl ClassNode {
    /// Creates a class with no members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Adds a method
    #[must_use]
    pub fn with_method(mut self, method: FunctionNode) -> Self {
        self.methods.push(SourceNode::Method(method));
        self
    }

    /// Adds an arbitrary member node
    #[must_use]
    pub fn with_member(mut self, member: SourceNode) -> Self {
        self.methods.push(member);
        self
    }

    /// Wraps as a source node
    #[must_use]
    pub fn into_node(self) -> SourceNode {
        SourceNode::Class(self)
    }
}
