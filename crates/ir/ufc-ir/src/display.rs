//! Human-readable dump of canonical IR

use crate::{IrBinaryExpression, IrClass, IrFunction, IrNode, IrReturn};
use std::fmt;

const INDENT: &str = "    ";

impl fmt::Display for IrBinaryExpression {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} {}", self.left, self.operator, self.right)
    }
}

impl fmt::Display for IrReturn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expression) => write!(formatter, "return {expression};"),
            None => write!(formatter, "return;"),
        }
    }
}

impl fmt::Display for IrFunction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_function(formatter, self, "")
    }
}

impl fmt::Display for IrClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_empty() {
            return write!(formatter, "class {} {{}}", self.name);
        }
        writeln!(formatter, "class {} {{", self.name)?;
        for method in &self.methods {
            write_function(formatter, method, INDENT)?;
            writeln!(formatter)?;
        }
        write!(formatter, "}}")
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => fmt::Display::fmt(class, formatter),
            Self::Function(function) => fmt::Display::fmt(function, formatter),
            Self::Return(ret) => fmt::Display::fmt(ret, formatter),
            Self::BinaryExpression(expr) => fmt::Display::fmt(expr, formatter),
        }
    }
}

fn write_function(
    formatter: &mut fmt::Formatter<'_>,
    function: &IrFunction,
    indent: &str,
) -> fmt::Result {
    write!(
        formatter,
        "{indent}fn {}({}) -> {} {{",
        function.name,
        function.parameters.join(", "),
        function.return_type
    )?;
    if function.body.is_empty() {
        return write!(formatter, "}}");
    }
    writeln!(formatter)?;
    for ret in &function.body {
        writeln!(formatter, "{indent}{INDENT}{ret}")?;
    }
    write!(formatter, "{indent}}}")
}
