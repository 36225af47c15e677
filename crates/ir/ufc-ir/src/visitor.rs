//! Read-only traversal over canonical IR trees

use crate::{IrBinaryExpression, IrClass, IrFunction, IrReturn};

/// Visitor over a canonical IR tree
///
/// Each `visit_*` method defaults to recursing into the node's children
/// through the matching `walk_*` function. Override a method to act on a
/// node; call the `walk_*` function from the override to keep descending.
pub trait IrVisitor {
    /// Visit a class
    fn visit_class(&mut self, class: &IrClass) {
        walk_class(self, class);
    }

    /// Visit a function
    fn visit_function(&mut self, function: &IrFunction) {
        walk_function(self, function);
    }

    /// Visit a return statement
    fn visit_return(&mut self, ret: &IrReturn) {
        walk_return(self, ret);
    }

    /// Visit a binary expression (a leaf)
    fn visit_binary_expression(&mut self, _expr: &IrBinaryExpression) {}
}

/// Visits every method of `class`
pub fn walk_class<V: IrVisitor + ?Sized>(visitor: &mut V, class: &IrClass) {
    for method in class.methods() {
        visitor.visit_function(method);
    }
}

/// Visits every retained statement of `function`
pub fn walk_function<V: IrVisitor + ?Sized>(visitor: &mut V, function: &IrFunction) {
    for ret in function.body() {
        visitor.visit_return(ret);
    }
}

/// Visits the returned expression, if any
pub fn walk_return<V: IrVisitor + ?Sized>(visitor: &mut V, ret: &IrReturn) {
    if let Some(expr) = ret.expression() {
        visitor.visit_binary_expression(expr);
    }
}

/// Node counts for a lowered tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrStats {
    /// Functions and methods
    pub functions: usize,
    /// Return statements
    pub returns: usize,
    /// Returns without a value
    pub bare_returns: usize,
    /// Binary expressions
    pub binary_expressions: usize,
}

impl IrStats {
    /// Counts the nodes under `class`
    #[must_use]
    pub fn of_class(class: &IrClass) -> Self {
        let mut stats = Self::default();
        stats.visit_class(class);
        stats
    }
}

impl IrVisitor for IrStats {
    fn visit_function(&mut self, function: &IrFunction) {
        self.functions += 1;
        walk_function(self, function);
    }

    fn visit_return(&mut self, ret: &IrReturn) {
        self.returns += 1;
        if ret.is_bare() {
            self.bare_returns += 1;
        }
        walk_return(self, ret);
    }

    fn visit_binary_expression(&mut self, _expr: &IrBinaryExpression) {
        self.binary_expressions += 1;
    }
}
