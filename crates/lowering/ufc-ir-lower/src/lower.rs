//! IAST → canonical IR lowering

use crate::config::{LoweringConfig, MixedSequencePolicy, UnmappedStatementPolicy};
use crate::error::{LoweringError, Result};
use crate::observer::{LoweringEvent, LoweringObserver, TracingObserver};
use std::sync::Arc;
use ufc_iast::SourceNode;
use ufc_ir::{DEFAULT_RETURN_TYPE, IrBinaryExpression, IrClass, IrFunction, IrNode, IrReturn};

/// Input to class-container lowering
#[derive(Debug, Clone, Copy)]
pub enum LowerInput<'a> {
    /// A single node
    Node(&'a SourceNode),
    /// An ordered sequence of nodes, typically one compilation unit
    Sequence(&'a [SourceNode]),
}

impl<'a> From<&'a SourceNode> for LowerInput<'a> {
    fn from(node: &'a SourceNode) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a [SourceNode]> for LowerInput<'a> {
    fn from(nodes: &'a [SourceNode]) -> Self {
        Self::Sequence(nodes)
    }
}

impl<'a> From<&'a Vec<SourceNode>> for LowerInput<'a> {
    fn from(nodes: &'a Vec<SourceNode>) -> Self {
        Self::Sequence(nodes)
    }
}

impl<'a, const N: usize> From<&'a [SourceNode; N]> for LowerInput<'a> {
    fn from(nodes: &'a [SourceNode; N]) -> Self {
        Self::Sequence(nodes)
    }
}

/// Context for lowering IAST to canonical IR
///
/// Lowering is pure: the context holds only policy and the observer, and
/// every operation reads its input without mutating it. A context can be
/// shared by reference across threads.
#[derive(Clone)]
pub struct LoweringContext {
    config: LoweringConfig,
    observer: Arc<dyn LoweringObserver>,
}

impl Default for LoweringContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LoweringContext {
    /// Create a context with default policies, reporting through `tracing`
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoweringConfig::default())
    }

    /// Create a context with the given policies, reporting through `tracing`
    #[must_use]
    pub fn with_config(config: LoweringConfig) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LoweringObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Active policies
    #[must_use]
    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    fn emit(&self, event: LoweringEvent) {
        self.observer.on_event(&event);
    }

    /// Lower any single node to its canonical counterpart
    ///
    /// Top-level functions lower to [`IrNode::Function`] here; use
    /// [`Self::lower_class`] to get them wrapped in `GlobalScope`.
    ///
    /// # Errors
    ///
    /// Variables, literals and unknown constructs have no standalone
    /// counterpart and fail with [`LoweringError::UnsupportedNode`]. Other
    /// failures come from the operation matching the node's shape.
    pub fn lower_node(&self, node: &SourceNode) -> Result<IrNode> {
        match node {
            SourceNode::FreeFunction(_) | SourceNode::Method(_) => {
                self.lower_function(node).map(IrNode::from)
            }
            SourceNode::Class(_) => self.lower_class(node).map(IrNode::from),
            SourceNode::Return(_) => self.lower_return(node).map(IrNode::from),
            SourceNode::BinaryOp(_) => self.lower_binary(node).map(IrNode::from),
            SourceNode::Variable(_) | SourceNode::Literal(_) | SourceNode::Unknown { .. } => {
                Err(LoweringError::unsupported(node.shape()))
            }
        }
    }

    /// Lower a binary operation
    ///
    /// Each operand lowers to its name when it has one, otherwise to its
    /// printable form, so literals and nested expressions still yield a token.
    ///
    /// # Errors
    ///
    /// [`LoweringError::Structural`] if `node` is not a binary operation,
    /// [`LoweringError::Validation`] if the operator or an operand is invalid.
    pub fn lower_binary(&self, node: &SourceNode) -> Result<IrBinaryExpression> {
        let SourceNode::BinaryOp(op) = node else {
            return Err(LoweringError::structural("binary_op", node.shape()));
        };

        let expr = IrBinaryExpression::new(
            &op.operator,
            operand_token(&op.left),
            operand_token(&op.right),
        )?;
        Ok(expr)
    }

    /// Lower a return statement
    ///
    /// # Errors
    ///
    /// [`LoweringError::Structural`] if `node` is not a return, or if it
    /// returns anything other than a binary operation.
    pub fn lower_return(&self, node: &SourceNode) -> Result<IrReturn> {
        let SourceNode::Return(ret) = node else {
            return Err(LoweringError::structural("return", node.shape()));
        };

        match &ret.expression {
            None => Ok(IrReturn::bare()),
            Some(expression) => self.lower_binary(expression).map(IrReturn::value),
        }
    }

    /// Lower a top-level function or a method
    ///
    /// Return statements are kept in order. Other statements are handled
    /// according to [`LoweringConfig::unmapped_statements`].
    ///
    /// # Errors
    ///
    /// [`LoweringError::Structural`] if `node` is neither a function nor a
    /// method, plus any error from lowering its returns or validating its name.
    pub fn lower_function(&self, node: &SourceNode) -> Result<IrFunction> {
        let (SourceNode::FreeFunction(function) | SourceNode::Method(function)) = node else {
            return Err(LoweringError::structural("function", node.shape()));
        };

        let parameters = function
            .parameters
            .iter()
            .map(|param| param.name.clone())
            .collect();

        let mut body = Vec::new();
        for statement in function.statements() {
            if let SourceNode::Return(_) = statement {
                body.push(self.lower_return(statement)?);
                continue;
            }
            match self.config.unmapped_statements {
                UnmappedStatementPolicy::Skip => self.emit(LoweringEvent::StatementSkipped {
                    function: function.name.clone(),
                    shape: statement.shape(),
                }),
                UnmappedStatementPolicy::Reject => {
                    return Err(LoweringError::unsupported(format!(
                        "{} statement in `{}`",
                        statement.shape(),
                        function.name
                    )));
                }
            }
        }

        let return_type = function
            .return_type
            .clone()
            .unwrap_or_else(|| DEFAULT_RETURN_TYPE.to_string());

        Ok(IrFunction::new(
            function.name.clone(),
            parameters,
            body,
            return_type,
        )?)
    }

    /// Lower a class container
    ///
    /// - An empty sequence fails with [`LoweringError::EmptyInput`].
    /// - A sequence of top-level functions becomes one `GlobalScope` class,
    ///   in input order.
    /// - A one-node sequence lowers that node.
    /// - Any other sequence is handled according to
    ///   [`LoweringConfig::mixed_sequences`].
    /// - A single top-level function becomes a one-method `GlobalScope`.
    /// - A single class keeps its name and lowers each of its methods.
    ///
    /// # Errors
    ///
    /// [`LoweringError::UnsupportedNode`] for any other shape, plus any error
    /// from lowering the contained functions.
    pub fn lower_class<'a>(&self, input: impl Into<LowerInput<'a>>) -> Result<IrClass> {
        match input.into() {
            LowerInput::Node(node) => self.lower_class_node(node),
            LowerInput::Sequence(nodes) => self.lower_sequence(nodes),
        }
    }

    fn lower_sequence(&self, nodes: &[SourceNode]) -> Result<IrClass> {
        self.emit(LoweringEvent::SequenceReceived { len: nodes.len() });

        let [first, rest @ ..] = nodes else {
            return Err(LoweringError::EmptyInput);
        };

        if nodes.iter().all(SourceNode::is_free_function) {
            let methods = nodes
                .iter()
                .map(|node| self.lower_function(node))
                .collect::<Result<Vec<_>>>()?;
            self.emit(LoweringEvent::GlobalScopeSynthesized {
                functions: methods.len(),
            });
            return Ok(IrClass::global_scope(methods));
        }

        if rest.is_empty() {
            return self.lower_class_node(first);
        }

        match self.config.mixed_sequences {
            MixedSequencePolicy::FirstElement => {
                self.emit(LoweringEvent::MixedSequenceTruncated {
                    len: nodes.len(),
                    kept: first.shape(),
                });
                self.lower_class_node(first)
            }
            MixedSequencePolicy::Reject => Err(LoweringError::unsupported(describe_sequence(nodes))),
        }
    }

    fn lower_class_node(&self, node: &SourceNode) -> Result<IrClass> {
        match node {
            SourceNode::FreeFunction(_) => {
                let lowered = self.lower_function(node)?;
                self.emit(LoweringEvent::FunctionWrapped {
                    name: lowered.name().to_string(),
                });
                Ok(IrClass::global_scope(vec![lowered]))
            }
            SourceNode::Class(class) => {
                let methods = class
                    .methods
                    .iter()
                    .map(|method| self.lower_function(method))
                    .collect::<Result<Vec<_>>>()?;
                let lowered = IrClass::new(class.name.clone(), methods)?;
                self.emit(LoweringEvent::ClassLowered {
                    name: class.name.clone(),
                    methods: lowered.methods().len(),
                });
                Ok(lowered)
            }
            _ => Err(LoweringError::unsupported(node.shape())),
        }
    }
}

/// Lower one compilation unit with default policies
///
/// # Errors
///
/// See [`LoweringContext::lower_class`].
pub fn lower_unit(nodes: &[SourceNode]) -> Result<IrClass> {
    LoweringContext::new().lower_class(nodes)
}

fn operand_token(node: &SourceNode) -> String {
    node.name()
        .map_or_else(|| node.to_string(), ToString::to_string)
}

fn describe_sequence(nodes: &[SourceNode]) -> String {
    let shapes: Vec<String> = nodes.iter().map(|node| node.shape().to_string()).collect();
    format!("mixed sequence [{}]", shapes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NoopObserver, RecordingObserver};
    use ufc_iast::{ClassNode, FunctionNode, LiteralKind, NodeShape};
    use ufc_ir::{BinaryOperator, IrError, NameKind};

    fn add_function(name: &str) -> FunctionNode {
        FunctionNode::new(name)
            .with_parameters(["a", "b"])
            .with_statements(vec![SourceNode::return_value(SourceNode::binary(
                "+",
                SourceNode::variable("a"),
                SourceNode::variable("b"),
            ))])
            .returning("int")
    }

    fn recording(config: LoweringConfig) -> (LoweringContext, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::new());
        let ctx = LoweringContext::with_config(config).with_observer(recorder.clone());
        (ctx, recorder)
    }

    #[test]
    fn binary_operands_use_names() {
        let node = SourceNode::binary(">=", SourceNode::variable("x"), SourceNode::variable("y"));
        let expr = LoweringContext::new().lower_binary(&node).unwrap();
        assert_eq!(expr.operator(), BinaryOperator::Ge);
        assert_eq!((expr.left(), expr.right()), ("x", "y"));
    }

    #[test]
    fn binary_operands_fall_back_to_printable_form() {
        let node = SourceNode::binary(
            "*",
            SourceNode::int(2),
            SourceNode::Literal(LiteralKind::Float(0.5)),
        );
        let expr = LoweringContext::new().lower_binary(&node).unwrap();
        assert_eq!((expr.left(), expr.right()), ("2", "0.5"));

        let nested = SourceNode::binary(
            "-",
            SourceNode::binary("+", SourceNode::variable("a"), SourceNode::int(1)),
            SourceNode::variable("b"),
        );
        let expr = LoweringContext::new().lower_binary(&nested).unwrap();
        assert_eq!(expr.left(), "a + 1");
    }

    #[test]
    fn binary_with_bad_operator_is_a_validation_error() {
        let node = SourceNode::binary("%", SourceNode::variable("a"), SourceNode::int(2));
        assert_eq!(
            LoweringContext::new().lower_binary(&node),
            Err(LoweringError::Validation(IrError::InvalidOperator {
                operator: "%".to_string()
            }))
        );
    }

    #[test]
    fn binary_requires_binary_shape() {
        let err = LoweringContext::new()
            .lower_binary(&SourceNode::variable("a"))
            .unwrap_err();
        assert_eq!(
            err,
            LoweringError::Structural {
                expected: "binary_op",
                found: NodeShape::Variable
            }
        );
    }

    #[test]
    fn bare_and_valued_returns() {
        let ctx = LoweringContext::new();
        assert_eq!(
            ctx.lower_return(&SourceNode::bare_return()).unwrap(),
            IrReturn::bare()
        );

        let ret = SourceNode::return_value(SourceNode::binary(
            "+",
            SourceNode::variable("a"),
            SourceNode::variable("b"),
        ));
        assert_eq!(
            ctx.lower_return(&ret).unwrap(),
            IrReturn::value(IrBinaryExpression::new("+", "a", "b").unwrap())
        );
    }

    #[test]
    fn returning_a_non_binary_expression_fails_loudly() {
        let ret = SourceNode::return_value(SourceNode::int(0));
        assert_eq!(
            LoweringContext::new().lower_return(&ret),
            Err(LoweringError::Structural {
                expected: "binary_op",
                found: NodeShape::Literal
            })
        );
    }

    #[test]
    fn function_defaults_and_skipped_statements() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let node = FunctionNode::new("main")
            .with_statements(vec![
                SourceNode::unknown("expression_statement", "puts(\"hi\");"),
                SourceNode::bare_return(),
            ])
            .into_free_function();

        let function = ctx.lower_function(&node).unwrap();
        assert_eq!(function.name(), "main");
        assert_eq!(function.return_type(), DEFAULT_RETURN_TYPE);
        assert!(function.parameters().is_empty());
        assert_eq!(function.body(), [IrReturn::bare()]);
        assert_eq!(
            recorder.events(),
            [LoweringEvent::StatementSkipped {
                function: "main".to_string(),
                shape: NodeShape::Unknown("expression_statement".to_string()),
            }]
        );
    }

    #[test]
    fn function_without_body_lowers_to_empty_body() {
        let node = FunctionNode::new("decl")
            .with_parameters(["n"])
            .returning("long")
            .into_method();
        let function = LoweringContext::new().lower_function(&node).unwrap();
        assert_eq!(function.parameters(), ["n"]);
        assert_eq!(function.return_type(), "long");
        assert!(function.body().is_empty());
    }

    #[test]
    fn rejecting_unmapped_statements() {
        let ctx = LoweringContext::with_config(LoweringConfig {
            unmapped_statements: UnmappedStatementPolicy::Reject,
            ..LoweringConfig::default()
        });
        let node = FunctionNode::new("main")
            .with_statements(vec![SourceNode::unknown("while", "while (1) {}")])
            .into_free_function();
        assert_eq!(
            ctx.lower_function(&node),
            Err(LoweringError::UnsupportedNode {
                found: "unknown(while) statement in `main`".to_string()
            })
        );
    }

    #[test]
    fn function_name_is_validated() {
        let node = FunctionNode::new("1st").into_free_function();
        assert!(matches!(
            LoweringContext::new().lower_function(&node),
            Err(LoweringError::Validation(IrError::LeadingDigit {
                kind: NameKind::Function,
                ..
            }))
        ));
    }

    #[test]
    fn function_requires_function_shape() {
        let node = ClassNode::new("Foo").into_node();
        assert_eq!(
            LoweringContext::new().lower_function(&node),
            Err(LoweringError::Structural {
                expected: "function",
                found: NodeShape::Class
            })
        );
    }

    #[test]
    fn free_functions_become_global_scope_in_order() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let nodes: Vec<_> = ["f1", "f2", "f3"]
            .into_iter()
            .map(|name| add_function(name).into_free_function())
            .collect();

        let class = ctx.lower_class(&nodes).unwrap();
        assert!(class.is_global_scope());
        let names: Vec<_> = class.methods().iter().map(IrFunction::name).collect();
        assert_eq!(names, ["f1", "f2", "f3"]);
        assert_eq!(
            recorder.events(),
            [
                LoweringEvent::SequenceReceived { len: 3 },
                LoweringEvent::GlobalScopeSynthesized { functions: 3 },
            ]
        );
    }

    #[test]
    fn single_free_function_is_wrapped() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let node = add_function("only").into_free_function();
        let class = ctx.lower_class(&node).unwrap();
        assert!(class.is_global_scope());
        assert_eq!(class.methods().len(), 1);
        assert_eq!(class.methods()[0].name(), "only");
        assert_eq!(
            recorder.events(),
            [LoweringEvent::FunctionWrapped {
                name: "only".to_string()
            }]
        );
    }

    #[test]
    fn failed_wrap_reports_nothing() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let node = add_function("0day").into_free_function();
        assert!(matches!(
            ctx.lower_class(&node),
            Err(LoweringError::Validation(IrError::LeadingDigit { .. }))
        ));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn single_function_sequence_is_grouped_not_wrapped() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let nodes = [add_function("only").into_free_function()];
        ctx.lower_class(&nodes).unwrap();
        assert_eq!(
            recorder.events(),
            [
                LoweringEvent::SequenceReceived { len: 1 },
                LoweringEvent::GlobalScopeSynthesized { functions: 1 },
            ]
        );
    }

    #[test]
    fn observer_does_not_change_results() {
        let nodes = [
            ClassNode::new("Kept").with_method(add_function("m")).into_node(),
            add_function("dropped").into_free_function(),
        ];
        let silent = LoweringContext::new().with_observer(Arc::new(NoopObserver));
        let (recorded, recorder) = recording(LoweringConfig::default());
        assert_eq!(silent.lower_class(&nodes), recorded.lower_class(&nodes));
        assert_eq!(recorder.events().len(), 3);
    }

    #[test]
    fn config_is_exposed() {
        let config = LoweringConfig {
            mixed_sequences: MixedSequencePolicy::Reject,
            unmapped_statements: UnmappedStatementPolicy::Reject,
        };
        assert_eq!(LoweringContext::with_config(config.clone()).config(), &config);
        assert_eq!(LoweringContext::new().config(), &LoweringConfig::default());
    }

    #[test]
    fn class_keeps_name_and_method_order() {
        let node = ClassNode::new("Foo")
            .with_method(add_function("m1"))
            .with_method(FunctionNode::new("m2"))
            .into_node();

        let class = LoweringContext::new().lower_class(&node).unwrap();
        let expected = IrClass::new(
            "Foo",
            vec![
                LoweringContext::new()
                    .lower_function(&add_function("m1").into_method())
                    .unwrap(),
                IrFunction::new("m2", vec![], vec![], DEFAULT_RETURN_TYPE).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(class, expected);
    }

    #[test]
    fn class_member_must_be_function_shaped() {
        let node = ClassNode::new("Foo")
            .with_member(SourceNode::variable("field"))
            .into_node();
        assert_eq!(
            LoweringContext::new().lower_class(&node),
            Err(LoweringError::Structural {
                expected: "function",
                found: NodeShape::Variable
            })
        );
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(lower_unit(&[]), Err(LoweringError::EmptyInput));
    }

    #[test]
    fn single_class_sequence_is_not_truncation() {
        let (ctx, recorder) = recording(LoweringConfig {
            mixed_sequences: MixedSequencePolicy::Reject,
            ..LoweringConfig::default()
        });
        let nodes = [ClassNode::new("Main").into_node()];
        assert_eq!(ctx.lower_class(&nodes).unwrap().name(), "Main");
        assert_eq!(
            recorder.events(),
            [
                LoweringEvent::SequenceReceived { len: 1 },
                LoweringEvent::ClassLowered {
                    name: "Main".to_string(),
                    methods: 0
                },
            ]
        );
    }

    #[test]
    fn mixed_sequence_keeps_first_node_by_default() {
        let (ctx, recorder) = recording(LoweringConfig::default());
        let nodes = [
            ClassNode::new("First").with_method(add_function("m")).into_node(),
            add_function("dropped").into_free_function(),
            ClassNode::new("AlsoDropped").into_node(),
        ];

        let class = ctx.lower_class(&nodes).unwrap();
        assert_eq!(class.name(), "First");
        assert_eq!(class.methods().len(), 1);
        assert!(recorder.events().contains(&LoweringEvent::MixedSequenceTruncated {
            len: 3,
            kept: NodeShape::Class
        }));
    }

    #[test]
    fn mixed_sequence_led_by_function_wraps_that_function() {
        let nodes = [
            add_function("lead").into_free_function(),
            ClassNode::new("Dropped").into_node(),
        ];
        let class = lower_unit(&nodes).unwrap();
        assert!(class.is_global_scope());
        assert_eq!(class.methods().len(), 1);
        assert_eq!(class.methods()[0].name(), "lead");
    }

    #[test]
    fn mixed_sequence_can_be_rejected() {
        let ctx = LoweringContext::with_config(LoweringConfig {
            mixed_sequences: MixedSequencePolicy::Reject,
            ..LoweringConfig::default()
        });
        let nodes = [
            add_function("f").into_free_function(),
            ClassNode::new("C").into_node(),
        ];
        assert_eq!(
            ctx.lower_class(&nodes),
            Err(LoweringError::UnsupportedNode {
                found: "mixed sequence [free_function, class]".to_string()
            })
        );
    }

    #[test]
    fn unsupported_container_shapes() {
        let ctx = LoweringContext::new();
        for node in [
            SourceNode::bare_return(),
            SourceNode::variable("x"),
            add_function("m").into_method(),
        ] {
            let err = ctx.lower_class(&node).unwrap_err();
            assert_eq!(err, LoweringError::unsupported(node.shape()));
        }
    }

    #[test]
    fn lower_node_dispatches_on_shape() {
        let ctx = LoweringContext::new();
        assert!(matches!(
            ctx.lower_node(&add_function("f").into_free_function()),
            Ok(IrNode::Function(_))
        ));
        assert!(matches!(
            ctx.lower_node(&ClassNode::new("C").into_node()),
            Ok(IrNode::Class(_))
        ));
        assert!(matches!(
            ctx.lower_node(&SourceNode::bare_return()),
            Ok(IrNode::Return(_))
        ));
        assert!(matches!(
            ctx.lower_node(&SourceNode::binary("==", SourceNode::int(1), SourceNode::int(1))),
            Ok(IrNode::BinaryExpression(_))
        ));
        assert_eq!(
            ctx.lower_node(&SourceNode::int(3)),
            Err(LoweringError::UnsupportedNode {
                found: "literal".to_string()
            })
        );
    }

    #[test]
    fn lowering_is_idempotent() {
        let nodes = [
            add_function("f1").into_free_function(),
            FunctionNode::new("f2")
                .with_statements(vec![
                    SourceNode::unknown("decl", "int x = 0;"),
                    SourceNode::bare_return(),
                ])
                .into_free_function(),
        ];
        let ctx = LoweringContext::new();
        assert_eq!(ctx.lower_class(&nodes), ctx.lower_class(&nodes));
    }
}
