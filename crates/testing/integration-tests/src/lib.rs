//! Test frontends for end-to-end lowering tests
//!
//! Real frontends wrap generated lexers and parsers that live outside this
//! workspace. [`LineFrontend`] stands in for them with a tiny line-oriented
//! syntax, one construct per line:
//!
//! ```text
//! // comment
//! class Greeter {
//! fn add(a, b) -> int {
//! return a + b;
//! }
//! }
//! ```
//!
//! Any other line inside a function becomes an unmodeled statement.

use anyhow::{Context, Result, bail};
use ufc_driver::{Driver, DriverConfig};
use ufc_iast::{
    BlockNode, ClassNode, Frontend, FunctionNode, LiteralKind, ParameterNode, SourceLanguage,
    SourceNode,
};

/// Line-oriented frontend for one language
#[derive(Debug, Clone)]
pub struct LineFrontend {
    language: SourceLanguage,
    extensions: &'static [&'static str],
}

impl LineFrontend {
    /// C flavor: no classes
    #[must_use]
    pub fn c() -> Self {
        Self {
            language: SourceLanguage::C,
            extensions: &["c", "h"],
        }
    }

    /// C++ flavor
    #[must_use]
    pub fn cpp() -> Self {
        Self {
            language: SourceLanguage::Cpp,
            extensions: &["cpp", "cc", "hpp"],
        }
    }

    /// Java flavor
    #[must_use]
    pub fn java() -> Self {
        Self {
            language: SourceLanguage::Java,
            extensions: &["java"],
        }
    }
}

impl Frontend for LineFrontend {
    fn language(&self) -> SourceLanguage {
        self.language.clone()
    }

    fn extensions(&self) -> &[&'static str] {
        self.extensions
    }

    fn parse(&self, source: &str) -> Result<Vec<SourceNode>> {
        let mut parser = LineParser::new(&self.language);
        for (index, line) in source.lines().enumerate() {
            parser
                .line(line.trim())
                .with_context(|| format!("line {}", index + 1))?;
        }
        parser.finish()
    }
}

/// Driver with the C, C++ and Java line frontends registered
#[must_use]
pub fn driver(config: DriverConfig) -> Driver {
    let mut driver = Driver::new(config);
    driver
        .register_frontend(LineFrontend::c())
        .register_frontend(LineFrontend::cpp())
        .register_frontend(LineFrontend::java());
    driver
}

struct LineParser<'a> {
    language: &'a SourceLanguage,
    items: Vec<SourceNode>,
    class: Option<ClassNode>,
    function: Option<FunctionNode>,
}

impl<'a> LineParser<'a> {
    fn new(language: &'a SourceLanguage) -> Self {
        Self {
            language,
            items: Vec::new(),
            class: None,
            function: None,
        }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        if line.is_empty() || line.starts_with("//") {
            return Ok(());
        }
        if line == "}" {
            return self.close();
        }
        if let Some(rest) = line.strip_prefix("class ") {
            return self.open_class(rest);
        }
        if let Some(rest) = line.strip_prefix("fn ") {
            return self.open_function(rest);
        }

        let Some(function) = self.function.as_mut() else {
            bail!("statement outside of a function: `{line}`");
        };
        function
            .body
            .get_or_insert_with(BlockNode::default)
            .statements
            .push(parse_statement(line)?);
        Ok(())
    }

    fn open_class(&mut self, header: &str) -> Result<()> {
        if !self.language.has_classes() {
            bail!("{} has no class construct", self.language);
        }
        if self.class.is_some() || self.function.is_some() {
            bail!("nested class declarations are not supported");
        }
        let name = header
            .strip_suffix('{')
            .context("expected `{` after class name")?
            .trim();
        self.class = Some(ClassNode::new(name));
        Ok(())
    }

    fn open_function(&mut self, header: &str) -> Result<()> {
        if self.function.is_some() {
            bail!("nested functions are not supported");
        }
        let header = header
            .strip_suffix('{')
            .context("expected `{` after function signature")?;
        let (signature, return_type) = match header.split_once("->") {
            Some((signature, return_type)) => (signature, Some(return_type.trim())),
            None => (header, None),
        };
        let (name, params) = signature
            .trim()
            .strip_suffix(')')
            .and_then(|signature| signature.split_once('('))
            .context("expected `name(params)`")?;

        let mut function = params
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(parameter)
            .fold(FunctionNode::new(name.trim()), FunctionNode::with_parameter)
            .with_statements(Vec::new());
        if let Some(return_type) = return_type {
            function = function.returning(return_type);
        }
        self.function = Some(function);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(function) = self.function.take() {
            match self.class.as_mut() {
                Some(class) => class.methods.push(function.into_method()),
                None => self.items.push(function.into_free_function()),
            }
            return Ok(());
        }
        match self.class.take() {
            Some(class) => {
                self.items.push(class.into_node());
                Ok(())
            }
            None => bail!("unmatched `}}`"),
        }
    }

    fn finish(self) -> Result<Vec<SourceNode>> {
        if self.function.is_some() || self.class.is_some() {
            bail!("unclosed block at end of input");
        }
        Ok(self.items)
    }
}

fn parse_statement(line: &str) -> Result<SourceNode> {
    let rest = match line.strip_prefix("return") {
        Some(rest) if rest.starts_with([' ', ';']) => rest.trim(),
        _ => return Ok(SourceNode::unknown("expression_statement", line)),
    };
    let expression = rest
        .strip_suffix(';')
        .context("expected `;` after return")?;

    let tokens: Vec<&str> = expression.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok(SourceNode::bare_return()),
        [value] => Ok(SourceNode::return_value(operand(value))),
        [left, operator, right] => Ok(SourceNode::return_value(SourceNode::binary(
            *operator,
            operand(left),
            operand(right),
        ))),
        _ => bail!("unsupported return expression `{expression}`"),
    }
}

/// `name` or `type name`
fn parameter(param: &str) -> ParameterNode {
    match param.rsplit_once(char::is_whitespace) {
        Some((ty, name)) => ParameterNode {
            name: name.to_string(),
            ty: Some(ty.trim().to_string()),
        },
        None => ParameterNode {
            name: param.to_string(),
            ty: None,
        },
    }
}

fn operand(token: &str) -> SourceNode {
    if let Ok(value) = token.parse::<i64>() {
        return SourceNode::int(value);
    }
    let literal = match token {
        "true" => LiteralKind::Bool(true),
        "false" => LiteralKind::Bool(false),
        "null" => LiteralKind::Null,
        _ if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') => {
            LiteralKind::String(token[1..token.len() - 1].to_string())
        }
        _ => match token.parse::<f64>() {
            Ok(value) if token.contains('.') => LiteralKind::Float(value),
            _ => return SourceNode::variable(token),
        },
    };
    SourceNode::Literal(literal)
}
