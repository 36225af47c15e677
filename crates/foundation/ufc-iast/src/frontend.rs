//! Frontend contract
//!
//! Lexers and parsers live outside this workspace. Each one is wrapped in a
//! [`Frontend`] that turns source text into [`SourceNode`]s.

use crate::SourceNode;
use anyhow::Result;
use std::fmt;

/// Source languages with a known frontend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// C, which has no class construct
    C,
    /// C++
    Cpp,
    /// Java
    Java,
    /// Any other language, by name
    Other(String),
}

impl SourceLanguage {
    /// Whether the language can declare classes
    #[must_use]
    pub fn has_classes(&self) -> bool {
        !matches!(self, Self::C)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => write!(formatter, "c"),
            Self::Cpp => write!(formatter, "cpp"),
            Self::Java => write!(formatter, "java"),
            Self::Other(name) => write!(formatter, "{name}"),
        }
    }
}

/// Trait for language-specific frontends
pub trait Frontend: Send + Sync + 'static {
    /// Language this frontend parses
    fn language(&self) -> SourceLanguage;

    /// File extensions this frontend handles, without the leading dot
    fn extensions(&self) -> &[&'static str];

    /// Parse source code into top-level IAST nodes
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed
    fn parse(&self, source: &str) -> Result<Vec<SourceNode>>;
}
