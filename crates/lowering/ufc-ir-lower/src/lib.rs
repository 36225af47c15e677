//! IAST → canonical IR lowering
//!
//! This crate handles:
//! - Dispatch over the closed set of source node shapes
//! - Recursive conversion of functions, returns and binary expressions
//! - Synthesis of the `GlobalScope` class for languages without classes
//! - Reporting lowering decisions through an injectable observer

pub mod config;
pub mod error;
pub mod lower;
pub mod observer;

pub use config::{LoweringConfig, MixedSequencePolicy, UnmappedStatementPolicy};
pub use error::{LoweringError, Result};
pub use lower::{LowerInput, LoweringContext, lower_unit};
pub use observer::{
    LoweringEvent, LoweringObserver, NoopObserver, RecordingObserver, TracingObserver,
};
