//! Compilation driver
//!
//! Routes each compilation unit to the frontend registered for its file
//! extension, lowers the resulting IAST, and collects one outcome per unit.
//! Units are independent: a failure in one never stops the others.

pub mod config;
pub mod error;

pub use config::{CONFIG_FILE, DriverConfig};
pub use error::UnitError;

use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ufc_iast::Frontend;
use ufc_ir::{IrClass, IrStats};
use ufc_ir_lower::{LoweringContext, LoweringObserver};

/// One compilation unit held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path used for frontend selection and reporting
    pub path: PathBuf,
    /// Source text
    pub source: String,
}

impl SourceUnit {
    /// Creates a unit
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// A successfully lowered unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredUnit {
    /// Canonical class for the unit
    pub class: IrClass,
    /// Node counts for the class
    pub stats: IrStats,
}

/// Result of lowering one unit
#[derive(Debug)]
pub struct UnitOutcome {
    /// Unit path
    pub path: PathBuf,
    /// Lowered unit or the reason it failed
    pub result: Result<LoweredUnit, UnitError>,
}

/// Outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per input unit
    pub outcomes: Vec<UnitOutcome>,
}

impl BatchReport {
    /// Units that lowered successfully
    pub fn succeeded(&self) -> impl Iterator<Item = (&Path, &LoweredUnit)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .ok()
                .map(|unit| (outcome.path.as_path(), unit))
        })
    }

    /// Errors of the units that failed
    pub fn failed(&self) -> impl Iterator<Item = &UnitError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err())
    }

    /// Whether every unit lowered
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Frontend registry plus lowering policy
pub struct Driver {
    frontends: Vec<Box<dyn Frontend>>,
    context: LoweringContext,
    parallel: bool,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

impl Driver {
    /// Create a driver with no frontends
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self {
            frontends: Vec::new(),
            context: LoweringContext::with_config(config.lowering),
            parallel: config.parallel,
        }
    }

    /// Replace the lowering observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LoweringObserver>) -> Self {
        self.context = self.context.with_observer(observer);
        self
    }

    /// Register a frontend; later registrations win on shared extensions
    pub fn register_frontend(&mut self, frontend: impl Frontend) -> &mut Self {
        self.frontends.insert(0, Box::new(frontend));
        self
    }

    /// Frontend handling the extension of `path`
    #[must_use]
    pub fn frontend_for(&self, path: &Path) -> Option<&dyn Frontend> {
        let extension = path.extension()?.to_str()?;
        self.frontends
            .iter()
            .find(|frontend| {
                frontend
                    .extensions()
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(extension))
            })
            .map(|frontend| frontend.as_ref())
    }

    /// Lowering context used for every unit
    #[must_use]
    pub fn context(&self) -> &LoweringContext {
        &self.context
    }

    /// Parse and lower one unit held in memory
    ///
    /// # Errors
    ///
    /// Returns an error if no frontend matches, the frontend fails or panics, or lowering fails
    pub fn lower_source(&self, path: &Path, source: &str) -> Result<LoweredUnit, UnitError> {
        let frontend = self
            .frontend_for(path)
            .ok_or_else(|| UnitError::NoFrontend {
                path: path.to_path_buf(),
            })?;

        let parsed = panic::catch_unwind(AssertUnwindSafe(|| frontend.parse(source)))
            .map_err(|payload| UnitError::FrontendPanic {
                path: path.to_path_buf(),
                frontend: frontend.language().to_string(),
                message: panic_message(&*payload),
            })?;
        let nodes = parsed.map_err(|err| UnitError::Parse {
            path: path.to_path_buf(),
            frontend: frontend.language().to_string(),
            message: format!("{err:#}"),
        })?;

        let class = self
            .context
            .lower_class(&nodes)
            .map_err(|source| UnitError::Lowering {
                path: path.to_path_buf(),
                source,
            })?;

        let stats = IrStats::of_class(&class);
        Ok(LoweredUnit { class, stats })
    }

    /// Read, parse and lower one file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or as [`Self::lower_source`]
    pub fn lower_file(&self, path: &Path) -> Result<LoweredUnit, UnitError> {
        let source = std::fs::read_to_string(path).map_err(|source| UnitError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.lower_source(path, &source)
    }

    /// Lower every unit, isolating failures per unit
    pub fn lower_batch(&self, units: &[SourceUnit]) -> BatchReport {
        self.run(
            units,
            |unit| self.lower_source(&unit.path, &unit.source),
            |unit| unit.path.as_path(),
        )
    }

    /// Lower every file, isolating failures per file
    pub fn lower_files(&self, paths: &[PathBuf]) -> BatchReport {
        self.run(paths, |path| self.lower_file(path), PathBuf::as_path)
    }

    fn run<T, L, P>(&self, items: &[T], lower: L, path_of: P) -> BatchReport
    where
        T: Sync,
        L: Fn(&T) -> Result<LoweredUnit, UnitError> + Sync,
        P: Fn(&T) -> &Path + Sync,
    {
        let policies = self.context.config();
        tracing::info!(
            units = items.len(),
            parallel = self.parallel,
            mixed_sequences = ?policies.mixed_sequences,
            unmapped_statements = ?policies.unmapped_statements,
            "lowering batch"
        );

        let lower_one = |item: &T| {
            let path = path_of(item);
            let _span = tracing::info_span!("lower_unit", path = %path.display()).entered();
            let result = lower(item);
            match &result {
                Ok(unit) => tracing::debug!(
                    class = unit.class.name(),
                    functions = unit.stats.functions,
                    returns = unit.stats.returns,
                    "lowered unit"
                ),
                Err(err) => tracing::warn!(error = %err, "unit failed"),
            }
            UnitOutcome {
                path: path.to_path_buf(),
                result,
            }
        };

        let outcomes: Vec<UnitOutcome> = if self.parallel {
            items.par_iter().map(lower_one).collect()
        } else {
            items.iter().map(lower_one).collect()
        };

        BatchReport { outcomes }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
