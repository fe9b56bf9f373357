//! Run configuration, with environment overrides.

use anyhow::{Context, Result};

/// The step bound used when none is configured.
pub const DEFAULT_MAX_STEPS: usize = 100;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const MAX_STEPS_VAR: &str = "KRUN_MAX_STEPS";
pub const LOG_FILTER_VAR: &str = "KRUN_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
  /// Upper bound on the number of transitions in one run.
  pub max_steps: usize,
  /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
  pub log_filter: String,
}

impl Default for RunConfig {
  fn default() -> Self {
    RunConfig {
      max_steps: DEFAULT_MAX_STEPS,
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl RunConfig {
  /// Defaults overridden by `KRUN_MAX_STEPS` and `KRUN_LOG`.
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|var| std::env::var(var).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let mut config = Self::default();
    if let Some(raw) = lookup(MAX_STEPS_VAR) {
      config.max_steps = raw
        .trim()
        .parse()
        .with_context(|| format!("{MAX_STEPS_VAR}={raw:?} is not a step count"))?;
    }
    if let Some(filter) = lookup(LOG_FILTER_VAR) {
      config.log_filter = filter;
    }
    Ok(config)
  }

  pub fn with_max_steps(mut self, max_steps: usize) -> Self {
    self.max_steps = max_steps;
    self
  }

  pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
    self.log_filter = filter.into();
    self
  }
}
