//! In-process entry point: parse a program, build its initial configuration
//! and run it.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::step::{Run, RuleSet, Stepper};
use crate::term::K;

/// Turns program text into a term. Provided by the embedding application.
pub trait Parser {
  fn parse(&self, source: &str) -> Result<K>;
}

pub fn run_source<P: Parser, R: RuleSet>(
  parser: &P,
  stepper: &Stepper<R>,
  source: &str,
  config: &RunConfig,
) -> Result<Run> {
  let program = parser.parse(source).context("failed to parse program")?;
  debug!("input:\n{}", program.pretty_tree(0));

  let init = stepper
    .initial_configuration(program)
    .context("failed to build the initial configuration")?;
  debug!("top level init:\n{}", init.pretty_tree(0));

  let run = stepper
    .take_steps(init, config.max_steps)
    .with_context(|| format!("run aborted (step bound {})", config.max_steps))?;
  info!(steps = run.steps, state = ?run.state, "run finished");
  debug!("result:\n{}", run.config.pretty_tree(0));
  Ok(run)
}
