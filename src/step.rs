//! The stepping engine.
//!
//! A run is a sequence of single transitions on the configuration. Each
//! transition first asks the rule collaborator for a rewrite, then falls back
//! to hook dispatch when the configuration is an application of a
//! hook-bearing label. When neither applies the configuration is stuck, which
//! is the normal way a run ends. Hook errors are never swallowed: the first
//! one aborts the run.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::hooks::{HookError, HookRegistry};
use crate::term::{K, KLabel, SORT_K_CONFIG_VAR, SORT_MAP, Sort};

/// Name of the configuration variable bound to the parsed program.
pub const PGM_VAR: &str = "$PGM";

/// The hook that implements a label, and the sort it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookBinding {
  pub hook: String,
  pub sort: Sort,
}

/// The rule database a stepper runs against.
pub trait RuleSet {
  /// Tries one rewrite of `config`. `Ok(None)` means no rule matched; an error
  /// means evaluating the rule hit a failing hook.
  fn try_rule(&self, config: &K) -> Result<Option<K>, HookError>;

  /// The hook bound to `label`, if the label is hook-bearing.
  fn hook_binding(&self, label: &KLabel) -> Option<&HookBinding>;

  /// Label of the function that builds the initial configuration.
  fn top_cell_initializer(&self) -> KLabel {
    KLabel::new("initGeneratedTopCell")
  }
}

/// Label to hook table, for rule sets that keep their bindings in memory.
#[derive(Debug, Clone, Default)]
pub struct HookBindings {
  bindings: FxHashMap<KLabel, HookBinding>,
}

impl HookBindings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn bind(&mut self, label: KLabel, hook: impl Into<String>, sort: Sort) {
    self.bindings.insert(label, HookBinding { hook: hook.into(), sort });
  }

  pub fn get(&self, label: &KLabel) -> Option<&HookBinding> {
    self.bindings.get(label)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
  Runnable,
  /// No rule or hook applies. Terminal.
  Stuck,
}

/// Outcome of `Stepper::take_steps`.
#[derive(Debug, Clone)]
pub struct Run {
  pub config: K,
  /// Number of successful transitions.
  pub steps: usize,
  pub state: StepState,
}

pub struct Stepper<R> {
  rules: R,
  hooks: HookRegistry,
}

impl<R: RuleSet> Stepper<R> {
  pub fn new(rules: R, hooks: HookRegistry) -> Self {
    Stepper { rules, hooks }
  }

  /// A stepper backed by the built-in hooks.
  pub fn with_builtin_hooks(rules: R) -> Self {
    Self::new(rules, HookRegistry::builtin())
  }

  pub fn rules(&self) -> &R {
    &self.rules
  }

  pub fn hooks(&self) -> &HookRegistry {
    &self.hooks
  }

  /// Attempts exactly one transition. `Ok(None)` means `config` is stuck.
  pub fn step(&self, config: &K) -> Result<Option<K>, HookError> {
    if let Some(next) = self.rules.try_rule(config)? {
      return Ok(Some(next));
    }
    self.dispatch_hook(config)
  }

  fn dispatch_hook(&self, config: &K) -> Result<Option<K>, HookError> {
    let Some(apply) = config.as_apply() else { return Ok(None) };
    let Some(binding) = self.rules.hook_binding(&apply.label) else {
      return Ok(None);
    };
    let Some(hook) = self.hooks.get(&binding.hook) else {
      debug!(label = %apply.label, hook = %binding.hook, "label bound to unknown hook");
      return Ok(None);
    };
    match hook(&apply.args, &apply.label, &binding.sort, config) {
      Ok(result) => Ok(Some(result)),
      Err(err) => {
        warn!(label = %apply.label, hook = %binding.hook, %err, "hook failed");
        Err(err)
      },
    }
  }

  /// Steps from `initial` until it is stuck or `max_steps` transitions have
  /// been taken. The bound is only checked between transitions.
  pub fn take_steps(&self, initial: K, max_steps: usize) -> Result<Run, HookError> {
    let mut current = initial;
    let mut steps = 0;
    while steps < max_steps {
      match self.step(&current)? {
        Some(next) => {
          steps += 1;
          debug!(step = steps, "transition");
          current = next;
        },
        None => {
          info!(steps, "configuration stuck");
          return Ok(Run { config: current, steps, state: StepState::Stuck });
        },
      }
    }
    info!(steps, "step bound reached");
    Ok(Run { config: current, steps, state: StepState::Runnable })
  }

  /// Builds `initializer(Map{ $PGM |-> program })` and evaluates it with one
  /// transition, if any applies.
  pub fn initial_configuration(&self, program: K) -> Result<K, HookError> {
    let vars = K::map(
      Sort::new(SORT_MAP),
      KLabel::new("_Map_"),
      [(K::token(Sort::new(SORT_K_CONFIG_VAR), PGM_VAR), program)],
    );
    let init = K::apply(self.rules.top_cell_initializer(), vec![vars]);
    Ok(self.step(&init)?.unwrap_or(init))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::collections::extract_apply_args;
  use num_bigint::BigInt;
  use num_traits::{One, Signed};

  /// A hand-written rule set over a few toy labels:
  /// - `countdown(n)` rewrites to `countdown(n - 1)` while `n > 0`;
  /// - `spin()` rewrites to a fresh `spin()` forever;
  /// - `initGeneratedTopCell(m)` rewrites to `<T>(m)`;
  /// - `_+Int_`, `_/Int_`, `bits` and `hooked` are bound to hooks.
  struct ToyRules {
    bindings: HookBindings,
  }

  impl ToyRules {
    fn new() -> Self {
      let mut bindings = HookBindings::new();
      let int = Sort::new("Int");
      bindings.bind(KLabel::new("_+Int_"), "INT.add", int.clone());
      bindings.bind(KLabel::new("_/Int_"), "INT.ediv", int.clone());
      bindings.bind(KLabel::new("bits"), "INT.signExtendBitRange", int.clone());
      bindings.bind(KLabel::new("hooked"), "INT.nonexistent", int);
      ToyRules { bindings }
    }
  }

  impl RuleSet for ToyRules {
    fn try_rule(&self, config: &K) -> Result<Option<K>, HookError> {
      let countdown = KLabel::new("countdown");
      if let Some([n]) = extract_apply_args(config, &countdown, 1) {
        let n = n.as_int().ok_or(HookError::InvalidArguments)?;
        if n.is_positive() {
          return Ok(Some(K::apply(countdown, vec![K::int(n - BigInt::one())])));
        }
      }
      if extract_apply_args(config, &KLabel::new("spin"), 0).is_some() {
        return Ok(Some(K::apply(KLabel::new("spin"), vec![])));
      }
      // A rule whose side condition divides, and so can fail.
      if let Some([a, b]) = extract_apply_args(config, &KLabel::new("safeDiv"), 2)
      {
        let stepper = Stepper::with_builtin_hooks(ToyRules::new());
        let div = K::apply(KLabel::new("_/Int_"), vec![a.clone(), b.clone()]);
        return stepper.step(&div);
      }
      if let Some([m]) =
        extract_apply_args(config, &self.top_cell_initializer(), 1)
      {
        return Ok(Some(K::apply(KLabel::new("<T>"), vec![m.clone()])));
      }
      Ok(None)
    }

    fn hook_binding(&self, label: &KLabel) -> Option<&HookBinding> {
      self.bindings.get(label)
    }
  }

  fn stepper() -> Stepper<ToyRules> {
    Stepper::with_builtin_hooks(ToyRules::new())
  }

  fn app(label: &str, args: Vec<K>) -> K {
    K::apply(KLabel::new(label), args)
  }

  #[test]
  fn test_stuck_configuration_is_returned_unchanged() {
    let config = app("done", vec![K::int(1)]);
    let run = stepper().take_steps(config.clone(), 100).unwrap();
    assert_eq!(run.steps, 0);
    assert_eq!(run.state, StepState::Stuck);
    assert!(run.config.ptr_eq(&config));
  }

  #[test]
  fn test_rules_run_to_fixpoint() {
    let run = stepper().take_steps(app("countdown", vec![K::int(5)]), 100).unwrap();
    assert_eq!(run.steps, 5);
    assert_eq!(run.state, StepState::Stuck);
    assert_eq!(run.config, app("countdown", vec![K::int(0)]));
  }

  #[test]
  fn test_step_bound() {
    let run = stepper().take_steps(app("spin", vec![]), 7).unwrap();
    assert_eq!(run.steps, 7);
    assert_eq!(run.state, StepState::Runnable);

    let run = stepper().take_steps(app("countdown", vec![K::int(3)]), 0).unwrap();
    assert_eq!(run.steps, 0);
    assert_eq!(run.state, StepState::Runnable);
  }

  #[test]
  fn test_hook_dispatch_on_head_label() {
    let s = stepper();
    let sum = app("_+Int_", vec![K::int(40), K::int(2)]);
    assert_eq!(s.step(&sum), Ok(Some(K::int(42))));

    let run = s.take_steps(sum, 10).unwrap();
    assert_eq!(run.config, K::int(42));
    assert_eq!(run.steps, 1);
    assert_eq!(run.state, StepState::Stuck);
  }

  #[test]
  fn test_unknown_hook_is_stuck_not_error() {
    let config = app("hooked", vec![K::int(1)]);
    assert_eq!(stepper().step(&config), Ok(None));
  }

  #[test]
  fn test_hook_error_aborts_run() {
    let s = stepper();
    let div = app("_/Int_", vec![K::int(1), K::int(0)]);
    assert_eq!(s.take_steps(div, 10).unwrap_err(), HookError::DivisionByZero);

    let bits = app("bits", vec![K::int(1), K::int(0), K::int(8)]);
    assert_eq!(s.take_steps(bits, 10).unwrap_err(), HookError::NotImplemented);

    let bad = app("_+Int_", vec![K::int(1), K::bottom()]);
    assert_eq!(s.take_steps(bad, 10).unwrap_err(), HookError::InvalidArguments);
  }

  #[test]
  fn test_hook_error_from_rule_aborts_run() {
    let s = stepper();
    let ok = app("safeDiv", vec![K::int(9), K::int(2)]);
    assert_eq!(s.take_steps(ok, 10).unwrap().config, K::int(4));
    let bad = app("safeDiv", vec![K::int(9), K::int(0)]);
    assert_eq!(s.take_steps(bad, 10).unwrap_err(), HookError::DivisionByZero);
  }

  #[test]
  fn test_initial_configuration() {
    let s = stepper();
    let program = app("countdown", vec![K::int(2)]);
    let init = s.initial_configuration(program.clone()).unwrap();
    let [vars] = extract_apply_args(&init, &KLabel::new("<T>"), 1).unwrap() else {
      unreachable!()
    };
    let entries = &vars.as_map().unwrap().entries;
    assert_eq!(entries.len(), 1);
    let pgm = K::token(Sort::new(SORT_K_CONFIG_VAR), PGM_VAR);
    assert!(entries[&pgm].ptr_eq(&program));
  }
}
