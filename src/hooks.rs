//! Native hooks backing built-in sort operators.
//!
//! A hook is a plain function pointer with a uniform signature, registered
//! under a stable module-qualified name such as `INT.add`. The table is built
//! once and looked up by name; there is no runtime reflection.

pub mod int;

use indexmap::IndexMap;

use crate::term::{K, KLabel, Sort};

/// Recoverable hook failures. None of these is the "no step" condition of
/// the stepping engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookError {
  /// Operand of the wrong shape, wrong arity, or outside the hook's domain.
  InvalidArguments,
  DivisionByZero,
  /// A recognised operation that is intentionally not supported.
  NotImplemented,
}

impl std::fmt::Display for HookError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HookError::InvalidArguments => write!(f, "invalid arguments to hook"),
      HookError::DivisionByZero => write!(f, "division by zero"),
      HookError::NotImplemented => write!(f, "hook not implemented"),
    }
  }
}

impl std::error::Error for HookError {}

/// `args` are already evaluated operands, `label` the operator being reduced,
/// `sort` its result sort and `config` the current configuration (unused by
/// pure hooks).
pub type HookFn =
  fn(args: &[K], label: &KLabel, sort: &Sort, config: &K) -> Result<K, HookError>;

/// Name-indexed table of hooks, in registration order.
#[derive(Clone, Default)]
pub struct HookRegistry {
  hooks: IndexMap<String, HookFn>,
}

impl HookRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding every built-in hook.
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    int::register(&mut registry);
    registry
  }

  /// Registers `hook` under `name`, replacing any previous binding.
  pub fn register(&mut self, name: impl Into<String>, hook: HookFn) {
    self.hooks.insert(name.into(), hook);
  }

  pub fn get(&self, name: &str) -> Option<HookFn> {
    self.hooks.get(name).copied()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.hooks.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.hooks.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.hooks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hooks.is_empty()
  }

  /// Calls the hook registered as `name`. Returns `None` when no such hook
  /// exists.
  pub fn call(
    &self,
    name: &str,
    args: &[K],
    label: &KLabel,
    sort: &Sort,
    config: &K,
  ) -> Option<Result<K, HookError>> {
    let hook = self.get(name)?;
    Some(hook(args, label, sort, config))
  }
}

impl std::fmt::Debug for HookRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.names()).finish()
  }
}
