//! The K term model.
//!
//! Every runtime value is a `K`: a cheap-to-clone handle to an immutable
//! `KData` node. Subterms are shared between parents through `Arc`, and no
//! node is ever mutated after construction, so terms can be shared freely.

pub mod print;

use std::{
  fmt,
  hash::{Hash, Hasher},
  sync::{Arc, LazyLock},
};

use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::{FxHashMap, FxHashSet};

// ============================================================================
// Sorts and labels
// ============================================================================

/// The sort of a token or collection, e.g. `Int`, `Bool`, `Map`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct Sort(pub Arc<str>);

impl Sort {
  pub fn new(name: &str) -> Self {
    Sort(Arc::from(name))
  }

  pub fn name(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Sort {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// The symbol labelling an application or a collection constructor.
#[derive(PartialEq, Eq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct KLabel(pub Arc<str>);

impl KLabel {
  pub fn new(name: &str) -> Self {
    KLabel(Arc::from(name))
  }

  pub fn name(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for KLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

pub const SORT_BOOL: &str = "Bool";
pub const SORT_STRING: &str = "String";
pub const SORT_MAP: &str = "Map";
pub const SORT_K_CONFIG_VAR: &str = "KConfigVar";

// ============================================================================
// Variant payloads
// ============================================================================

/// An atomic literal: a sort tag and its textual payload.
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct Token {
  pub sort: Sort,
  pub value: String,
}

/// A label applied to an ordered argument vector.
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct Apply {
  pub label: KLabel,
  pub args: Vec<K>,
}

/// An ordered collection built by the list symbol `label`.
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct List {
  pub sort: Sort,
  pub label: KLabel,
  pub items: Vec<K>,
}

/// An unordered key/value collection. Iteration order over `entries` is
/// arbitrary; use `collections::ordered_map_pairs` to observe it.
#[derive(PartialEq, Eq, Debug)]
pub struct Map {
  pub sort: Sort,
  pub label: KLabel,
  pub entries: FxHashMap<K, K>,
}

/// An unordered collection of distinct elements.
#[derive(PartialEq, Eq, Debug)]
pub struct Set {
  pub sort: Sort,
  pub label: KLabel,
  pub elems: FxHashSet<K>,
}

// Hashing must agree with the order-insensitive equality of the underlying
// hash containers, so only the order-free parts are fed to the hasher.
impl Hash for Map {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.sort.hash(state);
    self.label.hash(state);
    self.entries.len().hash(state);
  }
}

impl Hash for Set {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.sort.hash(state);
    self.label.hash(state);
    self.elems.len().hash(state);
  }
}

// ============================================================================
// K
// ============================================================================

#[derive(PartialEq, Eq, Hash, Debug)]
pub enum KData {
  /// Arbitrary-precision signed integer.
  Int(BigInt),
  /// Atomic literal (booleans, configuration variables, strings, ...).
  Token(Token),
  /// Labelled application.
  Apply(Apply),
  List(List),
  Map(Map),
  Set(Set),
  /// "No result" sentinel.
  Bottom,
}

/// A shared, immutable K term.
#[derive(Debug, Clone, Eq)]
pub struct K(pub Arc<KData>);

impl PartialEq for K {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
  }
}

impl Hash for K {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.hash(state);
  }
}

static INT_ZERO: LazyLock<K> =
  LazyLock::new(|| K(Arc::new(KData::Int(BigInt::ZERO))));

static BOTTOM: LazyLock<K> = LazyLock::new(|| K(Arc::new(KData::Bottom)));

impl K {
  pub fn as_data(&self) -> &KData {
    &self.0
  }

  /// True when both handles point at the very same node.
  pub fn ptr_eq(&self, other: &K) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }

  pub fn int(value: impl Into<BigInt>) -> Self {
    K(Arc::new(KData::Int(value.into())))
  }

  /// The canonical zero. Every call returns the same node.
  pub fn zero() -> Self {
    INT_ZERO.clone()
  }

  pub fn token(sort: Sort, value: impl Into<String>) -> Self {
    K(Arc::new(KData::Token(Token { sort, value: value.into() })))
  }

  pub fn bool(b: bool) -> Self {
    Self::token(Sort::new(SORT_BOOL), if b { "true" } else { "false" })
  }

  pub fn apply(label: KLabel, args: Vec<K>) -> Self {
    K(Arc::new(KData::Apply(Apply { label, args })))
  }

  pub fn list(sort: Sort, label: KLabel, items: Vec<K>) -> Self {
    K(Arc::new(KData::List(List { sort, label, items })))
  }

  /// Builds a map from `entries`; a repeated key keeps its last value.
  pub fn map(
    sort: Sort,
    label: KLabel,
    entries: impl IntoIterator<Item = (K, K)>,
  ) -> Self {
    let entries = entries.into_iter().collect();
    K(Arc::new(KData::Map(Map { sort, label, entries })))
  }

  pub fn set(
    sort: Sort,
    label: KLabel,
    elems: impl IntoIterator<Item = K>,
  ) -> Self {
    let elems = elems.into_iter().collect();
    K(Arc::new(KData::Set(Set { sort, label, elems })))
  }

  pub fn bottom() -> Self {
    BOTTOM.clone()
  }

  // --------------------------------------------------------------------------
  // Coercions
  // --------------------------------------------------------------------------

  pub fn as_int(&self) -> Option<&BigInt> {
    match self.as_data() {
      KData::Int(i) => Some(i),
      _ => None,
    }
  }

  pub fn as_token(&self) -> Option<&Token> {
    match self.as_data() {
      KData::Token(t) => Some(t),
      _ => None,
    }
  }

  /// Reads a `Bool` token back as a Rust boolean.
  pub fn as_bool(&self) -> Option<bool> {
    let t = self.as_token()?;
    if t.sort.name() != SORT_BOOL {
      return None;
    }
    match t.value.as_str() {
      "true" => Some(true),
      "false" => Some(false),
      _ => None,
    }
  }

  pub fn as_apply(&self) -> Option<&Apply> {
    match self.as_data() {
      KData::Apply(a) => Some(a),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&List> {
    match self.as_data() {
      KData::List(l) => Some(l),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&Map> {
    match self.as_data() {
      KData::Map(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_set(&self) -> Option<&Set> {
    match self.as_data() {
      KData::Set(s) => Some(s),
      _ => None,
    }
  }

  pub fn is_bottom(&self) -> bool {
    matches!(self.as_data(), KData::Bottom)
  }

  pub fn is_zero(&self) -> bool {
    self.as_int().is_some_and(|i| i.is_zero())
  }
}

impl From<BigInt> for K {
  fn from(value: BigInt) -> Self {
    K::int(value)
  }
}

// ============================================================================
// Tests
// ============================================================================
