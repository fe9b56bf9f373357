//! Printing of K terms.
//!
//! The single-line form produced by `Display` doubles as the sort key used to
//! canonicalize maps and sets, so it must be deterministic: map and set
//! contents are always written in canonical order.

use std::fmt::{self, Write};

use super::{K, KData, SORT_BOOL, SORT_STRING};
use crate::collections::{ordered_map_pairs, ordered_set_elements};

/// Quotes a string token, escaping quotes, backslashes and control bytes.
/// Control bytes without a short escape are written as 3-digit decimals.
pub fn enquote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\t' => out.push_str("\\t"),
      '\r' => out.push_str("\\r"),
      '\u{8}' => out.push_str("\\b"),
      ' '..='~' => out.push(c),
      c if (c as u32) <= 0xff => {
        let _ = write!(out, "\\{:03}", c as u32);
      },
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

fn write_seq(
  f: &mut fmt::Formatter<'_>,
  open: &str,
  items: impl IntoIterator<Item = impl fmt::Display>,
  close: &str,
) -> fmt::Result {
  f.write_str(open)?;
  for (i, item) in items.into_iter().enumerate() {
    if i > 0 {
      f.write_str(", ")?;
    }
    write!(f, "{item}")?;
  }
  f.write_str(close)
}

impl fmt::Display for K {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.as_data() {
      KData::Int(i) => write!(f, "{i}"),
      KData::Token(t) if t.sort.name() == SORT_BOOL => f.write_str(&t.value),
      KData::Token(t) if t.sort.name() == SORT_STRING => {
        f.write_str(&enquote(&t.value))
      },
      KData::Token(t) => {
        write!(f, "#token({}, {})", enquote(&t.value), enquote(t.sort.name()))
      },
      KData::Apply(a) => write_seq(f, &format!("{}(", a.label), &a.args, ")"),
      KData::List(l) => write_seq(f, &format!("{}[", l.label), &l.items, "]"),
      KData::Map(m) => {
        let pairs = ordered_map_pairs(self);
        f.write_str(m.label.name())?;
        write_seq(
          f,
          "{",
          pairs.iter().map(|p| format!("{} |-> {}", p.key_str, p.value)),
          "}",
        )
      },
      KData::Set(s) => {
        let elems = ordered_set_elements(self);
        write_seq(f, &format!("{}{{", s.label), &elems, "}")
      },
      KData::Bottom => f.write_str("#Bottom"),
    }
  }
}

impl K {
  /// The canonical single-line rendering of this term.
  pub fn pretty(&self) -> String {
    self.to_string()
  }

  /// Multi-line rendering, one subterm per line, nested `indent` levels deep.
  pub fn pretty_tree(&self, indent: usize) -> String {
    let mut out = String::new();
    self.write_tree(indent, &mut out);
    out
  }

  fn write_tree(&self, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match self.as_data() {
      KData::Apply(a) if !a.args.is_empty() => {
        let _ = writeln!(out, "{pad}{}(", a.label);
        write_children(&a.args, indent + 1, out);
        let _ = write!(out, "{pad})");
      },
      KData::List(l) if !l.items.is_empty() => {
        let _ = writeln!(out, "{pad}{}[", l.label);
        write_children(&l.items, indent + 1, out);
        let _ = write!(out, "{pad}]");
      },
      KData::Map(m) if !m.entries.is_empty() => {
        let _ = writeln!(out, "{pad}{}{{", m.label);
        let inner = "  ".repeat(indent + 1);
        let pairs = ordered_map_pairs(self);
        let last = pairs.len() - 1;
        for (i, pair) in pairs.iter().enumerate() {
          let _ = writeln!(out, "{inner}{} |->", pair.key_str);
          pair.value.write_tree(indent + 2, out);
          out.push_str(if i < last { ",\n" } else { "\n" });
        }
        let _ = write!(out, "{pad}}}");
      },
      KData::Set(s) if !s.elems.is_empty() => {
        let _ = writeln!(out, "{pad}{}{{", s.label);
        write_children(&ordered_set_elements(self), indent + 1, out);
        let _ = write!(out, "{pad}}}");
      },
      _ => {
        let _ = write!(out, "{pad}{}", self);
      },
    }
  }
}

fn write_children(children: &[K], indent: usize, out: &mut String) {
  let last = children.len().saturating_sub(1);
  for (i, child) in children.iter().enumerate() {
    child.write_tree(indent, out);
    out.push_str(if i < last { ",\n" } else { "\n" });
  }
}
