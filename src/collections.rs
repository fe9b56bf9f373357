//! Shape-checked extraction and canonical ordering of collections.
//!
//! Maps and sets have no intrinsic order. Anything that observes their
//! contents (printing, enumeration, tests) goes through `ordered_map_pairs`
//! or `ordered_set_elements`, which sort by the printed form of each key.

use std::collections::BTreeMap;

use crate::term::{K, KLabel, Sort};

/// A map entry together with the printed key it was ordered by.
#[derive(Debug, Clone)]
pub struct MapEntry {
  pub key_str: String,
  pub key: K,
  pub value: K,
}

/// Returns the arguments of `subject` if it is an application of
/// `expected_label` to exactly `expected_arity` arguments.
pub fn extract_apply_args<'a>(
  subject: &'a K,
  expected_label: &KLabel,
  expected_arity: usize,
) -> Option<&'a [K]> {
  let apply = subject.as_apply()?;
  if apply.label != *expected_label || apply.args.len() != expected_arity {
    return None;
  }
  Some(&apply.args)
}

/// Returns the items of `subject` if it is a list of the given sort and label.
pub fn extract_list_data<'a>(
  subject: &'a K,
  expected_sort: &Sort,
  expected_label: &KLabel,
) -> Option<&'a [K]> {
  let list = subject.as_list()?;
  if list.sort != *expected_sort || list.label != *expected_label {
    return None;
  }
  Some(&list.items)
}

/// Key/value pairs of a map, ordered by the printed form of the keys.
///
/// # Panics
/// If `subject` is not a map, or if two distinct keys print identically.
pub fn ordered_map_pairs(subject: &K) -> Vec<MapEntry> {
  let Some(map) = subject.as_map() else {
    panic!("ordered_map_pairs argument not a map: {subject:?}");
  };
  let by_key: BTreeMap<String, (&K, &K)> =
    map.entries.iter().map(|(k, v)| (k.pretty(), (k, v))).collect();
  if by_key.len() != map.entries.len() {
    panic!(
      "map length mismatch. Reference length: {}. Data length: {}",
      map.entries.len(),
      by_key.len()
    );
  }
  by_key
    .into_iter()
    .map(|(key_str, (key, value))| MapEntry {
      key_str,
      key: key.clone(),
      value: value.clone(),
    })
    .collect()
}

/// Elements of a set, ordered by their printed form.
///
/// # Panics
/// If `subject` is not a set, or if two distinct elements print identically.
pub fn ordered_set_elements(subject: &K) -> Vec<K> {
  let Some(set) = subject.as_set() else {
    panic!("ordered_set_elements argument not a set: {subject:?}");
  };
  let by_elem: BTreeMap<String, &K> =
    set.elems.iter().map(|e| (e.pretty(), e)).collect();
  if by_elem.len() != set.elems.len() {
    panic!(
      "set length mismatch. Reference length: {}. Data length: {}",
      set.elems.len(),
      by_elem.len()
    );
  }
  by_elem.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;
  use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

  fn map_sort() -> Sort {
    Sort::new("Map")
  }

  fn map_label() -> KLabel {
    KLabel::new("_Map_")
  }

  fn int_map(pairs: impl IntoIterator<Item = (i64, i64)>) -> K {
    K::map(
      map_sort(),
      map_label(),
      pairs.into_iter().map(|(k, v)| (K::int(k), K::int(v))),
    )
  }

  #[test]
  fn test_extract_apply_args() {
    let f = KLabel::new("f");
    let t = K::apply(f.clone(), vec![K::int(1), K::int(2)]);
    assert_eq!(extract_apply_args(&t, &f, 2), Some(&[K::int(1), K::int(2)][..]));
    assert_eq!(extract_apply_args(&t, &f, 3), None);
    assert_eq!(extract_apply_args(&t, &KLabel::new("g"), 2), None);
    assert_eq!(extract_apply_args(&K::int(1), &f, 0), None);
  }

  #[test]
  fn test_extract_list_data() {
    let sort = Sort::new("List");
    let label = KLabel::new("_List_");
    let l = K::list(sort.clone(), label.clone(), vec![K::int(7)]);
    assert_eq!(extract_list_data(&l, &sort, &label), Some(&[K::int(7)][..]));
    assert_eq!(extract_list_data(&l, &Sort::new("Other"), &label), None);
    assert_eq!(extract_list_data(&l, &sort, &KLabel::new("_Other_")), None);
    assert_eq!(extract_list_data(&K::bottom(), &sort, &label), None);
  }

  #[test]
  fn test_ordered_map_pairs_sorted_by_printed_key() {
    let m = int_map([(3, 30), (-1, -10), (12, 120), (2, 20)]);
    let pairs = ordered_map_pairs(&m);
    let keys: Vec<_> = pairs.iter().map(|p| p.key_str.as_str()).collect();
    assert_eq!(keys, ["-1", "12", "2", "3"]);
    assert_eq!(pairs[1].value, K::int(120));
    assert_eq!(pairs[1].key, K::int(12));
  }

  #[test]
  fn test_ordered_map_pairs_empty() {
    assert!(ordered_map_pairs(&int_map([])).is_empty());
  }

  #[test]
  fn test_ordered_map_pairs_independent_of_insertion_order() {
    let mut pairs: Vec<(i64, i64)> = (0..64).map(|i| (i * 7 - 100, i)).collect();
    let reference = ordered_map_pairs(&int_map(pairs.clone()));
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..8 {
      pairs.shuffle(&mut rng);
      let shuffled = ordered_map_pairs(&int_map(pairs.clone()));
      assert_eq!(shuffled.len(), reference.len());
      for (a, b) in shuffled.iter().zip(&reference) {
        assert_eq!(a.key_str, b.key_str);
        assert_eq!(a.key, b.key);
        assert_eq!(a.value, b.value);
      }
    }
  }

  #[test]
  #[should_panic(expected = "not a map")]
  fn test_ordered_map_pairs_rejects_non_map() {
    ordered_map_pairs(&K::int(1));
  }

  #[test]
  #[should_panic(expected = "map length mismatch")]
  fn test_ordered_map_pairs_detects_print_collision() {
    // A malformed `Bool` token prints exactly like the integer it spells.
    let m = K::map(
      map_sort(),
      map_label(),
      [
        (K::int(1), K::int(0)),
        (K::token(Sort::new("Bool"), "1"), K::int(0)),
      ],
    );
    ordered_map_pairs(&m);
  }

  #[test]
  fn test_ordered_set_elements() {
    let s = K::set(
      Sort::new("Set"),
      KLabel::new("_Set_"),
      [K::bool(true), K::int(5), K::apply(KLabel::new("a"), vec![])],
    );
    assert_eq!(
      ordered_set_elements(&s),
      vec![K::int(5), K::apply(KLabel::new("a"), vec![]), K::bool(true)]
    );
  }

  #[test]
  #[should_panic(expected = "not a set")]
  fn test_ordered_set_elements_rejects_non_set() {
    ordered_set_elements(&int_map([(1, 1)]));
  }

  proptest! {
    #[test]
    fn prop_map_canonical_order(
      entries in proptest::collection::hash_map(any::<i64>(), any::<i64>(), 0..40)
    ) {
      let forward: Vec<_> = entries.iter().map(|(k, v)| (*k, *v)).collect();
      let mut backward = forward.clone();
      backward.reverse();
      let a = ordered_map_pairs(&int_map(forward));
      let b = ordered_map_pairs(&int_map(backward));
      prop_assert_eq!(a.len(), entries.len());
      prop_assert!(a.windows(2).all(|w| w[0].key_str < w[1].key_str));
      for (x, y) in a.iter().zip(&b) {
        prop_assert_eq!(&x.key, &y.key);
        prop_assert_eq!(&x.value, &y.value);
      }
    }
  }
}
