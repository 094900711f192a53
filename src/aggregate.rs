//! Fold per-file detections into one project-wide result.
//!
//! The fold is a pure set-union plus bitwise OR, so it is commutative,
//! associative, and idempotent: visitation order and duplicate detections
//! cannot change the outcome.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::detect::Detection;
use crate::table;

/// Combined permission requirements for a whole source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Union of explicitly declared permission names.
    pub declared: BTreeSet<String>,
    /// Union of heuristically inferred permission names.
    pub inferred: BTreeSet<String>,
    /// Union of explicit raw bitmask literals.
    pub raw_values: BTreeSet<u64>,
    /// Names seen in declarations but absent from the catalogue.
    pub unknown: BTreeSet<String>,
    /// OR of the bits for every effective name, OR'd with every raw value.
    pub bitmask: u64,
}

/// Reduce detections into a single [`Aggregate`].
///
/// With `include_inferred` off, heuristic names are still reported but do
/// not contribute to the bitmask. Empty input yields a zero mask.
pub fn fold<'a, I>(detections: I, include_inferred: bool) -> Aggregate
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut agg = Aggregate::default();

    for det in detections {
        agg.declared.extend(det.declared.iter().cloned());
        agg.inferred.extend(det.inferred.iter().cloned());
        agg.raw_values.extend(det.raw_values.iter().copied());
        agg.unknown.extend(det.unknown.iter().cloned());
    }

    for name in &agg.declared {
        agg.bitmask |= table::bit_for(name).unwrap_or(0);
    }
    if include_inferred {
        for name in &agg.inferred {
            agg.bitmask |= table::bit_for(name).unwrap_or(0);
        }
    }
    for value in &agg.raw_values {
        agg.bitmask |= value;
    }

    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn detection(declared: &[&str], inferred: &[&str], raw: &[u64]) -> Detection {
        Detection {
            file: PathBuf::from("bot.py"),
            declared: declared.iter().map(|s| s.to_string()).collect(),
            inferred: inferred.iter().map(|s| s.to_string()).collect(),
            raw_values: raw.iter().copied().collect(),
            unknown: BTreeSet::new(),
        }
    }

    #[test]
    fn empty_input_yields_zero_mask() {
        let agg = fold(std::iter::empty::<&Detection>(), true);
        assert_eq!(agg.bitmask, 0);
        assert!(agg.declared.is_empty());
        assert!(agg.inferred.is_empty());
    }

    #[test]
    fn single_name_yields_its_bit() {
        let det = detection(&["ban_members"], &[], &[]);
        let agg = fold([&det], true);
        assert_eq!(agg.bitmask, table::bit_for("ban_members").unwrap());
    }

    #[test]
    fn raw_values_or_into_the_mask() {
        let det = detection(&["administrator"], &[], &[8, 16]);
        let agg = fold([&det], true);
        assert_eq!(agg.bitmask, (1 << 3) | 8 | 16);
    }

    #[test]
    fn inferred_excluded_from_mask_when_disabled() {
        let det = detection(&["kick_members"], &["manage_messages"], &[]);
        let agg = fold([&det], false);
        assert_eq!(agg.bitmask, table::bit_for("kick_members").unwrap());
        // Still reported, just not counted.
        assert!(agg.inferred.contains("manage_messages"));
    }

    #[test]
    fn names_missing_from_table_contribute_nothing() {
        let mut det = detection(&[], &[], &[]);
        det.declared.insert("not_a_real_permission".into());
        let agg = fold([&det], true);
        assert_eq!(agg.bitmask, 0);
    }

    #[test]
    fn duplicate_detection_is_idempotent() {
        let det = detection(&["speak", "connect"], &["send_messages"], &[4096]);
        let once = fold([&det], true);
        let twice = fold([&det, &det], true);
        assert_eq!(once, twice);
    }

    fn arb_detection() -> impl Strategy<Value = Detection> {
        let names = prop::sample::subsequence(
            table::all_entries()
                .iter()
                .map(|e| e.name)
                .collect::<Vec<_>>(),
            0..6,
        );
        let inferred = prop::sample::subsequence(
            table::all_entries()
                .iter()
                .map(|e| e.name)
                .collect::<Vec<_>>(),
            0..4,
        );
        let raw = prop::collection::btree_set(any::<u64>(), 0..3);
        (names, inferred, raw).prop_map(|(declared, inferred, raw_values)| Detection {
            file: PathBuf::from("bot.py"),
            declared: declared.into_iter().map(String::from).collect(),
            inferred: inferred.into_iter().map(String::from).collect(),
            raw_values,
            unknown: BTreeSet::new(),
        })
    }

    proptest! {
        #[test]
        fn fold_is_order_independent(
            mut detections in prop::collection::vec(arb_detection(), 0..8),
        ) {
            let forward = fold(detections.iter(), true);
            detections.reverse();
            let backward = fold(detections.iter(), true);
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn folding_twice_never_changes_the_mask(
            detections in prop::collection::vec(arb_detection(), 0..6),
        ) {
            let once = fold(detections.iter(), true);
            let doubled: Vec<_> = detections.iter().chain(detections.iter()).collect();
            let twice = fold(doubled.into_iter(), true);
            prop_assert_eq!(once.bitmask, twice.bitmask);
        }
    }
}
