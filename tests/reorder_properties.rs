//! Property-based tests for property source reordering.
//!
//! Test coverage:
//! - reorder output is a permutation of its input
//! - reorder is idempotent
//! - equal priorities keep their original order
//! - prioritized sources always precede unprioritized ones
//! - anchored placement leaves unprioritized sources in relative order
//! - any duplicated name is rejected

use proptest::prelude::*;

use config_precedence::order::DeclaredPriority;
use config_precedence::{reorder, reorder_anchored, OrderError, PropertySourceDescriptor};

/// Strategy for descriptors with unique names and a small priority range,
/// so that ties are common.
fn descriptors_strategy() -> impl Strategy<Value = Vec<PropertySourceDescriptor>> {
    prop::collection::vec(prop::option::of(-3i32..=3), 0..24).prop_map(|priorities| {
        priorities
            .into_iter()
            .enumerate()
            .map(|(idx, priority)| PropertySourceDescriptor {
                name: format!("source-{idx}"),
                priority,
                original_index: idx,
            })
            .collect()
    })
}

fn sorted_names(sources: &[PropertySourceDescriptor]) -> Vec<String> {
    let mut names: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
    names.sort();
    names
}

proptest! {
    #[test]
    fn reorder_is_permutation(sources in descriptors_strategy()) {
        let sorted = reorder(sources.clone(), &DeclaredPriority).unwrap();

        prop_assert_eq!(sorted.len(), sources.len());
        prop_assert_eq!(sorted_names(&sorted), sorted_names(&sources));
    }

    #[test]
    fn reorder_is_idempotent(sources in descriptors_strategy()) {
        let once = reorder(sources, &DeclaredPriority).unwrap();
        let twice = reorder(once.clone(), &DeclaredPriority).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reorder_is_stable(sources in descriptors_strategy()) {
        let sorted = reorder(sources, &DeclaredPriority).unwrap();

        for pair in sorted.windows(2) {
            if pair[0].priority == pair[1].priority {
                prop_assert!(pair[0].original_index < pair[1].original_index);
            }
        }
    }

    #[test]
    fn prioritized_sources_lead(sources in descriptors_strategy()) {
        let sorted = reorder(sources, &DeclaredPriority).unwrap();
        let first_neutral = sorted
            .iter()
            .position(|s| s.priority.is_none())
            .unwrap_or(sorted.len());

        prop_assert!(sorted[..first_neutral].iter().all(|s| s.priority.is_some()));
        prop_assert!(sorted[first_neutral..].iter().all(|s| s.priority.is_none()));
        prop_assert!(sorted[..first_neutral]
            .windows(2)
            .all(|p| p[0].priority <= p[1].priority));
    }

    #[test]
    fn anchored_keeps_unprioritized_order(sources in descriptors_strategy()) {
        let placed = reorder_anchored(sources.clone(), &DeclaredPriority).unwrap();

        prop_assert_eq!(sorted_names(&placed), sorted_names(&sources));

        let neutral = |list: &[PropertySourceDescriptor]| -> Vec<usize> {
            list.iter().filter(|s| s.priority.is_none()).map(|s| s.original_index).collect()
        };
        prop_assert_eq!(neutral(&placed), neutral(&sources));

        let again = reorder_anchored(placed.clone(), &DeclaredPriority).unwrap();
        prop_assert_eq!(again, placed);
    }

    #[test]
    fn duplicates_rejected(
        sources in descriptors_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!sources.is_empty());
        let duplicate = sources[pick.index(sources.len())].clone();
        let name = duplicate.name.clone();

        let mut with_duplicate = sources;
        with_duplicate.push(duplicate);

        prop_assert_eq!(
            reorder(with_duplicate.clone(), &DeclaredPriority),
            Err(OrderError::DuplicateSourceName(name.clone()))
        );
        prop_assert_eq!(
            reorder_anchored(with_duplicate, &DeclaredPriority),
            Err(OrderError::DuplicateSourceName(name))
        );
    }
}
