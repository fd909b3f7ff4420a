//! Property-based tests for the mapping resolver.
//!
//! Over randomly generated entity forests we verify the traversal contract:
//! - entity mappings resolve to the nearest mapped ancestor-or-self,
//! - property search reaches exactly the ancestors and descendants of the
//!   starting entity (no cross-branch leakage),
//! - resolution always terminates with a result or absence, never a panic.

use proptest::prelude::*;
use restbridge_mapper::{EntityMapping, PropertyMapping, RestMapping, UniquingPolicy};
use restbridge_model::{EntityDescription, EntityModel, EntityNode};
use std::collections::HashSet;

/// A random forest: `parents[i]` is `None` (root) or `Some(j)` with `j < i`,
/// so the structure is acyclic by construction. `mapped[i]` says whether
/// entity `i` has a direct mapping, `has_prop[i]` whether that mapping
/// carries the probed property.
#[allow(clippy::type_complexity)]
fn forest_strategy() -> impl Strategy<Value = (Vec<Option<usize>>, Vec<bool>, Vec<bool>)> {
    (1usize..=8).prop_flat_map(|n| {
        (
            proptest::collection::vec((any::<bool>(), any::<usize>()), n),
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(any::<bool>(), n),
        )
            .prop_map(|(raw_parents, mapped, has_prop)| {
                let parents = raw_parents
                    .iter()
                    .enumerate()
                    .map(|(i, &(has_parent, raw))| {
                        if i == 0 || !has_parent {
                            None
                        } else {
                            Some(raw % i)
                        }
                    })
                    .collect();
                (parents, mapped, has_prop)
            })
    })
}

fn entity_name(index: usize) -> String {
    format!("e{index}")
}

fn build_model(parents: &[Option<usize>]) -> EntityModel {
    let mut builder = EntityModel::builder();
    for (index, parent) in parents.iter().enumerate() {
        let desc = match parent {
            Some(p) => EntityDescription::child_of(&entity_name(index), &entity_name(*p)),
            None => EntityDescription::new(&entity_name(index)),
        };
        builder = builder.entity(desc);
    }
    builder.build().expect("generated forest is valid")
}

fn build_mapping(
    model: &EntityModel,
    mapped: &[bool],
    has_prop: &[bool],
) -> RestMapping<EntityNode, String> {
    let mut builder = RestMapping::builder();
    for (index, &is_mapped) in mapped.iter().enumerate() {
        if !is_mapped {
            continue;
        }
        let mut em = EntityMapping::new(&format!("path{index}"))
            .uniquing(UniquingPolicy::SingleProperty(format!("u{index}")));
        if has_prop[index] {
            em = em.property("p".to_string(), PropertyMapping::new(&format!("m{index}")));
        }
        builder = builder.entity(model.entity(&entity_name(index)).unwrap(), em);
    }
    builder.build()
}

/// Ancestors of `start`, excluding `start` itself.
fn ancestors(parents: &[Option<usize>], start: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut current = parents[start];
    while let Some(p) = current {
        out.push(p);
        current = parents[p];
    }
    out
}

/// Descendants of `start`, excluding `start` itself.
fn descendants(parents: &[Option<usize>], start: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut frontier = vec![start];
    while let Some(node) = frontier.pop() {
        for (index, parent) in parents.iter().enumerate() {
            if *parent == Some(node) {
                out.push(index);
                frontier.push(index);
            }
        }
    }
    out
}

/// The exact set the property search may reach from `start`.
fn related(parents: &[Option<usize>], start: usize) -> HashSet<usize> {
    let mut set: HashSet<usize> = HashSet::new();
    set.insert(start);
    set.extend(ancestors(parents, start));
    set.extend(descendants(parents, start));
    set
}

/// Index encoded in a winner's rest name (`m{index}` / `path{index}`).
fn decode_index(name: &str) -> usize {
    name.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .expect("generated names end in an index")
}

proptest! {
    /// entity_mapping returns the nearest mapped ancestor-or-self.
    #[test]
    fn entity_mapping_is_nearest_mapped_ancestor(
        (parents, mapped, has_prop) in forest_strategy(),
    ) {
        let model = build_model(&parents);
        let mapping = build_mapping(&model, &mapped, &has_prop);

        for start in 0..parents.len() {
            let node = model.entity(&entity_name(start)).unwrap();
            let expected = std::iter::once(start)
                .chain(ancestors(&parents, start))
                .find(|&i| mapped[i]);

            match (mapping.entity_mapping(&node), expected) {
                (Some(m), Some(i)) => prop_assert_eq!(decode_index(&m.rest_path), i),
                (None, None) => {}
                (got, want) => prop_assert!(
                    false,
                    "entity {}: got {:?}, wanted {:?}",
                    start, got.map(|m| m.rest_path.clone()), want
                ),
            }
        }
    }

    /// uniquing_policy mirrors entity_mapping, defaulting to None.
    #[test]
    fn uniquing_policy_matches_nearest_mapping(
        (parents, mapped, has_prop) in forest_strategy(),
    ) {
        let model = build_model(&parents);
        let mapping = build_mapping(&model, &mapped, &has_prop);

        for start in 0..parents.len() {
            let node = model.entity(&entity_name(start)).unwrap();
            let expected = std::iter::once(start)
                .chain(ancestors(&parents, start))
                .find(|&i| mapped[i])
                .map(|i| UniquingPolicy::SingleProperty(format!("u{i}")))
                .unwrap_or(UniquingPolicy::None);
            prop_assert_eq!(mapping.uniquing_policy(&node), expected);
        }
    }

    /// Property search finds a mapping iff a related entity carries it, and
    /// the winner is always related to the starting entity.
    #[test]
    fn property_search_reaches_exactly_the_related_set(
        (parents, mapped, has_prop) in forest_strategy(),
    ) {
        let model = build_model(&parents);
        let mapping = build_mapping(&model, &mapped, &has_prop);
        let carries = |i: usize| mapped[i] && has_prop[i];

        for start in 0..parents.len() {
            let node = model.entity(&entity_name(start)).unwrap();
            let reachable = related(&parents, start);
            let expected_hit = reachable.iter().any(|&i| carries(i));

            match mapping.property_mapping(&"p".to_string(), Some(&node)) {
                Some(m) => {
                    prop_assert!(expected_hit, "entity {}: unexpected hit {}", start, m.rest_name);
                    let winner = decode_index(&m.rest_name);
                    prop_assert!(
                        reachable.contains(&winner),
                        "entity {}: winner {} is unrelated",
                        start, winner
                    );
                    prop_assert!(carries(winner));
                }
                None => prop_assert!(!expected_hit, "entity {}: expected a hit", start),
            }
        }
    }

    /// Without an expected entity, the search succeeds iff any mapped
    /// entity carries the property.
    #[test]
    fn unscoped_search_covers_the_whole_table(
        (parents, mapped, has_prop) in forest_strategy(),
    ) {
        let model = build_model(&parents);
        let mapping = build_mapping(&model, &mapped, &has_prop);
        let any_carrier = (0..parents.len()).any(|i| mapped[i] && has_prop[i]);

        let result = mapping.property_mapping(&"p".to_string(), None);
        prop_assert_eq!(result.is_some(), any_carrier);
        if let Some(m) = result {
            let winner = decode_index(&m.rest_name);
            prop_assert!(mapped[winner] && has_prop[winner]);
        }
    }
}
