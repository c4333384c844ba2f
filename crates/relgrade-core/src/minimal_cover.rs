//! Minimal (canonical) cover reduction.
//!
//! Order: unfold, drop extraneous left-hand attributes, de-duplicate, drop
//! redundant dependencies. `fold` is only used to present a cover.

use std::collections::BTreeMap;

use tracing::debug;

use crate::closure::cover;
use crate::types::{Attribute, AttributeSet, DependencySet, FunctionalDependency};

/// One dependency per right-hand attribute.
pub fn unfold<'a, D>(dependencies: D) -> DependencySet
where
    D: IntoIterator<Item = &'a FunctionalDependency>,
{
    dependencies
        .into_iter()
        .flat_map(FunctionalDependency::unfold)
        .collect()
}

/// Merge dependencies sharing a left-hand side.
pub fn fold<'a, D>(dependencies: D) -> DependencySet
where
    D: IntoIterator<Item = &'a FunctionalDependency>,
{
    let mut by_lhs: BTreeMap<AttributeSet, AttributeSet> = BTreeMap::new();
    for dependency in dependencies {
        by_lhs
            .entry(dependency.lhs().clone())
            .or_default()
            .extend(dependency.rhs().iter().cloned());
    }

    by_lhs
        .into_iter()
        .map(|(lhs, rhs)| FunctionalDependency::new(lhs, rhs))
        .collect()
}

/// Left-hand attributes that can be dropped while the set stays equivalent.
///
/// Every dependency is tested against the full, unchanged input; attributes
/// already found extraneous for a dependency stay removed while its remaining
/// attributes are tested.
pub fn extraneous_attributes(
    dependencies: &DependencySet,
) -> BTreeMap<FunctionalDependency, Vec<Attribute>> {
    let mut extraneous: BTreeMap<FunctionalDependency, Vec<Attribute>> = BTreeMap::new();

    for dependency in dependencies {
        for attribute in dependency.lhs() {
            let mut reduced = dependency.without_lhs(attribute);
            if let Some(found) = extraneous.get(dependency) {
                for a in found {
                    reduced = reduced.without_lhs(a);
                }
            }

            // Swapping in the stronger dependency keeps equivalence exactly
            // when the original set already implies it.
            let mut candidate = dependencies.clone();
            candidate.remove(dependency);
            candidate.insert(reduced);

            if cover(&candidate, dependencies) {
                extraneous
                    .entry(dependency.clone())
                    .or_default()
                    .push(attribute.clone());
            }
        }
    }

    extraneous
}

/// Dependencies implied by the remaining ones.
///
/// Dependencies already found redundant are excluded from later tests, so two
/// dependencies that only imply each other are never both dropped.
pub fn redundant_dependencies(dependencies: &DependencySet) -> DependencySet {
    let mut redundant = DependencySet::new();

    for dependency in dependencies {
        let remaining: Vec<&FunctionalDependency> = dependencies
            .iter()
            .filter(|d| *d != dependency && !redundant.contains(*d))
            .collect();

        if cover(dependencies, remaining.iter().copied()) {
            redundant.insert(dependency.clone());
        }
    }

    redundant
}

/// An equivalent set with single-attribute right-hand sides, no extraneous
/// left-hand attributes and no redundant members.
pub fn minimal_cover<'a, D>(dependencies: D) -> DependencySet
where
    D: IntoIterator<Item = &'a FunctionalDependency>,
{
    let unfolded = unfold(dependencies);

    let extraneous = extraneous_attributes(&unfolded);
    debug!(count = extraneous.len(), "dependencies with extraneous attributes");

    // Rebuilding into a fresh set also removes duplicates that the reduction
    // may have produced.
    let reduced: DependencySet = unfolded
        .iter()
        .map(|d| match extraneous.get(d) {
            Some(attributes) => attributes.iter().fold(d.clone(), |acc, a| acc.without_lhs(a)),
            None => d.clone(),
        })
        .collect();

    let redundant = redundant_dependencies(&reduced);
    debug!(count = redundant.len(), "redundant dependencies");

    reduced.difference(&redundant).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::equivalent;
    use pretty_assertions::assert_eq;

    fn deps(items: &[&str]) -> DependencySet {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn unfold_and_fold_are_inverse_for_canonical_input() {
        let f = deps(&["A -> B, C", "B -> D"]);
        let unfolded = unfold(&f);
        assert_eq!(unfolded, deps(&["A -> B", "A -> C", "B -> D"]));
        assert_eq!(fold(&unfolded), f);
    }

    #[test]
    fn removes_transitively_redundant_dependency() {
        let f = deps(&["A -> B", "B -> C", "A -> C"]);
        assert_eq!(minimal_cover(&f), deps(&["A -> B", "B -> C"]));
    }

    #[test]
    fn removes_extraneous_attribute() {
        let f = deps(&["A -> B", "A, B -> C"]);
        let extraneous = extraneous_attributes(&f);
        let fd: FunctionalDependency = "A, B -> C".parse().unwrap();
        assert_eq!(extraneous.get(&fd), Some(&vec![Attribute::from("B")]));
        assert_eq!(minimal_cover(&f), deps(&["A -> B", "A -> C"]));
    }

    #[test]
    fn drops_trivial_dependencies() {
        let f = deps(&["A, B -> A", "A -> C"]);
        assert_eq!(minimal_cover(&f), deps(&["A -> C"]));
    }

    #[test]
    fn mutually_implied_dependencies_keep_one() {
        let f = deps(&["A -> B", "B -> A", "A -> C", "B -> C"]);
        let reduced = minimal_cover(&f);
        assert_eq!(reduced.len(), 3);
        assert!(equivalent(&reduced, &f));
    }
}
