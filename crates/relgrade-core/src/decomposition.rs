//! Structural checks for decompositions of a base relation into fragments.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::closure::{closure, member};
use crate::error::SchemaError;
use crate::keys::ensure_searchable;
use crate::minimal_cover::{minimal_cover, unfold};
use crate::types::{AttributeSet, DependencySet, FunctionalDependency, Relation};

/// Base attributes that no fragment contains.
pub fn missing_attributes<'a, F>(base: &AttributeSet, fragments: F) -> AttributeSet
where
    F: IntoIterator<Item = &'a AttributeSet>,
{
    let covered: AttributeSet = fragments.into_iter().flatten().cloned().collect();
    base.difference(&covered).cloned().collect()
}

/// Tableau chase: the decomposition is lossless iff chasing the base
/// dependencies yields a row of distinguished symbols only.
///
/// Symbol `0` is the distinguished symbol of its column; every other symbol is
/// unique to the row and column it started in.
pub fn is_lossless<'a, F>(base: &Relation, fragments: F) -> bool
where
    F: IntoIterator<Item = &'a AttributeSet>,
{
    let columns: Vec<_> = base.attributes.iter().collect();
    let column_of = |a| columns.iter().position(|c| *c == a);

    let mut rows: Vec<Vec<usize>> = fragments
        .into_iter()
        .enumerate()
        .map(|(r, fragment)| {
            columns
                .iter()
                .enumerate()
                .map(|(c, a)| {
                    if fragment.contains(*a) {
                        0
                    } else {
                        r * columns.len() + c + 1
                    }
                })
                .collect()
        })
        .collect();
    if rows.is_empty() {
        return false;
    }

    // Dependencies as (lhs columns, rhs column); anything outside the base is ignored.
    let rules: Vec<(Vec<usize>, usize)> = unfold(&base.functional_dependencies)
        .iter()
        .filter_map(|d| {
            let lhs: Option<Vec<usize>> = d.lhs().iter().map(column_of).collect();
            let rhs = d.rhs().iter().next().and_then(column_of)?;
            Some((lhs?, rhs))
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for (lhs, rhs) in &rules {
            for i in 0..rows.len() {
                for j in (i + 1)..rows.len() {
                    if !lhs.iter().all(|&c| rows[i][c] == rows[j][c]) {
                        continue;
                    }
                    let (a, b) = (rows[i][*rhs], rows[j][*rhs]);
                    if a == b {
                        continue;
                    }
                    let (keep, replace) = (a.min(b), a.max(b));
                    for row in rows.iter_mut() {
                        if row[*rhs] == replace {
                            row[*rhs] = keep;
                        }
                    }
                    changed = true;
                }
            }
        }
    }

    rows.iter().any(|row| row.iter().all(|&s| s == 0))
}

/// Reduction by Resolution: the minimal cover of the dependencies the base
/// relation implies among `attributes`.
///
/// For each subset `X` of `attributes` (empty set included) the projected
/// dependency is `X -> (closure(X) ∩ attributes) \ X`, minus whatever a subset
/// of `X` with one attribute fewer already determines.
pub fn project_dependencies(
    base: &Relation,
    attributes: &AttributeSet,
) -> Result<DependencySet, SchemaError> {
    ensure_searchable(attributes.len())?;

    let deps = &base.functional_dependencies;
    let mut restricted: HashMap<AttributeSet, AttributeSet> = HashMap::new();
    let mut projected = DependencySet::new();

    for size in 0..=attributes.len() {
        for combination in attributes.iter().combinations(size) {
            let lhs: AttributeSet = combination.into_iter().cloned().collect();
            let reachable: AttributeSet = closure(&lhs, deps)
                .intersection(attributes)
                .cloned()
                .collect();

            let from_subsets: AttributeSet = lhs
                .iter()
                .filter_map(|a| {
                    let mut smaller = lhs.clone();
                    smaller.remove(a);
                    restricted.get(&smaller)
                })
                .flatten()
                .cloned()
                .collect();

            let rhs: AttributeSet = reachable
                .iter()
                .filter(|a| !lhs.contains(*a) && !from_subsets.contains(*a))
                .cloned()
                .collect();
            if !rhs.is_empty() {
                projected.insert(FunctionalDependency::new(lhs.clone(), rhs));
            }

            restricted.insert(lhs, reachable);
        }
    }

    debug!(
        attributes = attributes.len(),
        projected = projected.len(),
        "projected dependencies onto fragment"
    );
    Ok(minimal_cover(&projected))
}

/// Base dependencies not implied by `preserved`.
pub fn lost_dependencies<'a, B>(base: B, preserved: &DependencySet) -> DependencySet
where
    B: IntoIterator<Item = &'a FunctionalDependency>,
{
    base.into_iter()
        .filter(|d| !member(d, preserved))
        .cloned()
        .collect()
}
