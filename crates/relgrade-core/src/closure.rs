//! Attribute closure and the implication tests built on it.
//!
//! Dependency collections are taken as `IntoIterator<Item = &FunctionalDependency> + Clone`,
//! so `&DependencySet`, slices and borrowed iterators work without copying dependencies.

use crate::types::{AttributeSet, FunctionalDependency};

/// Smallest superset of `seed` closed under `dependencies`.
pub fn closure<'a, D>(seed: &AttributeSet, dependencies: D) -> AttributeSet
where
    D: IntoIterator<Item = &'a FunctionalDependency> + Clone,
{
    let mut result = seed.clone();

    loop {
        let mut grew = false;
        for dependency in dependencies.clone() {
            if dependency.lhs().is_subset(&result) && !dependency.rhs().is_subset(&result) {
                result.extend(dependency.rhs().iter().cloned());
                grew = true;
            }
        }
        if !grew {
            return result;
        }
    }
}

/// Whether `dependency` is implied by `dependencies`.
pub fn member<'a, D>(dependency: &FunctionalDependency, dependencies: D) -> bool
where
    D: IntoIterator<Item = &'a FunctionalDependency> + Clone,
{
    dependency
        .rhs()
        .is_subset(&closure(dependency.lhs(), dependencies))
}

/// Whether every dependency of `dependencies` is implied by `by`.
pub fn cover<'a, 'b, A, B>(dependencies: A, by: B) -> bool
where
    A: IntoIterator<Item = &'a FunctionalDependency>,
    B: IntoIterator<Item = &'b FunctionalDependency> + Clone,
{
    dependencies.into_iter().all(|d| member(d, by.clone()))
}

/// Both sets imply each other.
pub fn equivalent<'a, 'b, A, B>(a: A, b: B) -> bool
where
    A: IntoIterator<Item = &'a FunctionalDependency> + Clone,
    B: IntoIterator<Item = &'b FunctionalDependency> + Clone,
{
    cover(a.clone(), b.clone()) && cover(b, a)
}

/// Whether `attributes` determines every attribute of `relation_attributes`.
pub fn is_superkey<'a, D>(
    attributes: &AttributeSet,
    relation_attributes: &AttributeSet,
    dependencies: D,
) -> bool
where
    D: IntoIterator<Item = &'a FunctionalDependency> + Clone,
{
    relation_attributes.is_subset(&closure(attributes, dependencies))
}
