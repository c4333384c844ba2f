//! Per-dependency normal form classification.
//!
//! Each dependency is tested against 2NF, 3NF and BCNF in that order and is
//! assigned the first level it violates. 1NF holds by construction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::closure::is_superkey;
use crate::error::SchemaError;
use crate::keys::{analyze_keys, KeyAnalysis};
use crate::types::{AttributeSet, FunctionalDependency, Key, NormalformLevel, Relation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalformViolation {
    /// The left-hand side is part of a key and determines non-prime attributes.
    #[serde(rename_all = "camelCase")]
    Second {
        dependency: FunctionalDependency,
        partial_key: Key,
        non_prime_attributes: AttributeSet,
    },
    /// A non-key left-hand side determines non-prime attributes.
    #[serde(rename_all = "camelCase")]
    Third {
        dependency: FunctionalDependency,
        non_prime_attributes: AttributeSet,
    },
    /// The left-hand side is not a superkey.
    BoyceCodd { dependency: FunctionalDependency },
}

impl NormalformViolation {
    pub fn dependency(&self) -> &FunctionalDependency {
        match self {
            Self::Second { dependency, .. }
            | Self::Third { dependency, .. }
            | Self::BoyceCodd { dependency } => dependency,
        }
    }

    /// The normal form this violation breaks.
    pub fn level(&self) -> NormalformLevel {
        match self {
            Self::Second { .. } => NormalformLevel::Second,
            Self::Third { .. } => NormalformLevel::Third,
            Self::BoyceCodd { .. } => NormalformLevel::BoyceCodd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalformAnalysis {
    pub overall_level: NormalformLevel,
    pub violations: Vec<NormalformViolation>,
}

impl NormalformAnalysis {
    /// The level `dependency` violates, `None` if it satisfies BCNF.
    pub fn violated_level(&self, dependency: &FunctionalDependency) -> Option<NormalformLevel> {
        self.violations
            .iter()
            .find(|v| v.dependency() == dependency)
            .map(NormalformViolation::level)
    }

    pub fn violations_of(&self, level: NormalformLevel) -> impl Iterator<Item = &NormalformViolation> {
        self.violations.iter().filter(move |v| v.level() == level)
    }
}

fn classify_dependency(
    dependency: &FunctionalDependency,
    relation: &Relation,
    keys: &KeyAnalysis,
) -> Option<NormalformViolation> {
    let lhs = dependency.lhs();
    let non_prime = |attributes: &AttributeSet| -> AttributeSet {
        attributes
            .difference(&keys.prime_attributes)
            .cloned()
            .collect()
    };

    let partial_key = Key::new(lhs.clone());
    if keys.partial_keys.contains(&partial_key) {
        let non_prime_attributes = non_prime(dependency.rhs());
        if !non_prime_attributes.is_empty() {
            return Some(NormalformViolation::Second {
                dependency: dependency.clone(),
                partial_key,
                non_prime_attributes,
            });
        }
    }

    if is_superkey(lhs, &relation.attributes, &relation.functional_dependencies) {
        return None;
    }

    let determined: AttributeSet = dependency.rhs().difference(lhs).cloned().collect();
    let non_prime_attributes = non_prime(&determined);
    if !non_prime_attributes.is_empty() {
        return Some(NormalformViolation::Third {
            dependency: dependency.clone(),
            non_prime_attributes,
        });
    }

    Some(NormalformViolation::BoyceCodd {
        dependency: dependency.clone(),
    })
}

/// Classify every dependency of `relation` given its correct keys.
///
/// With no dependencies the relation is in BCNF when its declared keys are
/// among the correct ones, otherwise it is only in 1NF.
pub fn classify(relation: &Relation, keys: &KeyAnalysis) -> NormalformAnalysis {
    let violations: Vec<NormalformViolation> = relation
        .functional_dependencies
        .iter()
        .filter_map(|d| classify_dependency(d, relation, keys))
        .collect();

    let overall_level = if relation.functional_dependencies.is_empty() {
        if relation.minimal_keys.is_subset(&keys.minimal_keys) {
            NormalformLevel::BoyceCodd
        } else {
            NormalformLevel::First
        }
    } else {
        violations
            .iter()
            .map(|v| match v.level() {
                NormalformLevel::Second => NormalformLevel::First,
                NormalformLevel::Third => NormalformLevel::Second,
                _ => NormalformLevel::Third,
            })
            .min()
            .unwrap_or(NormalformLevel::BoyceCodd)
    };

    debug!(%overall_level, violations = violations.len(), "classified relation");
    NormalformAnalysis {
        overall_level,
        violations,
    }
}

/// Derive keys and classify in one step.
pub fn determine_normalform(relation: &Relation) -> Result<NormalformAnalysis, SchemaError> {
    let keys = analyze_keys(relation)?;
    Ok(classify(relation, &keys))
}
