//! Exercise specifications as stored with a task.
//!
//! Penalty weights are points deducted per finding; absent weights are `0`.

use relgrade_core::{AttributeSet, NormalformLevel, Relation};
use serde::{Deserialize, Serialize};

use crate::ViolationCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub max_points: f64,
    pub specification: Specification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Specification {
    AttributeClosure(AttributeClosureSpecification),
    KeysDetermination(KeysDeterminationSpecification),
    MinimalCover(MinimalCoverSpecification),
    NormalformDetermination(NormalformDeterminationSpecification),
    Normalization(NormalizationSpecification),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeClosureSpecification {
    pub base_relation: Relation,
    pub base_attributes: AttributeSet,
    #[serde(default)]
    pub penalty_per_missing_attribute: f64,
    #[serde(default)]
    pub penalty_per_incorrect_attribute: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysDeterminationSpecification {
    pub base_relation: Relation,
    #[serde(default)]
    pub penalty_per_missing_key: f64,
    #[serde(default)]
    pub penalty_per_incorrect_key: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalCoverSpecification {
    pub base_relation: Relation,
    #[serde(default)]
    pub penalty_per_non_canonical_dependency: f64,
    #[serde(default)]
    pub penalty_per_trivial_dependency: f64,
    #[serde(default)]
    pub penalty_per_extraneous_attribute: f64,
    #[serde(default)]
    pub penalty_per_redundant_dependency: f64,
    #[serde(default)]
    pub penalty_per_missing_dependency_vs_solution: f64,
    #[serde(default)]
    pub penalty_per_incorrect_dependency_vs_solution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalformDeterminationSpecification {
    pub base_relation: Relation,
    #[serde(default, rename = "penaltyForIncorrectNFOverall")]
    pub penalty_for_incorrect_nf_overall: f64,
    #[serde(default, rename = "penaltyPerIncorrectNFDependency")]
    pub penalty_per_incorrect_nf_dependency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationSpecification {
    pub base_relation: Relation,
    pub target_level: NormalformLevel,
    #[serde(default)]
    pub max_lost_dependencies: usize,
    #[serde(default)]
    pub penalty_per_lost_attribute: f64,
    #[serde(default)]
    pub penalty_for_lossy_decomposition: f64,
    #[serde(default)]
    pub penalty_per_non_canonical_dependency: f64,
    #[serde(default)]
    pub penalty_per_trivial_dependency: f64,
    #[serde(default)]
    pub penalty_per_extraneous_attribute_in_dependencies: f64,
    #[serde(default)]
    pub penalty_per_redundant_dependency: f64,
    #[serde(default)]
    pub penalty_per_excessive_lost_dependency: f64,
    #[serde(default)]
    pub penalty_per_missing_new_dependency: f64,
    #[serde(default)]
    pub penalty_per_incorrect_new_dependency: f64,
    #[serde(default)]
    pub penalty_per_missing_key: f64,
    #[serde(default)]
    pub penalty_per_incorrect_key: f64,
    #[serde(default, rename = "penaltyPerIncorrectNFRelation")]
    pub penalty_per_incorrect_nf_relation: f64,
}

impl Specification {
    /// The `"type"` tag of this exercise subtype.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AttributeClosure(_) => "attributeClosure",
            Self::KeysDetermination(_) => "keysDetermination",
            Self::MinimalCover(_) => "minimalCover",
            Self::NormalformDetermination(_) => "normalformDetermination",
            Self::Normalization(_) => "normalization",
        }
    }

    pub fn base_relation(&self) -> &Relation {
        match self {
            Self::AttributeClosure(s) => &s.base_relation,
            Self::KeysDetermination(s) => &s.base_relation,
            Self::MinimalCover(s) => &s.base_relation,
            Self::NormalformDetermination(s) => &s.base_relation,
            Self::Normalization(s) => &s.base_relation,
        }
    }

    /// Weight of one finding of `category`; `0` where the subtype has no such
    /// penalty.
    pub fn penalty(&self, category: ViolationCategory) -> f64 {
        use ViolationCategory as C;

        match (self, category) {
            (Self::AttributeClosure(s), C::MissingAttribute) => s.penalty_per_missing_attribute,
            (Self::AttributeClosure(s), C::AdditionalAttribute) => s.penalty_per_incorrect_attribute,

            (Self::KeysDetermination(s), C::MissingKey) => s.penalty_per_missing_key,
            (Self::KeysDetermination(s), C::AdditionalKey) => s.penalty_per_incorrect_key,

            (Self::MinimalCover(s), C::NonCanonicalDependency) => {
                s.penalty_per_non_canonical_dependency
            }
            (Self::MinimalCover(s), C::TrivialDependency) => s.penalty_per_trivial_dependency,
            (Self::MinimalCover(s), C::ExtraneousAttribute) => s.penalty_per_extraneous_attribute,
            (Self::MinimalCover(s), C::RedundantDependency) => s.penalty_per_redundant_dependency,
            (Self::MinimalCover(s), C::MissingDependency) => {
                s.penalty_per_missing_dependency_vs_solution
            }
            (Self::MinimalCover(s), C::AdditionalDependency) => {
                s.penalty_per_incorrect_dependency_vs_solution
            }

            (Self::NormalformDetermination(s), C::IncorrectOverallNormalform) => {
                s.penalty_for_incorrect_nf_overall
            }
            (Self::NormalformDetermination(s), C::IncorrectDependencyNormalform) => {
                s.penalty_per_incorrect_nf_dependency
            }

            (Self::Normalization(s), category) => match category {
                C::LostAttribute => s.penalty_per_lost_attribute,
                C::LossyDecomposition => s.penalty_for_lossy_decomposition,
                C::NonCanonicalDependency => s.penalty_per_non_canonical_dependency,
                C::TrivialDependency => s.penalty_per_trivial_dependency,
                C::ExtraneousAttribute => s.penalty_per_extraneous_attribute_in_dependencies,
                C::RedundantDependency => s.penalty_per_redundant_dependency,
                C::ExcessiveLostDependency => s.penalty_per_excessive_lost_dependency,
                C::MissingProjectedDependency => s.penalty_per_missing_new_dependency,
                C::AdditionalProjectedDependency => s.penalty_per_incorrect_new_dependency,
                C::MissingKey => s.penalty_per_missing_key,
                C::AdditionalKey => s.penalty_per_incorrect_key,
                C::IncorrectFragmentNormalform => s.penalty_per_incorrect_nf_relation,
                _ => 0.0,
            },

            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reads_tagged_specification_with_default_penalties() {
        let task: Task = serde_json::from_value(json!({
            "maxPoints": 10,
            "specification": {
                "type": "normalformDetermination",
                "baseRelation": { "attributes": ["A", "B"], "functionalDependencies": ["A -> B"] },
                "penaltyForIncorrectNFOverall": 2.5
            }
        }))
        .unwrap();

        assert_eq!(task.max_points, 10.0);
        assert_eq!(task.specification.kind(), "normalformDetermination");
        assert_eq!(
            task.specification.penalty(ViolationCategory::IncorrectOverallNormalform),
            2.5
        );
        assert_eq!(
            task.specification.penalty(ViolationCategory::IncorrectDependencyNormalform),
            0.0
        );
    }

    #[test]
    fn unrelated_categories_weigh_nothing() {
        let spec: Specification = serde_json::from_value(json!({
            "type": "keysDetermination",
            "baseRelation": { "attributes": ["A"] },
            "penaltyPerMissingKey": 1,
            "penaltyPerIncorrectKey": 1
        }))
        .unwrap();

        assert_eq!(spec.penalty(ViolationCategory::MissingKey), 1.0);
        assert_eq!(spec.penalty(ViolationCategory::LossyDecomposition), 0.0);
    }

    #[test]
    fn normalization_requires_target_level() {
        let err = serde_json::from_value::<Specification>(json!({
            "type": "normalization",
            "baseRelation": { "attributes": ["A"] }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("targetLevel"));
    }
}
