//! Minimal cover exercises.
//!
//! [`CoverQuality`] only looks at the submitted set itself and is shared with
//! the per-fragment checks of normalization exercises.

use relgrade_core::minimal_cover::{extraneous_attributes, redundant_dependencies};
use relgrade_core::{fold, member, minimal_cover, Attribute, DependencySet, FunctionalDependency};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::specification::MinimalCoverSpecification;
use crate::{Analysis, ViolationCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraneousAttributes {
    pub dependency: FunctionalDependency,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverQuality {
    pub non_canonical_dependencies: DependencySet,
    pub trivial_dependencies: DependencySet,
    pub extraneous_attributes: Vec<ExtraneousAttributes>,
    pub redundant_dependencies: DependencySet,
}

impl CoverQuality {
    pub fn of(dependencies: &DependencySet) -> Self {
        let quality = Self {
            non_canonical_dependencies: dependencies
                .iter()
                .filter(|d| !d.is_canonical())
                .cloned()
                .collect(),
            trivial_dependencies: dependencies
                .iter()
                .filter(|d| d.is_trivial())
                .cloned()
                .collect(),
            extraneous_attributes: extraneous_attributes(dependencies)
                .into_iter()
                .map(|(dependency, attributes)| ExtraneousAttributes {
                    dependency,
                    attributes,
                })
                .collect(),
            redundant_dependencies: redundant_dependencies(dependencies),
        };
        debug!(?quality, "checked cover quality");
        quality
    }

    pub fn extraneous_attribute_count(&self) -> usize {
        self.extraneous_attributes
            .iter()
            .map(|e| e.attributes.len())
            .sum()
    }

    pub fn is_minimal(&self) -> bool {
        self.non_canonical_dependencies.is_empty()
            && self.trivial_dependencies.is_empty()
            && self.extraneous_attributes.is_empty()
            && self.redundant_dependencies.is_empty()
    }
}

impl Analysis for CoverQuality {
    fn suits_solution(&self) -> bool {
        self.is_minimal()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        vec![
            (
                ViolationCategory::NonCanonicalDependency,
                self.non_canonical_dependencies.len(),
            ),
            (ViolationCategory::TrivialDependency, self.trivial_dependencies.len()),
            (
                ViolationCategory::ExtraneousAttribute,
                self.extraneous_attribute_count(),
            ),
            (
                ViolationCategory::RedundantDependency,
                self.redundant_dependencies.len(),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalCoverAnalysis {
    /// Folded reference cover of the base dependencies.
    pub reference_cover: DependencySet,
    #[serde(flatten)]
    pub quality: CoverQuality,
    /// Base dependencies the submission does not imply.
    pub missing_dependencies: DependencySet,
    /// Submitted dependencies the base dependencies do not imply.
    pub additional_dependencies: DependencySet,
}

impl Analysis for MinimalCoverAnalysis {
    fn suits_solution(&self) -> bool {
        self.quality.is_minimal()
            && self.missing_dependencies.is_empty()
            && self.additional_dependencies.is_empty()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        let mut findings = self.quality.findings();
        findings.push((
            ViolationCategory::MissingDependency,
            self.missing_dependencies.len(),
        ));
        findings.push((
            ViolationCategory::AdditionalDependency,
            self.additional_dependencies.len(),
        ));
        findings
    }
}

pub fn analyze_minimal_cover(
    specification: &MinimalCoverSpecification,
    submitted: &DependencySet,
) -> MinimalCoverAnalysis {
    let base = &specification.base_relation.functional_dependencies;

    let analysis = MinimalCoverAnalysis {
        reference_cover: fold(&minimal_cover(base)),
        quality: CoverQuality::of(submitted),
        missing_dependencies: base
            .iter()
            .filter(|d| !member(d, submitted))
            .cloned()
            .collect(),
        additional_dependencies: submitted
            .iter()
            .filter(|d| !member(d, base))
            .cloned()
            .collect(),
    };
    info!(
        suits = analysis.suits_solution(),
        missing = analysis.missing_dependencies.len(),
        additional = analysis.additional_dependencies.len(),
        "analyzed minimal cover"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relgrade_core::{attribute_set, Relation};

    fn deps(items: &[&str]) -> DependencySet {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn specification(base: &[&str]) -> MinimalCoverSpecification {
        MinimalCoverSpecification {
            base_relation: Relation::new(attribute_set(["A", "B", "C", "D"]), deps(base)),
            penalty_per_non_canonical_dependency: 1.0,
            penalty_per_trivial_dependency: 1.0,
            penalty_per_extraneous_attribute: 1.0,
            penalty_per_redundant_dependency: 1.0,
            penalty_per_missing_dependency_vs_solution: 1.0,
            penalty_per_incorrect_dependency_vs_solution: 1.0,
        }
    }

    #[test]
    fn reference_cover_suits_solution() {
        let spec = specification(&["A -> B", "B -> C", "A -> C"]);
        let analysis = analyze_minimal_cover(&spec, &deps(&["A -> B", "B -> C"]));
        assert!(analysis.suits_solution());
        assert_eq!(analysis.reference_cover, deps(&["A -> B", "B -> C"]));
    }

    #[test]
    fn unreduced_submission_is_flagged() {
        let spec = specification(&["A -> B", "B -> C", "A -> C"]);
        let submitted = deps(&["A -> B, C", "B -> C", "A, B -> C"]);
        let analysis = analyze_minimal_cover(&spec, &submitted);

        assert!(!analysis.suits_solution());
        assert_eq!(analysis.quality.non_canonical_dependencies, deps(&["A -> B, C"]));
        // A is extraneous in A, B -> C; B is not once A is gone.
        assert_eq!(analysis.quality.extraneous_attribute_count(), 1);
        assert_eq!(analysis.quality.redundant_dependencies, deps(&["A, B -> C"]));
        assert!(analysis.missing_dependencies.is_empty());
        assert!(analysis.additional_dependencies.is_empty());
    }

    #[test]
    fn trivial_dependency_is_reported() {
        let spec = specification(&["A -> B"]);
        let analysis = analyze_minimal_cover(&spec, &deps(&["A -> B", "A, B -> B"]));
        assert_eq!(analysis.quality.trivial_dependencies, deps(&["A, B -> B"]));
        let trivial: FunctionalDependency = "A, B -> B".parse().unwrap();
        assert!(analysis.quality.redundant_dependencies.contains(&trivial));
    }

    #[test]
    fn cover_comparison_in_both_directions() {
        let spec = specification(&["A -> B", "B -> C"]);
        let analysis = analyze_minimal_cover(&spec, &deps(&["A -> B", "C -> D"]));
        assert_eq!(analysis.missing_dependencies, deps(&["B -> C"]));
        assert_eq!(analysis.additional_dependencies, deps(&["C -> D"]));
        assert_eq!(
            analysis.findings()[4..].to_vec(),
            vec![
                (ViolationCategory::MissingDependency, 1),
                (ViolationCategory::AdditionalDependency, 1)
            ]
        );
    }
}
