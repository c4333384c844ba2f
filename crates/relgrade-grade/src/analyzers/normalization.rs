//! Normalization exercises: a decomposition of the base relation into named
//! fragments, checked against a target normal form.
//!
//! The decomposition as a whole is checked for coverage, losslessness and
//! dependency preservation. Every fragment is then re-derived on its own
//! (projected dependencies, keys, cover quality, normal form); fragments are
//! independent and run in parallel.

use std::collections::BTreeMap;

use rayon::prelude::*;
use relgrade_core::{
    analyze_keys, classify, is_lossless, lost_dependencies, member, missing_attributes,
    project_dependencies, AttributeSet, DependencySet, IdentifiedRelation, NormalformLevel,
    NormalformViolation, Relation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::keys::KeysAnalysis;
use super::minimal_cover::CoverQuality;
use crate::specification::NormalizationSpecification;
use crate::{Analysis, GradeError, ViolationCategory};

// ---------------------------------------------------------------------------
// Per-fragment results
// ---------------------------------------------------------------------------

/// Submitted fragment dependencies compared with the ones the base relation
/// projects onto the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionAnalysis {
    pub projected_dependencies: DependencySet,
    pub missing_dependencies: DependencySet,
    pub additional_dependencies: DependencySet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentNormalform {
    pub target_level: NormalformLevel,
    pub level: NormalformLevel,
    pub violations: Vec<NormalformViolation>,
}

impl FragmentNormalform {
    pub fn reaches_target(&self) -> bool {
        self.level >= self.target_level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentAnalysis {
    pub projection: ProjectionAnalysis,
    pub keys: KeysAnalysis,
    pub cover: CoverQuality,
    pub normalform: FragmentNormalform,
}

impl Analysis for FragmentAnalysis {
    fn suits_solution(&self) -> bool {
        self.projection.missing_dependencies.is_empty()
            && self.projection.additional_dependencies.is_empty()
            && self.keys.suits_solution()
            && self.cover.suits_solution()
            && self.normalform.reaches_target()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        let mut findings = vec![
            (
                ViolationCategory::MissingProjectedDependency,
                self.projection.missing_dependencies.len(),
            ),
            (
                ViolationCategory::AdditionalProjectedDependency,
                self.projection.additional_dependencies.len(),
            ),
        ];
        findings.extend(self.keys.findings());
        findings.extend(self.cover.findings());
        findings.push((
            ViolationCategory::IncorrectFragmentNormalform,
            usize::from(!self.normalform.reaches_target()),
        ));
        findings
    }
}

fn analyze_fragment(
    base: &Relation,
    fragment: &IdentifiedRelation,
    target_level: NormalformLevel,
) -> Result<FragmentAnalysis, GradeError> {
    let submitted = &fragment.relation;
    let projected = project_dependencies(base, &submitted.attributes)?;

    let projection = ProjectionAnalysis {
        missing_dependencies: projected
            .iter()
            .filter(|d| !member(d, &submitted.functional_dependencies))
            .cloned()
            .collect(),
        additional_dependencies: submitted
            .functional_dependencies
            .iter()
            .filter(|d| !member(d, &projected))
            .cloned()
            .collect(),
        projected_dependencies: projected.clone(),
    };

    // The fragment as it should be: submitted attributes and declared keys,
    // projected dependencies.
    let derived = Relation {
        attributes: submitted.attributes.clone(),
        functional_dependencies: projected,
        minimal_keys: submitted.minimal_keys.clone(),
    };
    let key_analysis = analyze_keys(&derived)?;
    let classified = classify(&derived, &key_analysis);

    let analysis = FragmentAnalysis {
        projection,
        keys: KeysAnalysis::compare(key_analysis.minimal_keys, &submitted.minimal_keys),
        cover: CoverQuality::of(&submitted.functional_dependencies),
        normalform: FragmentNormalform {
            target_level,
            level: classified.overall_level,
            violations: classified.violations,
        },
    };
    debug!(
        fragment = %fragment.id,
        suits = analysis.suits_solution(),
        level = %analysis.normalform.level,
        "analyzed fragment"
    );
    Ok(analysis)
}

// ---------------------------------------------------------------------------
// Whole decomposition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyPreservation {
    pub lost_dependencies: DependencySet,
    pub max_lost_dependencies: usize,
}

impl DependencyPreservation {
    /// Lost dependencies beyond the tolerated number.
    pub fn excessive(&self) -> usize {
        self.lost_dependencies
            .len()
            .saturating_sub(self.max_lost_dependencies)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationAnalysis {
    pub missing_attributes: AttributeSet,
    pub lossless: bool,
    pub dependency_preservation: DependencyPreservation,
    pub fragments: BTreeMap<String, FragmentAnalysis>,
}

impl Analysis for NormalizationAnalysis {
    fn suits_solution(&self) -> bool {
        self.missing_attributes.is_empty()
            && self.lossless
            && self.dependency_preservation.excessive() == 0
            && self.fragments.values().all(FragmentAnalysis::suits_solution)
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        let mut totals: BTreeMap<ViolationCategory, usize> = BTreeMap::new();
        totals.insert(ViolationCategory::LostAttribute, self.missing_attributes.len());
        totals.insert(ViolationCategory::LossyDecomposition, usize::from(!self.lossless));
        totals.insert(
            ViolationCategory::ExcessiveLostDependency,
            self.dependency_preservation.excessive(),
        );

        for fragment in self.fragments.values() {
            for (category, count) in fragment.findings() {
                *totals.entry(category).or_default() += count;
            }
        }

        totals.into_iter().collect()
    }
}

pub fn analyze_normalization(
    specification: &NormalizationSpecification,
    relations: &[IdentifiedRelation],
) -> Result<NormalizationAnalysis, GradeError> {
    let base = &specification.base_relation;
    let fragment_attributes: Vec<&AttributeSet> =
        relations.iter().map(|r| &r.relation.attributes).collect();

    let missing_attributes =
        missing_attributes(&base.attributes, fragment_attributes.iter().copied());
    let lossless = is_lossless(base, fragment_attributes.iter().copied());

    let fragments: BTreeMap<String, FragmentAnalysis> = relations
        .par_iter()
        .map(|r| -> Result<_, GradeError> {
            let analysis = analyze_fragment(base, r, specification.target_level)?;
            Ok((r.id.clone(), analysis))
        })
        .collect::<Result<_, _>>()?;

    let preserved: DependencySet = fragments
        .values()
        .flat_map(|f| f.projection.projected_dependencies.iter().cloned())
        .collect();
    let dependency_preservation = DependencyPreservation {
        lost_dependencies: lost_dependencies(&base.functional_dependencies, &preserved),
        max_lost_dependencies: specification.max_lost_dependencies,
    };

    let analysis = NormalizationAnalysis {
        missing_attributes,
        lossless,
        dependency_preservation,
        fragments,
    };
    info!(
        fragments = relations.len(),
        lossless = analysis.lossless,
        lost = analysis.dependency_preservation.lost_dependencies.len(),
        suits = analysis.suits_solution(),
        "analyzed normalization"
    );
    Ok(analysis)
}
