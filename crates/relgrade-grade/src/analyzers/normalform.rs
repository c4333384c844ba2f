//! Normal form determination exercises.

use relgrade_core::{determine_normalform, FunctionalDependency, NormalformLevel, NormalformViolation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::specification::NormalformDeterminationSpecification;
use crate::submission::NormalformDeterminationSubmission;
use crate::{Analysis, GradeError, ViolationCategory};

/// A dependency whose submitted violated level differs from the correct one.
/// `None` stands for "violates nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongLeveledDependency {
    pub dependency: FunctionalDependency,
    pub correct_level: Option<NormalformLevel>,
    pub submitted_level: Option<NormalformLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalformDeterminationAnalysis {
    pub correct_overall_level: NormalformLevel,
    pub submitted_overall_level: NormalformLevel,
    pub violations: Vec<NormalformViolation>,
    pub wrong_leveled_dependencies: Vec<WrongLeveledDependency>,
}

impl NormalformDeterminationAnalysis {
    pub fn overall_level_matches(&self) -> bool {
        self.correct_overall_level == self.submitted_overall_level
    }
}

impl Analysis for NormalformDeterminationAnalysis {
    fn suits_solution(&self) -> bool {
        self.overall_level_matches() && self.wrong_leveled_dependencies.is_empty()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        vec![
            (
                ViolationCategory::IncorrectOverallNormalform,
                usize::from(!self.overall_level_matches()),
            ),
            (
                ViolationCategory::IncorrectDependencyNormalform,
                self.wrong_leveled_dependencies.len(),
            ),
        ]
    }
}

pub fn analyze_normalform_determination(
    specification: &NormalformDeterminationSpecification,
    submission: &NormalformDeterminationSubmission,
) -> Result<NormalformDeterminationAnalysis, GradeError> {
    let base = &specification.base_relation;
    let correct = determine_normalform(base)?;
    let submitted = submission.violated_levels();

    let wrong_leveled_dependencies = base
        .functional_dependencies
        .iter()
        .filter_map(|dependency| {
            let correct_level = correct.violated_level(dependency);
            let submitted_level = submitted.get(dependency).copied();
            (correct_level != submitted_level).then(|| WrongLeveledDependency {
                dependency: dependency.clone(),
                correct_level,
                submitted_level,
            })
        })
        .collect();

    let analysis = NormalformDeterminationAnalysis {
        correct_overall_level: correct.overall_level,
        submitted_overall_level: submission.overall_level,
        violations: correct.violations,
        wrong_leveled_dependencies,
    };
    info!(
        correct = %analysis.correct_overall_level,
        submitted = %analysis.submitted_overall_level,
        wrong = analysis.wrong_leveled_dependencies.len(),
        "analyzed normal form determination"
    );
    Ok(analysis)
}
