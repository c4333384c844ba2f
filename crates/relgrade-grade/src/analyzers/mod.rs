//! One analyzer per exercise subtype.

pub mod closure;
pub mod keys;
pub mod minimal_cover;
pub mod normalform;
pub mod normalization;

pub use closure::{analyze_attribute_closure, AttributeClosureAnalysis};
pub use keys::{analyze_keys_determination, KeysAnalysis};
pub use minimal_cover::{analyze_minimal_cover, CoverQuality, MinimalCoverAnalysis};
pub use normalform::{analyze_normalform_determination, NormalformDeterminationAnalysis};
pub use normalization::{analyze_normalization, FragmentAnalysis, NormalizationAnalysis};

use serde::Serialize;

use crate::specification::Specification;
use crate::submission::Submission;
use crate::{Analysis, GradeError, ViolationCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExerciseAnalysis {
    AttributeClosure(AttributeClosureAnalysis),
    KeysDetermination(KeysAnalysis),
    MinimalCover(MinimalCoverAnalysis),
    NormalformDetermination(NormalformDeterminationAnalysis),
    Normalization(NormalizationAnalysis),
}

impl ExerciseAnalysis {
    fn inner(&self) -> &dyn Analysis {
        match self {
            Self::AttributeClosure(a) => a,
            Self::KeysDetermination(a) => a,
            Self::MinimalCover(a) => a,
            Self::NormalformDetermination(a) => a,
            Self::Normalization(a) => a,
        }
    }
}

impl Analysis for ExerciseAnalysis {
    fn suits_solution(&self) -> bool {
        self.inner().suits_solution()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        self.inner().findings()
    }
}

/// Run the analyzer matching the specification's subtype.
pub fn analyze(
    specification: &Specification,
    submission: &Submission,
) -> Result<ExerciseAnalysis, GradeError> {
    let analysis = match (specification, submission) {
        (Specification::AttributeClosure(spec), Submission::AttributeClosure { attributes }) => {
            ExerciseAnalysis::AttributeClosure(analyze_attribute_closure(spec, attributes))
        }
        (Specification::KeysDetermination(spec), Submission::KeysDetermination { keys }) => {
            ExerciseAnalysis::KeysDetermination(analyze_keys_determination(spec, keys)?)
        }
        (Specification::MinimalCover(spec), Submission::MinimalCover { dependencies }) => {
            ExerciseAnalysis::MinimalCover(analyze_minimal_cover(spec, dependencies))
        }
        (Specification::NormalformDetermination(spec), Submission::NormalformDetermination(s)) => {
            ExerciseAnalysis::NormalformDetermination(analyze_normalform_determination(spec, s)?)
        }
        (Specification::Normalization(spec), Submission::Normalization { relations }) => {
            ExerciseAnalysis::Normalization(analyze_normalization(spec, relations)?)
        }
        (spec, sub) => {
            return Err(GradeError::SubmissionMismatch {
                expected: spec.kind(),
                found: sub.kind(),
            })
        }
    };
    Ok(analysis)
}
