//! Grading of relational schema design exercises.
//!
//! A [`Task`] names the exercise subtype, its base relation and the penalty
//! weight of every violation category. Analyzers compare a submission against
//! the reference solution derived by `relgrade_core` and report how often each
//! [`ViolationCategory`] occurs; [`grade`] turns those counts into points.

pub mod analyzers;
pub mod error;
pub mod grading;
pub mod json;
pub mod specification;
pub mod submission;

pub use error::GradeError;
pub use grading::{grade, Criterion, Grading, SubmissionMode};
pub use json::grade_to_json;
pub use specification::{Specification, Task};
pub use submission::{ParsedSubmission, Submission};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Violation categories
// ---------------------------------------------------------------------------

/// Every kind of finding that can cost points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationCategory {
    MissingAttribute,
    AdditionalAttribute,
    MissingKey,
    AdditionalKey,
    NonCanonicalDependency,
    TrivialDependency,
    ExtraneousAttribute,
    RedundantDependency,
    MissingDependency,
    AdditionalDependency,
    IncorrectOverallNormalform,
    IncorrectDependencyNormalform,
    LostAttribute,
    LossyDecomposition,
    ExcessiveLostDependency,
    MissingProjectedDependency,
    AdditionalProjectedDependency,
    IncorrectFragmentNormalform,
}

impl ViolationCategory {
    /// Stable identifier, e.g. `"missing-key"`.
    pub fn id(&self) -> &'static str {
        match self {
            Self::MissingAttribute => "missing-attribute",
            Self::AdditionalAttribute => "additional-attribute",
            Self::MissingKey => "missing-key",
            Self::AdditionalKey => "additional-key",
            Self::NonCanonicalDependency => "non-canonical-dependency",
            Self::TrivialDependency => "trivial-dependency",
            Self::ExtraneousAttribute => "extraneous-attribute",
            Self::RedundantDependency => "redundant-dependency",
            Self::MissingDependency => "missing-dependency",
            Self::AdditionalDependency => "additional-dependency",
            Self::IncorrectOverallNormalform => "incorrect-overall-normalform",
            Self::IncorrectDependencyNormalform => "incorrect-dependency-normalform",
            Self::LostAttribute => "lost-attribute",
            Self::LossyDecomposition => "lossy-decomposition",
            Self::ExcessiveLostDependency => "excessive-lost-dependency",
            Self::MissingProjectedDependency => "missing-projected-dependency",
            Self::AdditionalProjectedDependency => "additional-projected-dependency",
            Self::IncorrectFragmentNormalform => "incorrect-fragment-normalform",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Analysis trait
// ---------------------------------------------------------------------------

/// Result of comparing one submission with the reference solution.
pub trait Analysis {
    /// Whether the submission matches the reference solution.
    fn suits_solution(&self) -> bool;

    /// Number of findings per category. Categories without findings may be
    /// omitted.
    fn findings(&self) -> Vec<(ViolationCategory, usize)>;
}
