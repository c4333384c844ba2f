//! Points arithmetic.
//!
//! `points = max(0, maxPoints - Σ count × penalty)` over every violation
//! category with findings. Syntax errors, including domain consistency
//! errors, award zero points without analysis.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzers::{analyze, ExerciseAnalysis};
use crate::specification::Task;
use crate::submission::{validate, ParsedSubmission};
use crate::{Analysis, GradeError, ViolationCategory};

const MISSING_SUBMISSION: &str = "No submission to grade";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    /// Syntax check only; no points are awarded.
    Run,
    #[default]
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxCriterion {
    pub passed: bool,
    pub errors: Vec<String>,
}

/// Points lost to one violation category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub category: ViolationCategory,
    pub count: usize,
    pub penalty: f64,
    pub deduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grading {
    pub max_points: f64,
    pub points: f64,
    pub suits_solution: bool,
    pub syntax: SyntaxCriterion,
    pub criteria: Vec<Criterion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ExerciseAnalysis>,
}

impl Grading {
    fn without_analysis(task: &Task, syntax: SyntaxCriterion) -> Self {
        Self {
            max_points: task.max_points,
            points: 0.0,
            suits_solution: false,
            syntax,
            criteria: Vec::new(),
            analysis: None,
        }
    }
}

pub fn grade(
    task: &Task,
    parsed: &ParsedSubmission,
    mode: SubmissionMode,
) -> Result<Grading, GradeError> {
    let specification = &task.specification;

    let (submission, errors) = match &parsed.submission {
        _ if !parsed.syntax_errors.is_empty() => (None, parsed.syntax_errors.clone()),
        Some(submission) => (Some(submission), validate(specification, submission)),
        None => (None, vec![MISSING_SUBMISSION.to_string()]),
    };
    let syntax = SyntaxCriterion {
        passed: errors.is_empty(),
        errors,
    };

    let submission = match submission {
        Some(submission) if syntax.passed && mode == SubmissionMode::Submit => submission,
        _ => {
            if !syntax.passed {
                warn!(errors = syntax.errors.len(), "submission has syntax errors");
            }
            return Ok(Grading::without_analysis(task, syntax));
        }
    };

    let analysis = analyze(specification, submission)?;

    let criteria: Vec<Criterion> = analysis
        .findings()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| {
            let penalty = specification.penalty(category);
            Criterion {
                category,
                count,
                penalty,
                deduction: count as f64 * penalty,
            }
        })
        .collect();

    let deducted: f64 = criteria.iter().map(|c| c.deduction).sum();
    let points = (task.max_points - deducted).max(0.0);
    info!(
        kind = specification.kind(),
        points,
        max_points = task.max_points,
        "graded submission"
    );

    Ok(Grading {
        max_points: task.max_points,
        points,
        suits_solution: analysis.suits_solution(),
        syntax,
        criteria,
        analysis: Some(analysis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::Submission;
    use pretty_assertions::assert_eq;
    use relgrade_core::attribute_set;
    use serde_json::json;

    fn closure_task() -> Task {
        serde_json::from_value(json!({
            "maxPoints": 4,
            "specification": {
                "type": "attributeClosure",
                "baseRelation": {
                    "attributes": ["A", "B", "C", "D"],
                    "functionalDependencies": ["A -> B", "B -> C"]
                },
                "baseAttributes": ["A"],
                "penaltyPerMissingAttribute": 1.5,
                "penaltyPerIncorrectAttribute": 1
            }
        }))
        .unwrap()
    }

    fn closure_submission(names: &[&str]) -> ParsedSubmission {
        ParsedSubmission::new(Submission::AttributeClosure {
            attributes: attribute_set(names.iter().copied()),
        })
    }

    #[test]
    fn correct_submission_keeps_all_points() {
        let grading = grade(
            &closure_task(),
            &closure_submission(&["A", "B", "C"]),
            SubmissionMode::Submit,
        )
        .unwrap();
        assert!(grading.syntax.passed);
        assert!(grading.suits_solution);
        assert_eq!(grading.points, 4.0);
        assert!(grading.criteria.is_empty());
    }

    #[test]
    fn deductions_are_weighted_per_category() {
        let grading = grade(
            &closure_task(),
            &closure_submission(&["A", "D"]),
            SubmissionMode::Submit,
        )
        .unwrap();
        assert_eq!(
            grading.criteria,
            vec![
                Criterion {
                    category: ViolationCategory::MissingAttribute,
                    count: 2,
                    penalty: 1.5,
                    deduction: 3.0,
                },
                Criterion {
                    category: ViolationCategory::AdditionalAttribute,
                    count: 1,
                    penalty: 1.0,
                    deduction: 1.0,
                },
            ]
        );
        assert_eq!(grading.points, 0.0);
    }

    #[test]
    fn points_never_drop_below_zero() {
        let grading = grade(
            &closure_task(),
            &closure_submission(&["D"]),
            SubmissionMode::Submit,
        )
        .unwrap();
        assert_eq!(grading.points, 0.0);
    }

    #[test]
    fn syntax_errors_skip_analysis() {
        let mut parsed = closure_submission(&["A"]);
        parsed.syntax_errors.push("line 1: unexpected token".into());
        let grading = grade(&closure_task(), &parsed, SubmissionMode::Submit).unwrap();

        assert!(!grading.syntax.passed);
        assert_eq!(grading.points, 0.0);
        assert!(grading.analysis.is_none());
    }

    #[test]
    fn rejected_submission_is_graded_without_answer() {
        let parsed =
            ParsedSubmission::with_syntax_errors(vec!["line 1: unexpected token".into()]);
        let grading = grade(&closure_task(), &parsed, SubmissionMode::Submit).unwrap();

        assert!(!grading.syntax.passed);
        assert_eq!(grading.syntax.errors, vec!["line 1: unexpected token".to_string()]);
        assert_eq!(grading.points, 0.0);
        assert!(grading.analysis.is_none());
    }

    #[test]
    fn missing_answer_without_errors_fails_syntax() {
        let parsed = ParsedSubmission::with_syntax_errors(Vec::new());
        let grading = grade(&closure_task(), &parsed, SubmissionMode::Submit).unwrap();

        assert!(!grading.syntax.passed);
        assert_eq!(grading.syntax.errors, vec![MISSING_SUBMISSION.to_string()]);
        assert_eq!(grading.points, 0.0);
    }

    #[test]
    fn unknown_attributes_become_syntax_errors() {
        let grading = grade(
            &closure_task(),
            &closure_submission(&["A", "Z"]),
            SubmissionMode::Submit,
        )
        .unwrap();
        assert!(!grading.syntax.passed);
        assert_eq!(grading.syntax.errors.len(), 1);
    }

    #[test]
    fn run_mode_reports_only_syntax() {
        let grading = grade(
            &closure_task(),
            &closure_submission(&["A", "B", "C"]),
            SubmissionMode::Run,
        )
        .unwrap();
        assert!(grading.syntax.passed);
        assert_eq!(grading.points, 0.0);
        assert!(grading.criteria.is_empty());
        assert!(grading.analysis.is_none());
    }
}
