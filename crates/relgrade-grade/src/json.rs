//! JSON-in, JSON-out entry point for embedding the grader.

use serde::Serialize;

use crate::grading::{grade, SubmissionMode};
use crate::specification::Task;
use crate::submission::ParsedSubmission;
use crate::GradeError;

#[derive(Debug, Serialize)]
pub struct JsonResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn failure(error: impl ToString) -> String {
    to_json(&JsonResult::<()> {
        success: false,
        data: None,
        error: Some(error.to_string()),
    })
}

fn to_json<T: Serialize>(result: &JsonResult<T>) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"JSON serialization error: {e}"}}"#)
    })
}

/// Grade a submission.
///
/// Input: a task and a parsed submission, both as JSON.
/// Output: `{ "success": true, "data": <grading> }` or
/// `{ "success": false, "error": "..." }`.
pub fn grade_to_json(task_json: &str, submission_json: &str, mode: SubmissionMode) -> String {
    let task: Task = match serde_json::from_str(task_json) {
        Ok(t) => t,
        Err(e) => return failure(GradeError::InvalidTask(e)),
    };
    let parsed: ParsedSubmission = match serde_json::from_str(submission_json) {
        Ok(s) => s,
        Err(e) => return failure(GradeError::InvalidSubmission(e)),
    };

    match grade(&task, &parsed, mode) {
        Ok(grading) => to_json(&JsonResult {
            success: true,
            data: Some(grading),
            error: None,
        }),
        Err(e) => failure(e),
    }
}
