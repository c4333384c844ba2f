use std::path::Path;

use relgrade_grade::{grade, Grading, ParsedSubmission, Submission, SubmissionMode, Task};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{to_pretty_json, OutputFormat};
use crate::reader::{read_document, read_input_files, InputFile};

/// A submission file holds either a bare submission or the parser's output.
/// Bare submissions carry a `"type"` tag and are tried first.
#[derive(Deserialize)]
#[serde(untagged)]
enum SubmissionDocument {
    Bare(Submission),
    Parsed(ParsedSubmission),
}

impl From<SubmissionDocument> for ParsedSubmission {
    fn from(document: SubmissionDocument) -> Self {
        match document {
            SubmissionDocument::Parsed(parsed) => parsed,
            SubmissionDocument::Bare(submission) => ParsedSubmission::new(submission),
        }
    }
}

fn parse_mode(mode: &str) -> Result<SubmissionMode, String> {
    match mode {
        "submit" => Ok(SubmissionMode::Submit),
        "run" => Ok(SubmissionMode::Run),
        other => Err(format!(
            "Unknown submission mode \"{other}\" (expected submit or run)"
        )),
    }
}

fn grade_file(task: &Task, file: &InputFile, mode: SubmissionMode) -> Result<Grading, String> {
    let document: SubmissionDocument = file.parse()?;
    debug!(path = %file.path, "grading submission");
    grade(task, &document.into(), mode).map_err(|e| format!("{}: {e}", file.path))
}

pub fn run_grade(
    task_path: &Path,
    submission_path: &Path,
    mode: &str,
    format: &str,
) -> Result<String, String> {
    let format = OutputFormat::parse(format)?;
    let mode = parse_mode(mode)?;
    let task: Task = read_document(task_path)?;

    let files = read_input_files(submission_path)?;
    if files.is_empty() {
        return Err(format!(
            "No submission files found in {}",
            submission_path.display()
        ));
    }

    let gradings = files
        .iter()
        .map(|file| grade_file(&task, file, mode).map(|grading| (file, grading)))
        .collect::<Result<Vec<_>, String>>()?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = gradings
                .iter()
                .map(|(file, grading)| json!({ "file": file.path, "grading": grading }))
                .collect();
            if let [single] = entries.as_slice() {
                to_pretty_json(single)
            } else {
                to_pretty_json(&entries)
            }
        }
        OutputFormat::Human => Ok(gradings
            .iter()
            .map(|(file, grading)| format_human(&file.path, grading))
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

fn format_human(path: &str, grading: &Grading) -> String {
    let mut lines = vec![path.to_string()];

    if grading.syntax.passed {
        lines.push("  syntax: passed".to_string());
    } else {
        lines.push("  syntax: failed".to_string());
        for error in &grading.syntax.errors {
            lines.push(format!("    {error}"));
        }
    }

    for criterion in &grading.criteria {
        lines.push(format!(
            "  {}: {} × {} = -{}",
            criterion.category, criterion.count, criterion.penalty, criterion.deduction
        ));
    }

    let verdict = if grading.suits_solution {
        " (suits solution)"
    } else {
        ""
    };
    lines.push(format!(
        "  points: {}/{}{verdict}",
        grading.points, grading.max_points
    ));

    lines.join("\n")
}
