use relgrade_grade::{grade_to_json, SubmissionMode};
use serde_json::{json, Value};

fn assert_success(json: &str) -> Value {
    let v: Value = serde_json::from_str(json).expect("valid JSON");
    assert_eq!(v["success"], true, "expected success=true, got: {json}");
    v
}

fn assert_failure(json: &str) -> Value {
    let v: Value = serde_json::from_str(json).expect("valid JSON");
    assert_eq!(v["success"], false, "expected success=false, got: {json}");
    v
}

fn keys_task() -> String {
    json!({
        "maxPoints": 6,
        "specification": {
            "type": "keysDetermination",
            "baseRelation": {
                "attributes": ["A", "B", "C", "D"],
                "functionalDependencies": ["A, B -> C", "C -> D"]
            },
            "penaltyPerMissingKey": 2,
            "penaltyPerIncorrectKey": 1
        }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// grade_to_json
// ---------------------------------------------------------------------------

#[test]
fn json_grade_correct_keys() {
    let submission = json!({
        "submission": { "type": "keysDetermination", "keys": [["A", "B"]] }
    });
    let result = grade_to_json(&keys_task(), &submission.to_string(), SubmissionMode::Submit);
    let v = assert_success(&result);

    assert_eq!(v["data"]["points"], 6.0);
    assert_eq!(v["data"]["suitsSolution"], true);
    assert_eq!(v["data"]["syntax"]["passed"], true);
    assert_eq!(v["data"]["analysis"]["type"], "keysDetermination");
    assert_eq!(v["data"]["analysis"]["correctKeys"], json!([["A", "B"]]));
}

#[test]
fn json_grade_wrong_keys() {
    let submission = json!({
        "submission": { "type": "keysDetermination", "keys": [["A"], ["C"]] }
    });
    let result = grade_to_json(&keys_task(), &submission.to_string(), SubmissionMode::Submit);
    let v = assert_success(&result);

    // One missing key (2) and two additional keys (1 each).
    assert_eq!(v["data"]["points"], 2.0);
    let criteria = v["data"]["criteria"].as_array().unwrap();
    assert_eq!(criteria.len(), 2);
    assert_eq!(criteria[0]["category"], "missing-key");
    assert_eq!(criteria[1]["category"], "additional-key");
    assert_eq!(criteria[1]["count"], 2);
}

#[test]
fn json_grade_passes_syntax_errors_through() {
    let submission = json!({ "syntaxErrors": ["line 1:3 mismatched input"] });
    let result = grade_to_json(&keys_task(), &submission.to_string(), SubmissionMode::Submit);
    let v = assert_success(&result);

    assert_eq!(v["data"]["points"], 0.0);
    assert_eq!(v["data"]["syntax"]["passed"], false);
    assert_eq!(v["data"]["syntax"]["errors"][0], "line 1:3 mismatched input");
    assert!(v["data"].get("analysis").is_none());
}

#[test]
fn json_grade_subtype_mismatch_is_a_syntax_error() {
    let submission = json!({
        "submission": { "type": "minimalCover", "dependencies": ["A -> B"] }
    });
    let result = grade_to_json(&keys_task(), &submission.to_string(), SubmissionMode::Submit);
    let v = assert_success(&result);
    assert_eq!(v["data"]["syntax"]["passed"], false);
}

#[test]
fn json_grade_invalid_task() {
    let result = grade_to_json("{ not json", "{}", SubmissionMode::Submit);
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().starts_with("invalid task"));
}

#[test]
fn json_grade_invalid_submission() {
    let result = grade_to_json(&keys_task(), r#"{"submission": {"type": "unknown"}}"#, SubmissionMode::Submit);
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().starts_with("invalid submission"));
}

#[test]
fn json_grade_oversized_relation_fails() {
    let names: Vec<String> = (0..25).map(|i| format!("A{i}")).collect();
    let deps: Vec<String> = names.windows(2).map(|w| format!("{} -> {}", w[0], w[1])).collect();
    let task = json!({
        "maxPoints": 1,
        "specification": {
            "type": "keysDetermination",
            "baseRelation": { "attributes": names, "functionalDependencies": deps }
        }
    });
    let submission = json!({ "submission": { "type": "keysDetermination", "keys": [["A0"]] } });

    let result = grade_to_json(&task.to_string(), &submission.to_string(), SubmissionMode::Submit);
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().contains("exceeds the supported limit"));
}
