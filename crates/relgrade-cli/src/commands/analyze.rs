use std::collections::BTreeSet;
use std::path::Path;

use relgrade_core::{
    analyze_keys, attribute_set, classify, closure, fold, minimal_cover, AttributeSet, Key,
    NormalformViolation, Relation,
};
use relgrade_grade::Task;
use serde::Deserialize;
use serde_json::json;

use super::{to_pretty_json, OutputFormat};
use crate::reader::read_document;

/// `analyze` accepts a bare relation or a task whose base relation is used.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnalyzeInput {
    Task(Task),
    Relation(Relation),
}

impl AnalyzeInput {
    fn into_relation(self) -> Relation {
        match self {
            Self::Task(task) => task.specification.base_relation().clone(),
            Self::Relation(relation) => relation,
        }
    }
}

fn join(attributes: &AttributeSet) -> String {
    attributes
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_violation(violation: &NormalformViolation) -> String {
    match violation {
        NormalformViolation::Second {
            dependency,
            partial_key,
            non_prime_attributes,
        } => format!(
            "{dependency} violates 2NF (partial key {partial_key}, non-prime {})",
            join(non_prime_attributes)
        ),
        NormalformViolation::Third {
            dependency,
            non_prime_attributes,
        } => format!(
            "{dependency} violates 3NF (non-prime {})",
            join(non_prime_attributes)
        ),
        NormalformViolation::BoyceCodd { dependency } => format!("{dependency} violates BCNF"),
    }
}

fn join_keys(keys: &BTreeSet<Key>) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run_analyze(
    path: &Path,
    closure_of: Option<&[String]>,
    format: &str,
) -> Result<String, String> {
    let format = OutputFormat::parse(format)?;
    let relation = read_document::<AnalyzeInput>(path)?.into_relation();

    let seed = match closure_of {
        Some(names) => {
            let seed = attribute_set(names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()));
            let unknown: AttributeSet = seed.difference(&relation.attributes).cloned().collect();
            if !unknown.is_empty() {
                return Err(format!(
                    "Unknown attribute(s) for closure: {}",
                    join(&unknown)
                ));
            }
            Some(seed)
        }
        None => None,
    };

    let keys = analyze_keys(&relation).map_err(|e| e.to_string())?;
    let cover = fold(&minimal_cover(&relation.functional_dependencies));
    let normalform = classify(&relation, &keys);
    let closure_result = seed
        .as_ref()
        .map(|seed| (seed, closure(seed, &relation.functional_dependencies)));

    match format {
        OutputFormat::Json => {
            let mut output = json!({
                "attributes": relation.attributes,
                "minimalKeys": keys.minimal_keys,
                "partialKeys": keys.partial_keys,
                "primeAttributes": keys.prime_attributes,
                "minimalCover": cover,
                "normalform": normalform,
            });
            if let Some((seed, result)) = &closure_result {
                output["closure"] = json!({ "of": seed, "attributes": result });
            }
            to_pretty_json(&output)
        }
        OutputFormat::Human => {
            let mut lines = vec![format!("Relation ({})", join(&relation.attributes))];

            lines.push(format!("Keys: {}", join_keys(&keys.minimal_keys)));
            lines.push(format!("Partial keys: {}", join_keys(&keys.partial_keys)));
            lines.push(format!(
                "Prime attributes: {}",
                join(&keys.prime_attributes)
            ));

            lines.push("Minimal cover:".to_string());
            for dependency in &cover {
                lines.push(format!("  {dependency}"));
            }

            lines.push(format!("Normal form: {}", normalform.overall_level));
            for violation in &normalform.violations {
                lines.push(format!("  {}", describe_violation(violation)));
            }

            if let Some((seed, result)) = &closure_result {
                lines.push(format!("Closure of {{{}}}: {{{}}}", join(seed), join(result)));
            }

            Ok(lines.join("\n"))
        }
    }
}
