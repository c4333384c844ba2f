//! Structured submissions and their domain consistency checks.

use std::collections::{BTreeMap, BTreeSet};

use relgrade_core::{
    AttributeSet, DependencySet, FunctionalDependency, IdentifiedRelation, Key, NormalformLevel,
    Relation,
};
use serde::{Deserialize, Serialize};

use crate::specification::Specification;

/// What the submission parser hands over: the structured answer plus any
/// syntax errors it ran into. A parser that failed may send no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSubmission {
    #[serde(default)]
    pub syntax_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

impl ParsedSubmission {
    pub fn new(submission: Submission) -> Self {
        Self {
            syntax_errors: Vec::new(),
            submission: Some(submission),
        }
    }

    /// A submission the parser rejected.
    pub fn with_syntax_errors(syntax_errors: Vec<String>) -> Self {
        Self {
            syntax_errors,
            submission: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Submission {
    AttributeClosure {
        attributes: AttributeSet,
    },
    KeysDetermination {
        keys: BTreeSet<Key>,
    },
    MinimalCover {
        dependencies: DependencySet,
    },
    NormalformDetermination(NormalformDeterminationSubmission),
    Normalization {
        relations: Vec<IdentifiedRelation>,
    },
}

/// The claimed overall level and, per dependency, the level it violates.
/// Dependencies without an entry are claimed to violate nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalformDeterminationSubmission {
    pub overall_level: NormalformLevel,
    #[serde(default)]
    pub violations: Vec<DependencyLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLevel {
    pub dependency: FunctionalDependency,
    pub level: NormalformLevel,
}

impl NormalformDeterminationSubmission {
    pub fn violated_levels(&self) -> BTreeMap<&FunctionalDependency, NormalformLevel> {
        self.violations
            .iter()
            .map(|v| (&v.dependency, v.level))
            .collect()
    }
}

impl Submission {
    /// The `"type"` tag of this submission.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AttributeClosure { .. } => "attributeClosure",
            Self::KeysDetermination { .. } => "keysDetermination",
            Self::MinimalCover { .. } => "minimalCover",
            Self::NormalformDetermination(_) => "normalformDetermination",
            Self::Normalization { .. } => "normalization",
        }
    }
}

// ---------------------------------------------------------------------------
// Domain consistency
// ---------------------------------------------------------------------------

fn unknown_attributes_error(unknown: &AttributeSet, context: &str) -> String {
    let names: Vec<&str> = unknown.iter().map(|a| a.as_str()).collect();
    let noun = if names.len() == 1 {
        "Attribute"
    } else {
        "Attributes"
    };
    format!(
        "{noun} {} of {context} not found in the base relation",
        names.join(", ")
    )
}

fn check_attributes(
    referenced: AttributeSet,
    base: &Relation,
    context: &str,
    errors: &mut Vec<String>,
) {
    let unknown: AttributeSet = referenced.difference(&base.attributes).cloned().collect();
    if !unknown.is_empty() {
        errors.push(unknown_attributes_error(&unknown, context));
    }
}

/// Checks a submission against the task before any analysis runs.
///
/// Every returned message is reported like a syntax error: the submission is
/// not analyzed.
pub fn validate(specification: &Specification, submission: &Submission) -> Vec<String> {
    let mut errors = Vec::new();

    if specification.kind() != submission.kind() {
        errors.push(format!(
            "Submission of type \"{}\" does not match exercise of type \"{}\"",
            submission.kind(),
            specification.kind()
        ));
        return errors;
    }

    let base = specification.base_relation();
    match submission {
        Submission::AttributeClosure { attributes } => {
            check_attributes(attributes.clone(), base, "the closure", &mut errors);
        }
        Submission::KeysDetermination { keys } => {
            let referenced = keys
                .iter()
                .flat_map(|k| k.attributes().iter().cloned())
                .collect();
            check_attributes(referenced, base, "the keys", &mut errors);
        }
        Submission::MinimalCover { dependencies } => {
            let referenced = dependencies.iter().flat_map(|d| d.attributes()).collect();
            check_attributes(referenced, base, "the dependencies", &mut errors);
        }
        Submission::NormalformDetermination(nf) => {
            let mut seen = BTreeSet::new();
            let mut reported = BTreeSet::new();
            for entry in &nf.violations {
                if !base.functional_dependencies.contains(&entry.dependency) {
                    errors.push(format!(
                        "Dependency {} not found in the base relation",
                        entry.dependency
                    ));
                }
                if !seen.insert(&entry.dependency) && reported.insert(&entry.dependency) {
                    errors.push(format!(
                        "Dependency {} is listed more than once",
                        entry.dependency
                    ));
                }
            }
        }
        Submission::Normalization { relations } => {
            let mut seen = BTreeSet::new();
            let mut reported = BTreeSet::new();
            for r in relations {
                if !seen.insert(r.id.as_str()) && reported.insert(r.id.as_str()) {
                    errors.push(format!("Duplicate relation ID \"{}\"", r.id));
                }
            }

            for r in relations {
                let mut referenced = r.relation.attributes.clone();
                referenced.extend(r.relation.referenced_attributes());
                check_attributes(
                    referenced,
                    base,
                    &format!("relation \"{}\"", r.id),
                    &mut errors,
                );
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn specification(kind: &str) -> Specification {
        serde_json::from_value(json!({
            "type": kind,
            "baseRelation": {
                "attributes": ["A", "B", "C"],
                "functionalDependencies": ["A -> B", "B -> C"]
            },
            "baseAttributes": ["A"],
            "targetLevel": "BOYCE_CODD"
        }))
        .unwrap()
    }

    #[test]
    fn reads_normalform_determination_submission() {
        let parsed: ParsedSubmission = serde_json::from_value(json!({
            "submission": {
                "type": "normalformDetermination",
                "overallLevel": "SECOND",
                "violations": [{ "dependency": "B -> C", "level": "THIRD" }]
            }
        }))
        .unwrap();

        assert!(parsed.syntax_errors.is_empty());
        match &parsed.submission {
            Some(Submission::NormalformDetermination(nf)) => {
                let fd: FunctionalDependency = "B -> C".parse().unwrap();
                assert_eq!(nf.violated_levels().get(&fd), Some(&NormalformLevel::Third));
            }
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_closure_attributes() {
        let submission = Submission::AttributeClosure {
            attributes: relgrade_core::attribute_set(["A", "X", "Y"]),
        };
        assert_eq!(
            validate(&specification("attributeClosure"), &submission),
            vec!["Attributes X, Y of the closure not found in the base relation".to_string()]
        );
    }

    #[test]
    fn rejects_mismatched_subtype() {
        let submission = Submission::MinimalCover {
            dependencies: DependencySet::new(),
        };
        let errors = validate(&specification("keysDetermination"), &submission);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("minimalCover"));
    }

    #[test]
    fn rejects_dependencies_outside_base_set() {
        let submission = Submission::NormalformDetermination(NormalformDeterminationSubmission {
            overall_level: NormalformLevel::Second,
            violations: vec![DependencyLevel {
                dependency: "A -> C".parse().unwrap(),
                level: NormalformLevel::Third,
            }],
        });
        assert_eq!(
            validate(&specification("normalformDetermination"), &submission),
            vec!["Dependency A -> C not found in the base relation".to_string()]
        );
    }

    #[test]
    fn reads_submission_without_structured_answer() {
        let parsed: ParsedSubmission = serde_json::from_value(json!({
            "syntaxErrors": ["line 1: unexpected token"]
        }))
        .unwrap();
        assert_eq!(
            parsed,
            ParsedSubmission::with_syntax_errors(vec!["line 1: unexpected token".to_string()])
        );
    }

    #[test]
    fn reports_each_repeated_dependency_once() {
        let entry = |level| DependencyLevel {
            dependency: "B -> C".parse().unwrap(),
            level,
        };
        let submission = Submission::NormalformDetermination(NormalformDeterminationSubmission {
            overall_level: NormalformLevel::Second,
            violations: vec![
                entry(NormalformLevel::Third),
                entry(NormalformLevel::Second),
                entry(NormalformLevel::BoyceCodd),
            ],
        });
        assert_eq!(
            validate(&specification("normalformDetermination"), &submission),
            vec!["Dependency B -> C is listed more than once".to_string()]
        );
    }

    #[test]
    fn reports_each_duplicate_relation_id_once() {
        let fragment = |id: &str| {
            IdentifiedRelation::new(
                id,
                Relation::new(relgrade_core::attribute_set(["A", "B"]), DependencySet::new()),
            )
        };
        let submission = Submission::Normalization {
            relations: vec![fragment("R1"), fragment("R1"), fragment("R1"), fragment("R2")],
        };
        assert_eq!(
            validate(&specification("normalization"), &submission),
            vec!["Duplicate relation ID \"R1\"".to_string()]
        );
    }

    #[test]
    fn rejects_unknown_attributes_in_fragment_dependencies() {
        let submission = Submission::Normalization {
            relations: vec![IdentifiedRelation::new(
                "R1",
                Relation::new(
                    relgrade_core::attribute_set(["A", "B"]),
                    ["A -> D".parse().unwrap()].into(),
                ),
            )],
        };
        assert_eq!(
            validate(&specification("normalization"), &submission),
            vec!["Attribute D of relation \"R1\" not found in the base relation".to_string()]
        );
    }
}
