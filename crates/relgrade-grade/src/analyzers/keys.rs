//! Key determination exercises.

use std::collections::BTreeSet;

use relgrade_core::{minimal_keys, Key};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::specification::KeysDeterminationSpecification;
use crate::{Analysis, GradeError, ViolationCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysAnalysis {
    pub correct_keys: BTreeSet<Key>,
    pub missing_keys: BTreeSet<Key>,
    pub additional_keys: BTreeSet<Key>,
}

impl KeysAnalysis {
    pub fn compare(correct_keys: BTreeSet<Key>, submitted: &BTreeSet<Key>) -> Self {
        Self {
            missing_keys: correct_keys.difference(submitted).cloned().collect(),
            additional_keys: submitted.difference(&correct_keys).cloned().collect(),
            correct_keys,
        }
    }
}

impl Analysis for KeysAnalysis {
    fn suits_solution(&self) -> bool {
        self.missing_keys.is_empty() && self.additional_keys.is_empty()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        vec![
            (ViolationCategory::MissingKey, self.missing_keys.len()),
            (ViolationCategory::AdditionalKey, self.additional_keys.len()),
        ]
    }
}

pub fn analyze_keys_determination(
    specification: &KeysDeterminationSpecification,
    submitted: &BTreeSet<Key>,
) -> Result<KeysAnalysis, GradeError> {
    let correct = minimal_keys(&specification.base_relation)?;
    let analysis = KeysAnalysis::compare(correct, submitted);
    info!(
        missing = analysis.missing_keys.len(),
        additional = analysis.additional_keys.len(),
        "analyzed keys"
    );
    Ok(analysis)
}
