//! Attribute closure exercises.

use relgrade_core::{closure, AttributeSet};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::specification::AttributeClosureSpecification;
use crate::{Analysis, ViolationCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeClosureAnalysis {
    pub correct_closure: AttributeSet,
    pub missing_attributes: AttributeSet,
    pub additional_attributes: AttributeSet,
}

impl Analysis for AttributeClosureAnalysis {
    fn suits_solution(&self) -> bool {
        self.missing_attributes.is_empty() && self.additional_attributes.is_empty()
    }

    fn findings(&self) -> Vec<(ViolationCategory, usize)> {
        vec![
            (ViolationCategory::MissingAttribute, self.missing_attributes.len()),
            (ViolationCategory::AdditionalAttribute, self.additional_attributes.len()),
        ]
    }
}

pub fn analyze_attribute_closure(
    specification: &AttributeClosureSpecification,
    submitted: &AttributeSet,
) -> AttributeClosureAnalysis {
    let correct_closure = closure(
        &specification.base_attributes,
        &specification.base_relation.functional_dependencies,
    );

    let analysis = AttributeClosureAnalysis {
        missing_attributes: correct_closure.difference(submitted).cloned().collect(),
        additional_attributes: submitted.difference(&correct_closure).cloned().collect(),
        correct_closure,
    };
    info!(
        missing = analysis.missing_attributes.len(),
        additional = analysis.additional_attributes.len(),
        "analyzed attribute closure"
    );
    analysis
}
