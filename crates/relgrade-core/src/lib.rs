pub mod closure;
pub mod decomposition;
pub mod error;
pub mod keys;
pub mod minimal_cover;
pub mod normalform;
pub mod types;

pub use closure::{closure, cover, equivalent, is_superkey, member};
pub use decomposition::{is_lossless, lost_dependencies, missing_attributes, project_dependencies};
pub use error::{ParseDependencyError, SchemaError};
pub use keys::{analyze_keys, minimal_keys, KeyAnalysis, MAX_SEARCH_ATTRIBUTES};
pub use minimal_cover::{fold, minimal_cover, unfold};
pub use normalform::{classify, determine_normalform, NormalformAnalysis, NormalformViolation};
pub use types::*;
