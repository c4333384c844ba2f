pub mod analyze;
pub mod grade;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, String> {
        match format {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "Unknown output format \"{other}\" (expected human or json)"
            )),
        }
    }
}

/// Render a JSON value the way every command prints it.
pub fn to_pretty_json(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {}", e))
}
