use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// A file with its path and content.
pub struct InputFile {
    pub path: String,
    pub content: String,
}

impl InputFile {
    fn is_yaml(&self) -> bool {
        self.path.ends_with(".yaml") || self.path.ends_with(".yml")
    }

    /// Deserialize the content as YAML or JSON depending on the extension.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, String> {
        if self.is_yaml() {
            serde_yaml::from_str(&self.content).map_err(|e| format!("{}: {e}", self.path))
        } else {
            serde_json::from_str(&self.content).map_err(|e| format!("{}: {e}", self.path))
        }
    }
}

fn read_file(path: &Path) -> Result<InputFile, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(InputFile {
        path: path.to_string_lossy().to_string(),
        content,
    })
}

/// Read and deserialize a single document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    if !path.is_file() {
        return Err(format!("Not a file: {}", path.display()));
    }
    read_file(path)?.parse()
}

/// Read input files from a path (file or directory). Directories are scanned
/// recursively for `.json`, `.yaml` and `.yml` files, in sorted order.
pub fn read_input_files(input_path: &Path) -> Result<Vec<InputFile>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        return Ok(vec![read_file(input_path)?]);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for extension in EXTENSIONS {
        let pattern = input_path.join(format!("**/*.{extension}"));
        let pattern_str = pattern.to_string_lossy().replace('\\', "/");
        let entries =
            glob::glob(&pattern_str).map_err(|e| format!("Invalid glob pattern: {}", e))?;

        for entry in entries {
            let path = entry.map_err(|e| format!("Glob error: {}", e))?;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths.sort();
    paths.iter().map(|p| read_file(p)).collect()
}
