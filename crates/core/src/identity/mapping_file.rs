//! Identity mapping file reader.
//!
//! The default format is a flat JSON object:
//!
//! ```json
//! {
//!   "mechiru": "[To:123]@mechiru",
//!   "organization/team": "[To:123]@mechiru [To:124]@suzuki",
//!   "dependabot": null
//! }
//! ```
//!
//! A file with a `.toml` extension is read as a flat TOML table instead.
//! TOML has no null, so every TOML entry maps to an address:
//!
//! ```toml
//! mechiru = "[To:123]@mechiru"
//! "organization/team" = "[To:123]@mechiru [To:124]@suzuki"
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::mapper::IdentityMapping;
use crate::errors::IdentityError;

/// Utilities for loading the identity mapping file.
pub struct MappingFile;

impl MappingFile {
    /// Load the mapping file from disk. An empty file is an empty mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<IdentityMapping, IdentityError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading identity mapping file");

        if !path.exists() {
            return Err(IdentityError::MappingFileError {
                path: path.display().to_string(),
                detail: "file not found".into(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(IdentityError::IoError)?;
        let mapping = if contents.trim().is_empty() {
            IdentityMapping::new()
        } else if is_toml(path) {
            parse_toml(&contents)?
        } else {
            IdentityMapping::from_json(&contents)?
        };

        debug!(count = mapping.len(), "loaded identity mappings");
        Ok(mapping)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn parse_toml(contents: &str) -> Result<IdentityMapping, IdentityError> {
    let table: HashMap<String, String> =
        toml::from_str(contents).map_err(|e| IdentityError::ParseError(e.to_string()))?;
    Ok(table.into_iter().map(|(k, v)| (k, Some(v))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Resolution;

    #[test]
    fn test_load_json_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(
            &path,
            r#"{"mechiru": "[To:123]@mechiru", "dependabot": null}"#,
        )
        .unwrap();

        let mapping = MappingFile::load(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("mechiru"), Resolution::Resolved("[To:123]@mechiru"));
        assert_eq!(mapping.resolve("dependabot"), Resolution::ExplicitlyUnmapped);
    }

    #[test]
    fn test_load_toml_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.toml");
        std::fs::write(
            &path,
            "mechiru = \"[To:123]@mechiru\"\n\"org/team\" = \"[To:124]@suzuki\"\n",
        )
        .unwrap();

        let mapping = MappingFile::load(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("org/team"), Resolution::Resolved("[To:124]@suzuki"));
    }

    #[test]
    fn test_load_nonexistent() {
        let result = MappingFile::load("/nonexistent/mapping.json");
        assert!(matches!(
            result,
            Err(IdentityError::MappingFileError { .. })
        ));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "").unwrap();

        let mapping = MappingFile::load(&path).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"mechiru\": ").unwrap();

        assert!(matches!(
            MappingFile::load(&path),
            Err(IdentityError::ParseError(_))
        ));
    }
}
