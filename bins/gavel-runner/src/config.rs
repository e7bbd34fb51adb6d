// Language profile management for the runner
use anyhow::{bail, Context, Result};
use gavel_common::error::GavelError;
use gavel_common::types::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Command templates for one language. The run template is required; the
/// compile template and the per-language time limit are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<String>,
    pub run: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileEntry {
    name: String,
    #[serde(flatten)]
    profile: LanguageProfile,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagesJson {
    languages: Vec<ProfileEntry>,
}

/// Profile table keyed by the closed language enum. Entries naming unknown
/// languages are rejected at load time, not at run time.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    profiles: HashMap<Language, LanguageProfile>,
}

impl ProfileManager {
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("language config file not found: {}", config_path.display());
        }
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Load with the default path (config/languages.json).
    pub fn load_default() -> Result<Self> {
        Self::load(Path::new("config/languages.json"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let parsed: LanguagesJson =
            serde_json::from_str(content).context("malformed languages table")?;

        let mut profiles = HashMap::new();
        for entry in parsed.languages {
            let Some(language) = Language::from_name(&entry.name) else {
                bail!("unknown language '{}' in languages table", entry.name);
            };
            profiles.insert(language, entry.profile);
        }

        if profiles.is_empty() {
            bail!("no languages configured");
        }
        Ok(Self { profiles })
    }

    /// Profile lookup; a known language with no entry is a typed miss.
    pub fn profile(&self, language: Language) -> Result<&LanguageProfile, GavelError> {
        self.profiles
            .get(&language)
            .ok_or(GavelError::MissingLanguageConfig(language))
    }

    /// All configured languages, sorted by name for stable listings.
    pub fn list(&self) -> Vec<(Language, &LanguageProfile)> {
        let mut entries: Vec<_> = self.profiles.iter().map(|(l, p)| (*l, p)).collect();
        entries.sort_by_key(|(l, _)| l.name());
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "languages": [
            { "name": "python", "run": "python3 {file}" },
            { "name": "cpp",
              "compile": "g++ -std=c++17 {file} -o {fileNoExt}",
              "run": "{fileNoExt}",
              "timeout_ms": 4000 }
        ]
    }"#;

    #[test]
    fn parses_profiles() {
        let manager = ProfileManager::from_json(TABLE).unwrap();
        let python = manager.profile(Language::Python).unwrap();
        assert!(python.compile.is_none());
        assert_eq!(python.run, "python3 {file}");

        let cpp = manager.profile(Language::Cpp).unwrap();
        assert!(cpp.compile.is_some());
        assert_eq!(cpp.timeout_ms, Some(4000));
    }

    #[test]
    fn unknown_language_name_is_rejected_at_load() {
        let result =
            ProfileManager::from_json(r#"{ "languages": [ { "name": "cobol", "run": "x" } ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn unconfigured_language_is_a_typed_miss() {
        let manager = ProfileManager::from_json(TABLE).unwrap();
        let err = manager.profile(Language::Rust).unwrap_err();
        assert!(matches!(
            err,
            GavelError::MissingLanguageConfig(Language::Rust)
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(ProfileManager::from_json(r#"{ "languages": [] }"#).is_err());
    }

    #[test]
    fn listing_is_sorted_by_name() {
        let manager = ProfileManager::from_json(TABLE).unwrap();
        let names: Vec<&str> = manager.list().iter().map(|(l, _)| l.name()).collect();
        assert_eq!(names, vec!["cpp", "python"]);
    }
}
