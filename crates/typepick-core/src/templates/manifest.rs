//! Template catalogue types and parsing

use serde::{Deserialize, Serialize};

/// A single project template as advertised by a repository catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Display name of the template
    #[serde(default)]
    pub label: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Where the template skeleton lives
    #[serde(default)]
    pub url: Option<String>,

    /// Coarse project category (e.g. `nodejs`, `docker`)
    #[serde(alias = "projectType")]
    pub project_type: String,

    /// Finer-grained language tag; empty means "no language tag"
    #[serde(default)]
    pub language: Option<String>,

    /// Name of the repository the record was loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TemplateRecord {
    /// Create a record with just the fields that drive selection
    pub fn new(project_type: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            project_type: project_type.into(),
            language: language.map(str::to_string),
            ..Self::default()
        }
    }

    /// The language tag, treating an empty or blank string as absent
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Catalogue manifest (`template.yaml` at the root of a repository)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    /// Templates offered by this repository
    #[serde(default)]
    pub templates: Vec<TemplateRecord>,
}

impl Catalogue {
    /// Parse a catalogue from YAML text
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, empty catalogue
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Tag every record with the repository it came from
    pub fn with_source(mut self, source: &str) -> Self {
        for template in &mut self.templates {
            template.source = Some(source.to_string());
        }
        self
    }
}
