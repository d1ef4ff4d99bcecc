//! Project type to language index derived from a template catalogue

use crate::templates::TemplateRecord;
use std::collections::{HashMap, HashSet};

/// Maps every project type seen in the catalogue to the set of languages its templates are
/// tagged with. A type whose templates carry no language maps to an empty set.
///
/// The index is always rebuilt from scratch; it is never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeLanguageIndex {
    types: HashMap<String, HashSet<String>>,
}

impl TypeLanguageIndex {
    /// Group records by project type, collecting non-empty language tags
    pub fn from_templates<'a, I>(templates: I) -> Self
    where
        I: IntoIterator<Item = &'a TemplateRecord>,
    {
        let mut types: HashMap<String, HashSet<String>> = HashMap::new();
        for template in templates {
            let languages = types.entry(template.project_type.clone()).or_default();
            if let Some(language) = template.language() {
                languages.insert(language.to_string());
            }
        }
        Self { types }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Number of distinct project types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn contains_type(&self, project_type: &str) -> bool {
        self.types.contains_key(project_type)
    }

    /// Languages for a type, `None` if the type is not in the catalogue
    pub fn languages(&self, project_type: &str) -> Option<&HashSet<String>> {
        self.types.get(project_type)
    }

    pub fn has_language(&self, project_type: &str, language: &str) -> bool {
        self.types
            .get(project_type)
            .is_some_and(|languages| languages.contains(language))
    }

    /// Project type ids, in no particular order
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Language ids for a type, in no particular order
    pub fn language_ids<'a>(&'a self, project_type: &str) -> impl Iterator<Item = &'a str> {
        self.types
            .get(project_type)
            .into_iter()
            .flat_map(|languages| languages.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_groups_languages_by_type() {
        let templates = vec![
            TemplateRecord::new("nodejs", Some("javascript")),
            TemplateRecord::new("nodejs", Some("typescript")),
            TemplateRecord::new("nodejs", Some("javascript")),
            TemplateRecord::new("docker", None),
            TemplateRecord::new("docker", Some("")),
        ];
        let index = TypeLanguageIndex::from_templates(&templates);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.languages("nodejs"),
            Some(&set(&["javascript", "typescript"]))
        );
        assert_eq!(index.languages("docker"), Some(&HashSet::new()));
        assert_eq!(index.languages("swift"), None);
    }

    #[test]
    fn test_order_independent() {
        let mut templates = vec![
            TemplateRecord::new("spring", Some("java")),
            TemplateRecord::new("docker", Some("python")),
            TemplateRecord::new("docker", Some("go")),
            TemplateRecord::new("liberty", None),
        ];
        let forward = TypeLanguageIndex::from_templates(&templates);
        templates.reverse();
        let backward = TypeLanguageIndex::from_templates(&templates);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_catalogue() {
        let index = TypeLanguageIndex::from_templates(&[]);
        assert!(index.is_empty());
        assert_eq!(index.type_ids().count(), 0);
        assert_eq!(index.language_ids("nodejs").count(), 0);
    }

    #[test]
    fn test_has_language() {
        let templates = vec![TemplateRecord::new("docker", Some("go"))];
        let index = TypeLanguageIndex::from_templates(&templates);
        assert!(index.has_language("docker", "go"));
        assert!(!index.has_language("docker", "python"));
        assert!(!index.has_language("nodejs", "go"));
    }
}
