//! Display names and display ordering for type and language ids

use std::borrow::Cow;
use std::cmp::Ordering;

/// Maps type and language ids to human-readable labels
pub trait DisplayNameResolver {
    fn type_display_name<'a>(&self, project_type: &'a str) -> Cow<'a, str>;

    fn language_display_name<'a>(&self, language: &'a str) -> Cow<'a, str>;
}

/// Labels for the well-known type and language ids. Unknown ids display as themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinNames;

impl BuiltinNames {
    fn known_type(id: &str) -> Option<&'static str> {
        let name = match id {
            "liberty" => "Open Liberty",
            "spring" => "Spring Boot",
            "nodejs" => "Node.js",
            "swift" => "Swift",
            "docker" => "Docker",
            "generic" => "Generic",
            _ => return None,
        };
        Some(name)
    }

    fn known_language(id: &str) -> Option<&'static str> {
        let name = match id {
            "java" => "Java",
            "nodejs" => "Node.js",
            "javascript" => "JavaScript",
            "typescript" => "TypeScript",
            "swift" => "Swift",
            "python" => "Python",
            "go" => "Go",
            "rust" => "Rust",
            _ => return None,
        };
        Some(name)
    }
}

impl DisplayNameResolver for BuiltinNames {
    fn type_display_name<'a>(&self, project_type: &'a str) -> Cow<'a, str> {
        Self::known_type(project_type)
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Borrowed(project_type))
    }

    fn language_display_name<'a>(&self, language: &'a str) -> Cow<'a, str> {
        Self::known_language(language)
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Borrowed(language))
    }
}

/// Case-insensitive label order, raw id ascending on ties
fn compare_labels(a: (&str, &str), b: (&str, &str)) -> Ordering {
    a.0.to_lowercase()
        .cmp(&b.0.to_lowercase())
        .then_with(|| a.1.cmp(b.1))
}

fn sort_by_label<'a, I, F>(ids: I, label: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&'a str) -> Cow<'a, str>,
{
    let mut labelled: Vec<(Cow<'a, str>, &'a str)> =
        ids.into_iter().map(|id| (label(id), id)).collect();
    labelled.sort_by(|a, b| compare_labels((&*a.0, a.1), (&*b.0, b.1)));
    labelled.into_iter().map(|(_, id)| id.to_string()).collect()
}

/// Sort type ids for display
pub fn sort_types<'a, R, I>(resolver: &R, ids: I) -> Vec<String>
where
    R: DisplayNameResolver + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    sort_by_label(ids, |id| resolver.type_display_name(id))
}

/// Sort language ids for display
pub fn sort_languages<'a, R, I>(resolver: &R, ids: I) -> Vec<String>
where
    R: DisplayNameResolver + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    sort_by_label(ids, |id| resolver.language_display_name(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resolver that labels every id the same, to exercise the tie-break
    struct SameLabel;

    impl DisplayNameResolver for SameLabel {
        fn type_display_name<'a>(&self, _: &'a str) -> Cow<'a, str> {
            Cow::Borrowed("Same")
        }

        fn language_display_name<'a>(&self, _: &'a str) -> Cow<'a, str> {
            Cow::Borrowed("Same")
        }
    }

    #[test]
    fn test_sorted_by_label_not_id() {
        // Labels: Docker, Node.js, Open Liberty, Spring Boot
        let sorted = sort_types(&BuiltinNames, ["spring", "liberty", "nodejs", "docker"]);
        assert_eq!(sorted, vec!["docker", "nodejs", "liberty", "spring"]);
    }

    #[test]
    fn test_case_insensitive() {
        let sorted = sort_languages(&BuiltinNames, ["zeta", "Alpha", "beta"]);
        assert_eq!(sorted, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_tie_break_on_id() {
        let sorted = sort_types(&SameLabel, ["c", "a", "b"]);
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_ids_display_as_themselves() {
        assert_eq!(BuiltinNames.type_display_name("appsody"), "appsody");
        assert_eq!(BuiltinNames.language_display_name("typescript"), "TypeScript");
    }
}
