//! Detection from well-known marker files (package.json, pom.xml, Dockerfile, ...)

use super::ProjectInspector;
use crate::error::InspectError;
use crate::selection::DetectedHint;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directories never worth scanning for sources
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "build", "dist", "vendor"];

/// Source extensions and the language they indicate
const SOURCE_EXTENSIONS: &[(&str, &str)] = &[
    ("java", "java"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("go", "go"),
    ("swift", "swift"),
    ("rs", "rust"),
];

/// Inspector that recognises projects by their build and container files
#[derive(Debug, Clone)]
pub struct MarkerInspector {
    /// How deep to look for source files when only a Dockerfile is present
    scan_depth: usize,
}

impl Default for MarkerInspector {
    fn default() -> Self {
        Self { scan_depth: 2 }
    }
}

impl MarkerInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_depth(scan_depth: usize) -> Self {
        Self { scan_depth }
    }
}

/// Read a file if it exists
fn read_optional(path: &Path) -> Result<Option<String>, InspectError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(InspectError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Node.js: TypeScript when a tsconfig exists or the manifest depends on typescript
fn check_node(dir: &Path) -> Result<Option<DetectedHint>, InspectError> {
    let Some(package_json) = read_optional(&dir.join("package.json"))? else {
        return Ok(None);
    };
    let typescript =
        dir.join("tsconfig.json").exists() || package_json.contains("\"typescript\"");
    let language = if typescript { "typescript" } else { "javascript" };
    Ok(Some(DetectedHint::new("nodejs", Some(language))))
}

/// Maven: Spring Boot and Liberty builds have their own types, anything else is docker
fn check_maven(dir: &Path) -> Result<Option<DetectedHint>, InspectError> {
    let Some(pom) = read_optional(&dir.join("pom.xml"))? else {
        return Ok(None);
    };
    let pom = pom.to_lowercase();
    let project_type = if pom.contains("spring-boot") {
        "spring"
    } else if pom.contains("liberty") {
        "liberty"
    } else {
        "docker"
    };
    Ok(Some(DetectedHint::new(project_type, Some("java"))))
}

fn check_swift(dir: &Path) -> Option<DetectedHint> {
    dir.join("Package.swift")
        .exists()
        .then(|| DetectedHint::new("swift", Some("swift")))
}

/// Language implied by a top-level dependency manifest
fn manifest_language(dir: &Path) -> Option<&'static str> {
    if dir.join("go.mod").exists() {
        Some("go")
    } else if dir.join("requirements.txt").exists() || dir.join("pyproject.toml").exists() {
        Some("python")
    } else if dir.join("Cargo.toml").exists() {
        Some("rust")
    } else {
        None
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    // Depth 0 is the project root itself, which may legitimately be hidden
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name.starts_with('.') || SKIPPED_DIRS.contains(&&*name))
}

/// Most common source language within `depth` levels of `dir`
fn scan_language(dir: &Path, depth: usize) -> Option<&'static str> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for entry in WalkDir::new(dir)
        .max_depth(depth)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some((_, language)) = SOURCE_EXTENSIONS.iter().find(|(e, _)| *e == ext) {
            *counts.entry(*language).or_default() += 1;
        }
    }

    // Highest count wins; ties go to the alphabetically first language
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(language, _)| language)
}

impl ProjectInspector for MarkerInspector {
    fn detect(&self, path: &Path) -> Result<Option<DetectedHint>, InspectError> {
        if !path.exists() {
            return Err(InspectError::Missing(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Ok(None);
        }

        if let Some(hint) = check_node(path)? {
            return Ok(Some(hint));
        }
        if let Some(hint) = check_maven(path)? {
            return Ok(Some(hint));
        }
        if let Some(hint) = check_swift(path) {
            return Ok(Some(hint));
        }

        let language = manifest_language(path);
        if path.join("Dockerfile").exists() {
            let language = language.or_else(|| scan_language(path, self.scan_depth));
            return Ok(Some(DetectedHint::new("docker", language)));
        }

        Ok(language.map(|language| DetectedHint::new("docker", Some(language))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn detect(dir: &tempfile::TempDir) -> Option<DetectedHint> {
        MarkerInspector::new().detect(dir.path()).unwrap()
    }

    #[test]
    fn test_node_javascript() {
        let dir = project(&[("package.json", r#"{"name": "app"}"#)]);
        assert_eq!(
            detect(&dir),
            Some(DetectedHint::new("nodejs", Some("javascript")))
        );
    }

    #[test]
    fn test_node_typescript() {
        let dir = project(&[("package.json", "{}"), ("tsconfig.json", "{}")]);
        assert_eq!(
            detect(&dir),
            Some(DetectedHint::new("nodejs", Some("typescript")))
        );

        let dir = project(&[(
            "package.json",
            r#"{"devDependencies": {"typescript": "^5.0.0"}}"#,
        )]);
        assert_eq!(
            detect(&dir),
            Some(DetectedHint::new("nodejs", Some("typescript")))
        );
    }

    #[test]
    fn test_maven_flavours() {
        let dir = project(&[("pom.xml", "<artifactId>spring-boot-starter</artifactId>")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("spring", Some("java"))));

        let dir = project(&[("pom.xml", "<groupId>io.openliberty</groupId>")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("liberty", Some("java"))));

        let dir = project(&[("pom.xml", "<project/>")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("docker", Some("java"))));
    }

    #[test]
    fn test_swift_package() {
        let dir = project(&[("Package.swift", "// swift-tools-version:5.5")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("swift", Some("swift"))));
    }

    #[test]
    fn test_dockerfile_language_from_sources() {
        let dir = project(&[
            ("Dockerfile", "FROM python:3"),
            ("app/main.py", ""),
            ("app/util.py", ""),
            ("scripts/run.go", ""),
        ]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("docker", Some("python"))));
    }

    #[test]
    fn test_dockerfile_without_sources() {
        let dir = project(&[("Dockerfile", "FROM scratch")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("docker", None)));
    }

    #[test]
    fn test_dependency_manifest_without_dockerfile() {
        let dir = project(&[("go.mod", "module example.com/app")]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("docker", Some("go"))));
    }

    #[test]
    fn test_skips_vendored_sources() {
        let dir = project(&[
            ("Dockerfile", "FROM node"),
            ("node_modules/a/index.js", ""),
            ("node_modules/b/index.js", ""),
            ("main.rs", ""),
        ]);
        assert_eq!(detect(&dir), Some(DetectedHint::new("docker", Some("rust"))));
    }

    #[test]
    fn test_unrecognised_directory() {
        let dir = project(&[("README.md", "# hello")]);
        assert_eq!(detect(&dir), None);
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarkerInspector::new()
            .detect(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, InspectError::Missing(_)));
    }
}
