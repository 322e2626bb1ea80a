use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// A build ecosystem recognized by the presence of a marker file in the
/// project root. Some ecosystems define only one of the two commands.
#[derive(Debug, Serialize)]
pub struct Toolchain {
    pub marker: &'static str,
    pub name: &'static str,
    pub build: Option<&'static str>,
    pub run: Option<&'static str>,
}

/// Marker table, checked top to bottom; the first marker present in the
/// directory listing wins. Markers are mutually exclusive in practice, so
/// the order carries no intended priority.
pub const TOOLCHAINS: &[Toolchain] = &[
    Toolchain {
        marker: "stack.yaml",
        name: "haskell-stack",
        build: Some("stack build"),
        run: Some("stack run"),
    },
    Toolchain {
        marker: "Cargo.toml",
        name: "rust",
        build: Some("cargo build"),
        run: Some("cargo run"),
    },
    Toolchain {
        marker: ".spago",
        name: "purescript",
        build: Some("spago build"),
        run: Some("spago run"),
    },
    Toolchain {
        marker: "elm.json",
        name: "elm",
        build: None,
        run: Some("elm reactor"),
    },
    Toolchain {
        marker: "build.sbt",
        name: "scala-sbt",
        build: Some("sbt build"),
        run: Some("sbt run"),
    },
    Toolchain {
        marker: "build.gradle",
        name: "gradle",
        build: Some("gradle build"),
        run: Some("gradle run"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Build,
    Run,
}

impl Action {
    /// The command string the detected ecosystem defines for this action,
    /// if any.
    pub fn command_for(self, toolchain: &Toolchain) -> Option<&'static str> {
        match self {
            Action::Build => toolchain.build,
            Action::Run => toolchain.run,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Build => write!(f, "build"),
            Action::Run => write!(f, "run"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("reading directory {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("this language not supported")]
    Unsupported,
}

/// Match the root directory listing against the marker table. Names only,
/// no recursion, exact case-sensitive comparison.
pub fn detect_toolchain(root: &Path) -> Result<&'static Toolchain, DetectError> {
    let entries = fs::read_dir(root).map_err(|source| DetectError::Unreadable {
        path: root.display().to_string(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DetectError::Unreadable {
            path: root.display().to_string(),
            source,
        })?;
        names.push(entry.file_name());
    }

    TOOLCHAINS
        .iter()
        .find(|toolchain| names.iter().any(|name| name == toolchain.marker))
        .ok_or(DetectError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::{Action, DetectError, detect_toolchain};
    use std::fs;

    #[test]
    fn detects_rust_from_cargo_manifest() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();

        let toolchain = detect_toolchain(dir.path()).expect("marker should match");
        assert_eq!(toolchain.name, "rust");
        assert_eq!(Action::Build.command_for(toolchain), Some("cargo build"));
        assert_eq!(Action::Run.command_for(toolchain), Some("cargo run"));
    }

    #[test]
    fn elm_defines_only_a_run_command() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("elm.json"), "{}").unwrap();

        let toolchain = detect_toolchain(dir.path()).expect("marker should match");
        assert_eq!(toolchain.name, "elm");
        assert_eq!(Action::Build.command_for(toolchain), None);
        assert_eq!(Action::Run.command_for(toolchain), Some("elm reactor"));
    }

    #[test]
    fn spago_marker_may_be_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::create_dir(dir.path().join(".spago")).unwrap();

        let toolchain = detect_toolchain(dir.path()).expect("marker should match");
        assert_eq!(toolchain.name, "purescript");
    }

    #[test]
    fn unknown_listing_is_unsupported() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("Makefile"), "all:").unwrap();

        let err = detect_toolchain(dir.path()).expect_err("no marker should match");
        assert!(matches!(err, DetectError::Unsupported));
        assert_eq!(err.to_string(), "this language not supported");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        fs::write(dir.path().join("cargo.toml"), "[package]").unwrap();

        let err = detect_toolchain(dir.path()).expect_err("lowercase marker must not match");
        assert!(matches!(err, DetectError::Unsupported));
    }
}
