// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Config
//!
//! Staging settings live beside the project they stage, in the base directory's `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.stager]
//! assets_dir = "assets"
//! shaders_dir = "shaders"
//! shader_out_dir = "assets/shaders"
//! layout = "flatten"
//! ```
//!
//! Every key is optional.  Relative paths are resolved against the base directory.

use std::{fs, path::Path, path::PathBuf, str::FromStr};

use crate::{prelude::*, IoContext};

/// How asset paths map into the output trees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Every file lands directly in `target/<profile>/assets/` under its file name.  Same-named
    /// files from different subdirectories overwrite each other, last visited wins.
    #[default]
    Flatten,
    /// Paths relative to the assets source root are kept.
    Mirror,
}

impl FromStr for Layout {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flatten" => Ok(Layout::Flatten),
            "mirror" => Ok(Layout::Mirror),
            other => Err(StageError::Config(format!(
                "unknown layout {other:?}, expected \"flatten\" or \"mirror\""
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageConfig {
    pub assets_dir: PathBuf,
    pub shaders_dir: PathBuf,
    pub shader_out_dir: PathBuf,
    pub layout: Layout,
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            assets_dir: PathBuf::from("assets"),
            shaders_dir: PathBuf::from("shaders"),
            shader_out_dir: PathBuf::from("assets/shaders"),
            layout: Layout::Flatten,
        }
    }
}

impl StageConfig {
    /// Read `package.metadata.stager` from `<base>/Cargo.toml`.  A missing manifest or table
    /// yields the defaults.
    pub fn load(base: &Path) -> Result<Self, StageError> {
        let manifest = base.join("Cargo.toml");
        if !manifest.is_file() {
            log::debug!("no manifest at {manifest:?}, using default config");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&manifest).at(&manifest)?;
        Self::from_manifest(&text)
    }

    /// Parse the stager table out of manifest text.
    pub fn from_manifest(text: &str) -> Result<Self, StageError> {
        let parsed: toml::Value =
            toml::from_str(text).map_err(|e| StageError::Config(e.to_string()))?;

        let mut config = Self::default();
        let Some(table) = parsed
            .get("package")
            .and_then(|p| p.get("metadata"))
            .and_then(|m| m.get("stager"))
        else {
            return Ok(config);
        };

        let path_key = |key: &str| -> Result<Option<PathBuf>, StageError> {
            match table.get(key) {
                None => Ok(None),
                Some(v) => v
                    .as_str()
                    .map(|s| Some(PathBuf::from(s)))
                    .ok_or_else(|| StageError::Config(format!("{key} must be a string"))),
            }
        };

        if let Some(p) = path_key("assets_dir")? {
            config.assets_dir = p;
        }
        if let Some(p) = path_key("shaders_dir")? {
            config.shaders_dir = p;
        }
        if let Some(p) = path_key("shader_out_dir")? {
            config.shader_out_dir = p;
        }
        if let Some(layout) = table.get("layout") {
            config.layout = layout
                .as_str()
                .ok_or_else(|| StageError::Config("layout must be a string".to_owned()))?
                .parse()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_metadata_gives_defaults() {
        let config = StageConfig::from_manifest(
            r#"
            [package]
            name = "game"
            "#,
        )
        .unwrap();
        assert_eq!(config, StageConfig::default());
    }

    #[test]
    fn metadata_overrides() {
        let config = StageConfig::from_manifest(
            r#"
            [package]
            name = "game"

            [package.metadata.stager]
            assets_dir = "res"
            layout = "mirror"
            "#,
        )
        .unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("res"));
        assert_eq!(config.shaders_dir, PathBuf::from("shaders"));
        assert_eq!(config.layout, Layout::Mirror);
    }

    #[test]
    fn unknown_layout_rejected() {
        let err = StageConfig::from_manifest(
            r#"
            [package.metadata.stager]
            layout = "scatter"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, StageError::Config(_)));
    }

    #[test]
    fn bad_toml_rejected() {
        let err = StageConfig::from_manifest("[package").unwrap_err();
        assert!(matches!(err, StageError::Config(_)));
    }

    #[test]
    fn missing_manifest_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StageConfig::load(dir.path()).unwrap(), StageConfig::default());
    }
}
