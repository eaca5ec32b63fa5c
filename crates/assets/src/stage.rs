// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stage
//!
//! One run, top to bottom:
//!
//! 1. Make sure the `target` skeleton exists.
//! 2. Compile shaders.
//! 3. Copy every file under the assets source directory into `target/debug/assets` and
//!    `target/release/assets`.
//!
//! The first failure ends the run.  Nothing is rolled back, so directories made and files copied
//! before the failure stay where they are.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{hash, prelude::*, walk, IoContext};

/// Output directories, parents before children so each can be made without `create_dir_all`.
pub const SKELETON: [&str; 5] = [
    "target",
    "target/release",
    "target/debug",
    "target/release/assets",
    "target/debug/assets",
];

/// Asset destinations, one per build profile.
pub const ASSET_DESTINATIONS: [&str; 2] = ["target/debug/assets", "target/release/assets"];

/// Two sources that were staged to the same destination name.  The later one is what ends up in
/// the output trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: PathBuf,
    pub overwritten: PathBuf,
    pub winner: PathBuf,
    /// Whether the contents differ.  Identical duplicates are harmless.
    pub differs: bool,
}

#[derive(Debug, Default)]
pub struct StageReport {
    /// Skeleton directories that did not exist before this run.
    pub created: Vec<PathBuf>,
    /// Every source file copied, in walk order.
    pub staged: Vec<PathBuf>,
    pub collisions: Vec<Collision>,
}

/// Stage assets below `base`.  See the module docs for the order of operations.
pub fn stage<C>(base: &Path, config: &StageConfig, compiler: &C) -> Result<StageReport, StageError>
where
    C: ShaderCompiler + ?Sized,
{
    let mut report = StageReport {
        created: ensure_skeleton(base)?,
        ..Default::default()
    };

    compiler.compile()?;

    let assets_root = base.join(&config.assets_dir);
    if !assets_root.is_dir() {
        return Err(StageError::AssetsMissing(assets_root));
    }

    let destinations: Vec<PathBuf> = ASSET_DESTINATIONS.iter().map(|d| base.join(d)).collect();
    check_overlap(&assets_root, &destinations)?;
    // destination name -> the source most recently staged there
    let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();

    for source in walk_files(&assets_root)? {
        let name = match config.layout {
            Layout::Flatten => match source.file_name() {
                Some(name) => PathBuf::from(name),
                None => continue,
            },
            Layout::Mirror => source
                .strip_prefix(&assets_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| source.clone()),
        };

        if let Some(previous) = seen.get(&name) {
            let differs = hash::file_hash(previous)? != hash::file_hash(&source)?;
            if differs {
                log::warn!(
                    "asset name collision: {:?} overwrites {:?} as {:?}",
                    source,
                    previous,
                    name
                );
            } else {
                log::debug!("duplicate asset {:?} is identical to {:?}", source, previous);
            }
            report.collisions.push(Collision {
                name: name.clone(),
                overwritten: previous.clone(),
                winner: source.clone(),
                differs,
            });
        }

        for dest_root in &destinations {
            let dest = dest_root.join(&name);
            if config.layout == Layout::Mirror {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent).at(parent)?;
                }
            }
            log::debug!("{:?} -> {:?}", source, dest);
            copy_file(&source, &dest)?;
        }

        seen.insert(name, source.clone());
        report.staged.push(source);
    }

    log::info!(
        "staged {} assets into {} and {}",
        report.staged.len(),
        ASSET_DESTINATIONS[0],
        ASSET_DESTINATIONS[1]
    );
    Ok(report)
}

/// Create whichever skeleton directories are missing, returning the ones created.
pub fn ensure_skeleton(base: &Path) -> Result<Vec<PathBuf>, StageError> {
    let mut created = Vec::new();
    for rel in SKELETON {
        let dir = base.join(rel);
        if !dir.is_dir() {
            fs::create_dir(&dir).at(&dir)?;
            log::debug!("created {:?}", dir);
            created.push(dir);
        }
    }
    Ok(created)
}

/// Every file below `root`, top-down.  Within a directory, files come first in name order, then
/// subdirectories in name order.  Links to directories are not followed.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>, StageError> {
    fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), StageError> {
        let listing = walk::list_dir(dir).at(dir)?;
        files.extend(listing.files);
        for sub in listing.dirs {
            walk(&sub, files)?;
        }
        Ok(())
    }

    let mut files = Vec::new();
    walk(root, &mut files)?;
    Ok(files)
}

/// The assets source and the destinations must be disjoint trees.  Otherwise files get copied
/// onto themselves, which truncates them, or staged output gets staged again.
fn check_overlap(assets_root: &Path, destinations: &[PathBuf]) -> Result<(), StageError> {
    let assets = assets_root.canonicalize().at(assets_root)?;
    for dest in destinations {
        let dest = dest.canonicalize().at(dest)?;
        if assets.starts_with(&dest) || dest.starts_with(&assets) {
            return Err(StageError::Config(format!(
                "assets directory {assets:?} overlaps output directory {dest:?}"
            )));
        }
    }
    Ok(())
}

/// Copy one asset.  The source is opened first so an error names whichever side failed.
fn copy_file(source: &Path, dest: &Path) -> Result<(), StageError> {
    fs::File::open(source).at(source)?;
    fs::copy(source, dest).at(dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_orders_files_before_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/deep")).unwrap();
        fs::write(root.join("z.txt"), "").unwrap();
        fs::write(root.join("a/deep/x.txt"), "").unwrap();
        fs::write(root.join("a/m.txt"), "").unwrap();

        let files = walk_files(root).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("z.txt"),
                PathBuf::from("a/m.txt"),
                PathBuf::from("a/deep/x.txt"),
            ]
        );
    }

    #[test]
    fn skeleton_reports_only_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();

        let created = ensure_skeleton(dir.path()).unwrap();
        let created: Vec<_> = created
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            created,
            vec![
                PathBuf::from("target/release"),
                PathBuf::from("target/release/assets"),
                PathBuf::from("target/debug/assets"),
            ]
        );
        assert!(ensure_skeleton(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn overlapping_trees_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        ensure_skeleton(base).unwrap();
        fs::create_dir(base.join("assets")).unwrap();
        let destinations: Vec<PathBuf> =
            ASSET_DESTINATIONS.iter().map(|d| base.join(d)).collect();

        assert!(check_overlap(&base.join("assets"), &destinations).is_ok());
        let overlapping = [
            base.to_path_buf(),
            base.join("target"),
            base.join(ASSET_DESTINATIONS[1]),
        ];
        for overlapping in overlapping {
            let err = check_overlap(&overlapping, &destinations).unwrap_err();
            assert!(matches!(err, StageError::Config(_)), "{overlapping:?}");
        }
    }

    #[test]
    fn file_in_the_way_of_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("target"), "not a directory").unwrap();
        let err = ensure_skeleton(dir.path()).unwrap_err();
        assert!(matches!(err, StageError::Io { .. }));
    }
}
