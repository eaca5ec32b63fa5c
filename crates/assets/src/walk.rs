// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory listing shared by the asset and shader walks.

use std::{fs, io, path::Path, path::PathBuf};

/// One directory's entries, each half in name order.
#[derive(Debug, Default)]
pub struct Listing {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// List `dir` without following links to directories.  A symlinked directory is neither
/// descended into nor returned as a file, so link cycles can't trap a walk and linked trees from
/// elsewhere are not pulled in.  Symlinks to files, and dangling links, count as files.
pub fn list_dir(dir: &Path) -> io::Result<Listing> {
    let mut listing = Listing::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            listing.dirs.push(path);
        } else if file_type.is_symlink() {
            if fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
                log::debug!("not following directory link {:?}", path);
            } else {
                listing.files.push(path);
            }
        } else {
            listing.files.push(path);
        }
    }
    listing.files.sort();
    listing.dirs.sort();
    Ok(listing)
}
