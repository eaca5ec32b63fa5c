// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content hashes for telling apart same-named assets.

use std::{fs, path::Path};

use xxhash_rust::xxh3::xxh3_64;

use crate::{prelude::*, IoContext};

/// Hash the full contents of the file at `path`.
pub fn file_hash(path: &Path) -> Result<u64, StageError> {
    let bytes = fs::read(path).at(path)?;
    Ok(xxh3_64(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_hash() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let c = dir.path().join("c.txt");
        fs::write(&a, b"hello").unwrap();
        fs::write(&b, b"hello").unwrap();
        fs::write(&c, b"world").unwrap();

        assert_eq!(file_hash(&a).unwrap(), file_hash(&b).unwrap());
        assert_ne!(file_hash(&a).unwrap(), file_hash(&c).unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_hash(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StageError::Io { .. }));
    }
}
