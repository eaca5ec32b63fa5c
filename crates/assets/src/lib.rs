// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! Post-build staging of assets.  A run makes sure the `target/{debug,release}/assets` skeleton
//! exists, compiles shaders into the assets source tree, and then copies every asset into both
//! output trees so that either build profile can find its files next to the binary.
//!
//! The shader step is a [`ShaderCompiler`] handed in by the caller.  Use [`Slangc`] for real
//! builds and a closure in tests.

pub mod config;
pub mod hash;
pub mod shader;
pub mod stage;
mod walk;

pub use config::{Layout, StageConfig};
pub use shader::{NoShaders, ShaderCompiler, Slangc};
pub use stage::{stage, Collision, StageReport};

use std::path::PathBuf;

pub mod prelude {
    pub use super::{ShaderError, StageError};
    pub use crate::config::{Layout, StageConfig};
    pub use crate::shader::ShaderCompiler;
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("assets directory not found: {0:?}")]
    AssetsMissing(PathBuf),
    #[error("shader compilation failed: {0}")]
    Shader(#[from] ShaderError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("no shader compiler found: {0}")]
    CompilerMissing(String),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler exited with {status} for {path:?}")]
    Failed {
        path: PathBuf,
        status: std::process::ExitStatus,
    },
}

/// Attach the offending path to an io error.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, StageError>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, StageError> {
        self.map_err(|source| StageError::Io {
            path: path.into(),
            source,
        })
    }
}
