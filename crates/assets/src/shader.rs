// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Shaders
//!
//! Staging only needs one thing from shader compilation: do it, or say why not.  That is the
//! [`ShaderCompiler`] trait.  [`Slangc`] is the real one.  Closures work too, which is how the
//! staging tests run without a shader toolchain installed.

use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
    process,
};

use crate::{prelude::*, walk};

pub trait ShaderCompiler {
    fn compile(&self) -> Result<(), ShaderError>;
}

impl<F> ShaderCompiler for F
where
    F: Fn() -> Result<(), ShaderError>,
{
    fn compile(&self) -> Result<(), ShaderError> {
        self()
    }
}

/// For projects without shaders, or when shaders are built elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShaders;

impl ShaderCompiler for NoShaders {
    fn compile(&self) -> Result<(), ShaderError> {
        log::info!("skipping shader compilation");
        Ok(())
    }
}

/// Compile `src_root/**/*.slang` to `dest_root/**/*.spv`, keeping relative paths.  With
/// `reflection` set, slangc also writes `<stem>.reflection.json` next to each `.spv`.
#[derive(Debug, Clone)]
pub struct Slangc {
    pub src_root: PathBuf,
    pub dest_root: PathBuf,
    pub program: OsString,
    pub reflection: bool,
}

impl Slangc {
    pub fn new(base: &Path, config: &StageConfig) -> Self {
        Slangc {
            src_root: base.join(&config.shaders_dir),
            dest_root: base.join(&config.shader_out_dir),
            program: OsString::from("slangc"),
            reflection: false,
        }
    }

    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_reflection(mut self, reflection: bool) -> Self {
        self.reflection = reflection;
        self
    }

    /// Compile every shader, returning how many were compiled.
    pub fn compile_all(&self) -> Result<usize, ShaderError> {
        if !self.src_root.is_dir() {
            log::debug!("no shader sources at {:?}", self.src_root);
            return Ok(0);
        }

        if process::Command::new(&self.program)
            .arg("-v")
            .output()
            .is_err()
        {
            return Err(ShaderError::CompilerMissing(
                self.program.to_string_lossy().into_owned(),
            ));
        }

        let mut count = 0;
        self.compile_dir(&self.src_root, OsStr::new("slang"), &mut count)?;
        log::info!("compiled {count} shaders into {:?}", self.dest_root);
        Ok(count)
    }

    fn compile_dir(&self, dir: &Path, ext: &OsStr, count: &mut usize) -> Result<(), ShaderError> {
        let mut out_ensured = false;
        let rel_dir = dir.strip_prefix(&self.src_root).unwrap_or(Path::new(""));
        let out_dir = self.dest_root.join(rel_dir);

        let listing = walk::list_dir(dir).map_err(|source| ShaderError::Io {
            path: dir.to_owned(),
            source,
        })?;

        for path in listing.files {
            if path.extension() != Some(ext) {
                continue;
            }
            if !out_ensured {
                fs::create_dir_all(&out_dir).map_err(|source| ShaderError::Io {
                    path: out_dir.clone(),
                    source,
                })?;
                out_ensured = true;
            }

            log::debug!("compiling {:?}", path);
            let status = self
                .command(&path)
                .status()
                .map_err(|source| ShaderError::Io {
                    path: path.clone(),
                    source,
                })?;

            if !status.success() {
                return Err(ShaderError::Failed { path, status });
            }
            *count += 1;
        }

        for sub in listing.dirs {
            self.compile_dir(&sub, ext, count)?;
        }
        Ok(())
    }

    /// `slangc <input> -o <out>.spv [-reflection-json <out>.reflection.json]`
    fn command(&self, input: &Path) -> process::Command {
        let stem = input.strip_prefix(&self.src_root).unwrap_or(input);
        let out = self.dest_root.join(stem).with_extension("spv");

        let mut command = process::Command::new(&self.program);
        command.arg(input.as_os_str()).arg("-o").arg(out.as_os_str());
        if self.reflection {
            let reflect = self.dest_root.join(stem).with_extension("reflection.json");
            command.arg("-reflection-json").arg(reflect.as_os_str());
        }
        command
    }
}

impl ShaderCompiler for Slangc {
    fn compile(&self) -> Result<(), ShaderError> {
        self.compile_all().map(|_| ())
    }
}
