// Copyright 2026 The Stager Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stager
//!
//! Run after a build.  Makes the `target/{debug,release}/assets` directories, compiles shaders
//! with `slangc`, and copies the assets directory into both output trees.
//!
//! With no arguments, the current directory is the base.  Settings can also come from
//! `[package.metadata.stager]` in the base directory's `Cargo.toml`; flags win over the manifest.
//!
//! Set `RUST_LOG=debug` to see every copy.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use stager_assets::{self as assets, prelude::*, NoShaders, Slangc};

#[derive(Parser, Debug)]
#[command(name = "stager")]
#[command(about = "Stage shaders and assets into target/debug and target/release.", long_about = None)]
struct Args {
    /// Directory containing `assets/` and `target/`.  Defaults to the current directory.
    #[arg(short, long)]
    base: Option<PathBuf>,
    /// Assets source directory, relative to the base
    #[arg(short, long)]
    assets: Option<PathBuf>,
    /// How asset paths map into the output trees
    #[arg(short, long, value_enum)]
    layout: Option<LayoutChoice>,
    /// Don't compile shaders
    #[arg(long)]
    skip_shaders: bool,
    /// Shader compiler to run
    #[arg(long, default_value = "slangc")]
    slangc: String,
    /// Also write `<shader>.reflection.json` next to each compiled shader
    #[arg(long)]
    reflection: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LayoutChoice {
    /// Copy by file name only.  Same-named files overwrite each other.
    Flatten,
    /// Keep paths relative to the assets directory
    Mirror,
}

impl From<LayoutChoice> for Layout {
    fn from(choice: LayoutChoice) -> Self {
        match choice {
            LayoutChoice::Flatten => Layout::Flatten,
            LayoutChoice::Mirror => Layout::Mirror,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum StagerError {
    #[error("no base directory: {0}")]
    Base(std::io::Error),
    #[error(transparent)]
    Stage(#[from] StageError),
}

fn main() -> Result<(), StagerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let base = match args.base {
        Some(base) => base,
        None => std::env::current_dir().map_err(StagerError::Base)?,
    };

    let mut config = StageConfig::load(&base)?;
    if let Some(assets) = args.assets {
        config.assets_dir = assets;
    }
    if let Some(layout) = args.layout {
        config.layout = layout.into();
    }
    log::debug!("staging {:?} with {:?}", base, config);

    let report = if args.skip_shaders {
        assets::stage(&base, &config, &NoShaders)?
    } else {
        let slangc = Slangc::new(&base, &config)
            .with_program(args.slangc)
            .with_reflection(args.reflection);
        assets::stage(&base, &config, &slangc)?
    };

    let differing = report.collisions.iter().filter(|c| c.differs).count();
    if differing > 0 {
        log::warn!("{differing} assets were overwritten by different files with the same name");
    }
    log::info!(
        "done: {} directories created, {} assets staged",
        report.created.len(),
        report.staged.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_the_default_run() {
        let args = Args::try_parse_from(["stager"]).unwrap();
        assert!(args.base.is_none());
        assert!(args.layout.is_none());
        assert!(!args.skip_shaders);
        assert!(!args.reflection);
        assert_eq!(args.slangc, "slangc");
    }

    #[test]
    fn layout_flag() {
        let args = Args::try_parse_from(["stager", "--layout", "mirror"]).unwrap();
        assert_eq!(Layout::from(args.layout.unwrap()), Layout::Mirror);
        assert!(Args::try_parse_from(["stager", "--layout", "scatter"]).is_err());
    }
}
