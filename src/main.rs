// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-require CLI - run modules through the Spacey module loader
//!
//! ## Features
//!
//! - Require a module from a module root and print its exports
//! - Resolve names to canonical keys without loading them
//! - Interactive REPL with history

mod repl;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use spacey_loader::{DiskFilesystem, LoaderConfig, LoaderContext, VERSION, require, require_resolve};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "spacey-require",
    about = "Require modules through the Spacey module loader",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Module to require, e.g. `lib/greeting` or `smart/filesystem`
    module: Option<String>,

    /// Directory module keys are resolved under
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Print the canonical key instead of loading the module
    #[arg(long)]
    resolve: bool,

    /// Configuration file (defaults to `spacey-require.toml` in the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix prepended to every source path
    #[arg(long)]
    base_path: Option<String>,

    /// Source file extension
    #[arg(long)]
    extension: Option<String>,

    /// Marker segment for native modules
    #[arg(long)]
    native_prefix: Option<String>,

    /// Do not retry missing nested modules at the root
    #[arg(long)]
    no_fallback: bool,

    /// Start interactive REPL
    #[arg(short = 'i', long = "interactive", alias = "repl")]
    interactive: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    /// File configuration with command line overrides applied
    fn loader_config(&self) -> anyhow::Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::load(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?,
            None => LoaderConfig::load_from_root(&self.root)?,
        };

        if let Some(base_path) = &self.base_path {
            config.base_path = base_path.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(prefix) = &self.native_prefix {
            config.native_prefix = prefix.clone();
        }
        if self.no_fallback {
            config.fallback_to_root = false;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "spacey_loader=debug"
    } else {
        "spacey_loader=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.loader_config()?;
    tracing::debug!(root = %cli.root.display(), ?config, "starting loader");

    let context = LoaderContext::builder()
        .filesystem(Arc::new(DiskFilesystem::new(cli.root.clone())))
        .config(config)
        .build();

    let module = match cli.module {
        Some(module) if !cli.interactive => module,
        _ => {
            let mut repl = repl::Repl::new(context).context("failed to initialize REPL")?;
            repl.run()?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    if cli.resolve {
        println!("{}", require_resolve(&context, &module)?);
        return Ok(ExitCode::SUCCESS);
    }

    match require(&context, &module) {
        Ok(exports) => {
            println!("{}", repl::format_value(&exports));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            repl::print_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
