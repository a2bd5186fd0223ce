// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bootcfg` entry point: runs one configuration tutorial.

use bootcfg::adapters::{StdoutSink, TracingSink};
use bootcfg::ports::OutputSink;
use bootcfg::tutorials::{Tutorial, TutorialContext};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Configuration file used when none is given and it exists.
const DEFAULT_CONFIG_FILE: &str = "config/application.properties";

/// Resolve configuration values from files, the environment, the command
/// line and a config server.
#[derive(Debug, Parser)]
#[command(name = "bootcfg", version, about)]
struct Cli {
    /// Configuration file (.properties, .yaml or .yml)
    #[arg(long, env = "BOOTCFG_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    /// Do not read environment variables
    #[arg(long)]
    no_env: bool,

    /// Config server URI (overrides spring.cloud.config.uri)
    #[arg(long, env = "BOOTCFG_CONFIG_SERVER")]
    config_server: Option<String>,

    /// Application name (overrides spring.application.name)
    #[arg(long)]
    application: Option<String>,

    /// Active profile(s), comma separated (overrides spring.profiles.active)
    #[arg(long)]
    profile: Option<String>,

    /// Print tutorial output to stdout instead of the log
    #[arg(long)]
    stdout: bool,

    /// Tutorial to run
    #[arg(value_enum)]
    tutorial: Tutorial,

    /// Property overrides after `--`, e.g. `-- --bootiful.message=hi`
    #[arg(last = true)]
    overrides: Vec<String>,
}

impl Cli {
    fn context(&self) -> TutorialContext {
        let config_file = self.config_file.clone().or_else(|| {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            default.is_file().then(|| default.to_path_buf())
        });

        TutorialContext {
            config_file,
            use_env: !self.no_env,
            overrides: self.overrides.clone(),
            config_server: self.config_server.clone(),
            application: self.application.clone(),
            profile: self.profile.clone(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let context = cli.context();
    tracing::debug!("{:?}", context);

    let sink: Box<dyn OutputSink> = if cli.stdout {
        Box::new(StdoutSink)
    } else {
        Box::new(TracingSink)
    };

    match cli.tutorial.run(&context, sink.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut message = err.to_string();
            let mut cause = std::error::Error::source(&err);
            while let Some(inner) = cause {
                message.push_str(&format!(": {}", inner));
                cause = inner.source();
            }
            tracing::error!("tutorial '{}' failed: {}", cli.tutorial, message);
            ExitCode::FAILURE
        }
    }
}
