use std::{env, fs::OpenOptions, io, path::Path, sync::Mutex};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::BoxMakeWriter, prelude::*};

mod app;
mod cli;
mod config;
mod constants;
mod domain;
mod error;
mod export;
mod progress;
mod stats;
mod storage;

use crate::{cli::Cli, config::Config};

/// Terminal UI sessions log to a file so the alternate screen stays clean.
fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_env("ROADMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "roadmap=debug,info"
        } else {
            "roadmap=info,warn"
        })
    });

    let writer = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(io::sink),
        },
        None => BoxMakeWriter::new(io::stderr),
    };
    let ansi = log_file.is_none();

    let format = env::var("ROADMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_ansi(ansi).with_writer(writer))
                .init();
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.roadmap);

    match cli.command {
        Some(command) => {
            init_tracing(None);
            config.ensure_dirs();
            tracing::debug!(data_dir = %config.data_dir.display(), "running command");
            cli::run_command(command, &config);
        }
        None => {
            config.ensure_dirs();
            init_tracing(Some(&config.log_path()));
            tracing::info!(data_dir = %config.data_dir.display(), "starting terminal ui");
            if let Err(e) = app::run_ui(&config) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
