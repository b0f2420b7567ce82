//! CLI argument structures
//!
//! This module defines the command-line interface of `ganymede-agg`.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build per-component inventory collections from ganymede documents
#[derive(Parser, Debug)]
#[command(name = "ganymede-agg")]
#[command(about = "ganymede-agg - Flatten nested inventory documents into reporting collections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// YAML file with additional job shapes
    #[arg(long, global = true, value_name = "PATH")]
    pub shapes: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the known aggregation jobs
    #[command(name = "list")]
    List,

    /// Print the pipelines that would run, without executing them
    #[command(name = "render")]
    Render {
        #[command(flatten)]
        selection: JobSelection,

        /// Output format
        #[arg(long, value_enum, default_value_t = RenderFormat::Json)]
        format: RenderFormat,
    },

    /// Execute aggregation jobs against the configured store
    #[command(name = "run")]
    Run {
        #[command(flatten)]
        selection: JobSelection,

        /// Run jobs one at a time
        #[arg(long)]
        sequential: bool,
    },
}

/// Job, filter and run id options shared by `render` and `run`
#[derive(Args, Debug, Clone, Default)]
pub struct JobSelection {
    /// Job to include (repeatable; defaults to the configured or all jobs)
    #[arg(short = 'j', long = "job", value_name = "NAME")]
    pub jobs: Vec<String>,

    /// Match filter as JSON (defaults to all documents)
    #[arg(long, value_name = "JSON", conflicts_with = "filter_file")]
    pub filter: Option<String>,

    /// File containing the match filter as JSON
    #[arg(long, value_name = "PATH")]
    pub filter_file: Option<PathBuf>,

    /// Run id substituted into output collection names (defaults to a timestamp)
    #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
    pub run_id: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// JSON array of job, source and pipeline stages
    Json,
    /// mongo shell script
    Shell,
}
