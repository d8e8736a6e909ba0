//! CLI argument definitions for the bunsen form-state tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bunsen",
    version,
    about = "Bunsen - drive schema-driven form state from the command line",
    long_about = "Mount a form model, replay actions against it and inspect the result.\n\n\
                  Derives the effective model from property conditions, validates values\n\
                  and resolves the widget each field renders with."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mount a form, replay actions and print the final state.
    Reduce(ReduceArgs),

    /// Validate a value against a model.
    Validate(ValidateArgs),

    /// Resolve the widget for a single field.
    Widget(WidgetArgs),

    /// List the builtin renderer registry.
    Renderers,
}

#[derive(Parser)]
pub struct ReduceArgs {
    /// Base model (JSON schema with optional property conditions).
    #[arg(long = "model", value_name = "FILE")]
    pub model: PathBuf,

    /// Actions to replay: one action object or an array of them.
    #[arg(long = "actions", value_name = "FILE")]
    pub actions: PathBuf,

    /// Initial form value.
    #[arg(long = "initial", value_name = "FILE")]
    pub initial: Option<PathBuf>,

    /// Validate after every change and record the outcome in the state.
    #[arg(long = "validate")]
    pub validate: bool,

    /// Skip merging schema defaults into the initial value.
    #[arg(long = "no-defaults")]
    pub no_defaults: bool,

    /// Write the final state here instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Base model (JSON schema with optional property conditions).
    #[arg(long = "model", value_name = "FILE")]
    pub model: PathBuf,

    /// Form value to validate.
    #[arg(long = "value", value_name = "FILE")]
    pub value: PathBuf,
}

#[derive(Parser)]
pub struct WidgetArgs {
    /// JSON type of the field.
    #[arg(long = "type", value_name = "TYPE")]
    pub field_type: Option<String>,

    /// Custom renderer name from the cell configuration.
    #[arg(long = "renderer", value_name = "NAME")]
    pub renderer: Option<String>,

    /// Treat the form as read-only.
    #[arg(long = "read-only")]
    pub read_only: bool,

    /// Mark the field as not editable in its model.
    #[arg(long = "not-editable")]
    pub not_editable: bool,

    /// The field depends on another field that holds no value.
    #[arg(long = "dependency-unmet")]
    pub dependency_unmet: bool,

    /// Extra registry entries (JSON object of name to widget) layered over the builtins.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
