use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Checker and formatter for XMLDB `install.xml` schema descriptions.
///
/// Parses every discovered `install.xml`, validates it against the element
/// grammar and the structural rules, and verifies that the file is in
/// canonical form.
#[derive(Parser)]
#[command(
    name = "xmldb",
    version,
    about = "Checker and formatter for XMLDB install.xml schema descriptions",
    after_help = "Use 'xmldb <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: XMLDB_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "XMLDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check that install.xml files parse and are in canonical form
    Check(CheckArgs),

    /// Validate install.xml files against the grammar and structural rules
    Validate(ValidateArgs),

    /// Print the canonical form (or JSON model) of one install.xml file
    Print(PrintArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for `xmldb check`.
#[derive(Args)]
pub struct CheckArgs {
    /// Files or directories to check (default: [check].default_paths, or .)
    pub paths: Vec<PathBuf>,

    /// What to do with listed files that do not exist: fail, skip
    #[arg(long = "missing", value_parser = ["fail", "skip"])]
    pub missing: Option<String>,

    /// Rewrite non-canonical files in place
    #[arg(long = "rewrite")]
    pub rewrite: bool,

    /// Rewrite without asking for confirmation
    #[arg(short = 'y', long = "yes", requires = "rewrite")]
    pub yes: bool,
}

/// Arguments for `xmldb validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: [check].default_paths, or .)
    pub paths: Vec<PathBuf>,

    /// Check well-formedness and the element grammar only
    #[arg(long = "grammar-only")]
    pub grammar_only: bool,
}

/// Arguments for `xmldb print`.
#[derive(Args)]
pub struct PrintArgs {
    /// The install.xml file to print
    pub file: PathBuf,
}

/// Arguments for `xmldb completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
