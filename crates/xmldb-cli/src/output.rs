use console::{Style, Term};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

/// Where and how command results are written, derived from global flags.
pub struct OutputContext {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    /// Construct from global CLI options.
    pub fn from_global(global: &GlobalOpts) -> Self {
        let mode = match global.format.as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        };

        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode,
            quiet: global.quiet,
            use_color,
        }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn human(&self) -> bool {
        self.mode == OutputMode::Human
    }

    /// Summary line for a successful run, on stderr.
    pub fn success(&self, msg: &str) {
        if !self.quiet && self.human() {
            eprintln!("{} {msg}", self.paint(Style::new().green().bold(), "ok"));
        }
    }

    /// Warnings go to stderr in every mode unless `--quiet`.
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                eprintln!("{} {msg}", self.paint(Style::new().yellow().bold(), "warning:"));
            }
            OutputMode::Json => eprintln!("{}", serde_json::json!({ "warning": msg })),
            OutputMode::Plain => eprintln!("warning\t{msg}"),
        }
    }

    /// Errors are printed even with `--quiet`.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => {
                eprintln!("{} {err}", self.paint(Style::new().red().bold(), "error:"));
            }
            OutputMode::Json => eprintln!("{}", err.to_json()),
            OutputMode::Plain => eprintln!("error\t{err}"),
        }
    }

    /// One result line per file on stdout, in human or plain mode.
    ///
    /// Failures are always printed; passing files are hidden in quiet mode.
    pub fn file_line(&self, path: &str, label: &str, detail: Option<&str>, failed: bool) {
        if self.mode == OutputMode::Json || (self.quiet && !failed) {
            return;
        }
        if self.mode == OutputMode::Plain {
            match detail {
                Some(detail) => println!("{path}\t{label}\t{detail}"),
                None => println!("{path}\t{label}"),
            }
            return;
        }
        let style = if failed {
            Style::new().red().bold()
        } else {
            Style::new().green()
        };
        let label = self.paint(style, label);
        match detail {
            Some(detail) => println!("  {path} .... {label}\n      {detail}"),
            None => println!("  {path} .... {label}"),
        }
    }

    /// Pretty JSON on stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    /// Progress notes on stderr, human mode only.
    pub fn status(&self, msg: &str) {
        if !self.quiet && self.human() {
            eprintln!("{msg}");
        }
    }

    /// Progress bars need a terminal and human output.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.human() && Term::stderr().is_term()
    }
}
