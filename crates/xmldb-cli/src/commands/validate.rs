use xmldb_codec::Codec;

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::commands::{discover, requested_paths};
use crate::config::load_config;
use crate::diagnostic::render_diagnostic;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `validate` command: check files against the grammar and,
/// unless `--grammar-only`, the structural rules.
pub fn run(args: ValidateArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let files = discover(&requested_paths(&args.paths, &config))?;
    let codec = Codec::new(config.limits);

    let mut failed = 0usize;
    let mut unreadable = 0usize;
    let mut results: Vec<serde_json::Value> = Vec::new();

    for file in &files {
        let filename = file.display().to_string();
        let source_text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                unreadable += 1;
                let err = CliError::Io {
                    path: file.clone(),
                    source: e,
                };
                if output.mode == OutputMode::Json {
                    results.push(err.to_json());
                } else {
                    output.print_error(&err);
                }
                continue;
            }
        };

        let result = if args.grammar_only {
            codec.validate_against_grammar(&source_text)
        } else {
            codec.validate_against_schema(&source_text)
        };

        match result {
            Ok(()) => match output.mode {
                OutputMode::Json => results.push(serde_json::json!({
                    "file": filename,
                    "valid": true,
                })),
                _ => output.file_line(&filename, "valid", None, false),
            },
            Err(error) => {
                failed += 1;
                match output.mode {
                    OutputMode::Human => {
                        let report = render_diagnostic(&error, &source_text, &filename);
                        eprintln!("{report:?}");
                    }
                    OutputMode::Json => {
                        let err = CliError::Codec {
                            error,
                            source_text,
                            file: file.clone(),
                        };
                        let mut value = err.to_json();
                        value["valid"] = serde_json::Value::Bool(false);
                        results.push(value);
                    }
                    OutputMode::Plain => {
                        let (line, col) = error.span().line_col(&source_text);
                        eprintln!("{filename}\t{line}:{col}\terror\t{error}");
                    }
                }
            }
        }
    }

    match output.mode {
        OutputMode::Json => output.print_json(&serde_json::json!({
            "files": files.len(),
            "invalid": failed,
            "unreadable": unreadable,
            "results": results,
        })),
        OutputMode::Plain => println!("{}\t{failed}\t{unreadable}", files.len()),
        OutputMode::Human => {
            let line = format!(
                "{} files validated, {failed} invalid, {unreadable} unreadable",
                files.len()
            );
            if failed + unreadable > 0 {
                output.warn(&line);
            } else {
                output.success(&line);
            }
        }
    }

    // Invalid files take precedence over unreadable ones.
    if failed > 0 {
        Err(CliError::CheckFailed {
            failed,
            mismatched: 0,
        })
    } else if unreadable > 0 {
        Err(CliError::Unreadable { count: unreadable })
    } else {
        Ok(())
    }
}
