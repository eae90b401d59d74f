use console::Term;
use xmldb_codec::{BatchSummary, Codec, FileReport, Outcome};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::commands::{discover, requested_paths};
use crate::config::{load_config, parse_missing_policy};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};
use crate::progress;

/// Run the `check` command: verify every install.xml is canonical.
pub fn run(args: CheckArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let policy = parse_missing_policy(args.missing.as_deref().unwrap_or(&config.check.missing))?;
    let files = discover(&requested_paths(&args.paths, &config))?;
    let codec = Codec::new(config.limits);

    tracing::info!(files = files.len(), ?policy, "checking install files");
    output.status(&format!("Checking {} install.xml file(s)", files.len()));

    let reports = if output.show_progress() {
        let pb = progress::create_bar(files.len(), "checking");
        let reports = files
            .iter()
            .map(|file| {
                progress::step(&pb, &file.display().to_string());
                codec.check_file(file, policy)
            })
            .collect::<Vec<_>>();
        progress::finish(&pb);
        reports
    } else {
        codec.check_files(&files, policy)
    };

    let mut summary = BatchSummary::from_reports(&reports);
    let mut rewritten = vec![false; reports.len()];

    if args.rewrite && summary.mismatched > 0 {
        confirm_rewrite(summary.mismatched, args.yes)?;
        for (report, done) in reports.iter().zip(rewritten.iter_mut()) {
            match xmldb_codec::rewrite(report) {
                Ok(true) => {
                    *done = true;
                    summary.mismatched -= 1;
                    summary.canonical += 1;
                }
                Ok(false) => {}
                Err(e) => output.warn(&format!("could not rewrite {}: {e}", report.path.display())),
            }
        }
    }

    report_results(&reports, &rewritten, &summary, output);

    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::CheckFailed {
            failed: summary.failed,
            mismatched: summary.mismatched,
        })
    }
}

fn confirm_rewrite(count: usize, yes: bool) -> Result<(), CliError> {
    if yes {
        return Ok(());
    }
    if !Term::stderr().is_term() {
        return Err(CliError::RequiresConfirmation);
    }
    let confirm = dialoguer::Confirm::new()
        .with_prompt(format!("Rewrite {count} non-canonical file(s) in place?"))
        .default(false)
        .interact()
        .map_err(|_| CliError::Cancelled)?;
    if confirm {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

fn detail(report: &FileReport) -> Option<String> {
    match &report.outcome {
        Outcome::Mismatch(m) => Some(m.to_string()),
        Outcome::Invalid(e) => Some(e.to_string()),
        Outcome::Unreadable(e) => Some(e.to_string()),
        _ => None,
    }
}

fn report_results(
    reports: &[FileReport],
    rewritten: &[bool],
    summary: &BatchSummary,
    output: &OutputContext,
) {
    match output.mode {
        OutputMode::Json => {
            let results: Vec<serde_json::Value> = reports
                .iter()
                .zip(rewritten)
                .map(|(report, &done)| {
                    serde_json::json!({
                        "file": report.path.display().to_string(),
                        "outcome": report.outcome.label(),
                        "detail": detail(report),
                        "rewritten": done,
                    })
                })
                .collect();
            output.print_json(&serde_json::json!({
                "files": summary.total(),
                "canonical": summary.canonical,
                "mismatched": summary.mismatched,
                "failed": summary.failed,
                "skipped": summary.skipped,
                "results": results,
            }));
        }
        _ => {
            for (report, &done) in reports.iter().zip(rewritten) {
                let path = report.path.display().to_string();
                if done {
                    output.file_line(&path, "rewritten", None, false);
                } else {
                    let detail = detail(report);
                    output.file_line(&path, report.outcome.label(), detail.as_deref(), report.is_failure());
                }
            }
            let line = format!(
                "{} files: {} canonical, {} not canonical, {} failed, {} skipped",
                summary.total(),
                summary.canonical,
                summary.mismatched,
                summary.failed,
                summary.skipped
            );
            if output.mode == OutputMode::Plain {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    summary.total(),
                    summary.canonical,
                    summary.mismatched,
                    summary.failed,
                    summary.skipped
                );
            } else if summary.is_success() {
                output.success(&line);
            } else {
                output.warn(&line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn confirm_skipped_with_yes() {
        assert!(confirm_rewrite(2, true).is_ok());
    }

    #[test]
    fn detail_for_outcomes() {
        let missing = FileReport {
            path: PathBuf::from("a/install.xml"),
            outcome: Outcome::Missing,
        };
        assert_eq!(detail(&missing), None);

        let error = xmldb_codec::parse("<XMLDB").unwrap_err();
        let invalid = FileReport {
            path: PathBuf::from("b/install.xml"),
            outcome: Outcome::Invalid(error),
        };
        assert!(detail(&invalid).unwrap().contains("malformed input"));
    }
}
