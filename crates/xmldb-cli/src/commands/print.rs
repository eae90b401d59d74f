use xmldb_codec::Codec;

use crate::cli::{GlobalOpts, PrintArgs};
use crate::config::load_config;
use crate::diagnostic::render_diagnostic;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `print` command: emit the canonical text of one file, or its
/// model as JSON with `--format json`.
pub fn run(args: PrintArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let codec = Codec::new(config.limits);

    let source_text = std::fs::read_to_string(&args.file).map_err(|e| CliError::Io {
        path: args.file.clone(),
        source: e,
    })?;

    let document = match codec.parse(&source_text) {
        Ok(document) => document,
        Err(error) => {
            if output.mode == OutputMode::Human {
                let report = render_diagnostic(&error, &source_text, &args.file.display().to_string());
                eprintln!("{report:?}");
            }
            return Err(CliError::Codec {
                error,
                source_text,
                file: args.file,
            });
        }
    };

    if output.mode == OutputMode::Json {
        let value = serde_json::to_value(&document).map_err(|e| CliError::Other(e.to_string()))?;
        output.print_json(&value);
    } else {
        print!("{}", codec.serialize(&document));
    }
    Ok(())
}
