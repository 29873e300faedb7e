//! Quill CLI library
//!
//! This module contains the core CLI logic for the Quill source analyzer.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Mode};

use std::io::Write;

use log::info;

use quill::{Analyzer, QuillError, report};

/// Run the Quill CLI application
///
/// Analyzes the input file in the selected [`Mode`] and writes the plain-text
/// report to `out`. The report is written even when the syntax check fails,
/// so a partial tree is still shown.
///
/// # Errors
///
/// Returns `QuillError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - A failed syntax check, carrying every diagnostic
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), QuillError> {
    info!(
        input_path = args.input,
        mode:? = args.mode;
        "Analyzing source"
    );

    let config = config::load_config(args.config.as_ref())?;
    let source = quill::read_source(&args.input)?;
    let analyzer = Analyzer::new(config)?;

    let syntax = match args.mode {
        Mode::Lexical => {
            let lexical = analyzer.tokenize(&source);
            write!(
                out,
                "{}{}",
                report::render_tokens(&lexical.tokens),
                report::render_statistics(&lexical.statistics)
            )?;
            None
        }
        Mode::Syntax => {
            let result = analyzer.parse(&source);
            write!(out, "{}", report::render_syntax(&result))?;
            Some(result)
        }
        Mode::Full => {
            let analysis = analyzer.analyze(&source);
            write!(out, "{}", report::render_analysis(&analysis))?;
            Some(analysis.syntax)
        }
    };

    if let Some(result) = syntax {
        result
            .into_result()
            .map_err(|err| QuillError::new_syntax_error(err, source))?;
    }

    info!(input_path = args.input; "Analysis completed");
    Ok(())
}
