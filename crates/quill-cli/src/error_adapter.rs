//! Rendering [`QuillError`] values with miette.
//!
//! A failed syntax check carries several diagnostics; each becomes its own
//! [`Report`] with labeled snippets from the named input file. Errors
//! without source locations become a single plain report.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, NamedSource, Severity,
    SourceSpan,
};

use quill::{QuillError, span::Span};
use quill_parser::error::{Diagnostic, Label, LabelRole};

/// One renderable problem.
#[derive(Debug)]
pub enum Report<'a> {
    /// A syntax diagnostic and the named source it points into.
    Syntax {
        diag: &'a Diagnostic,
        source: &'a NamedSource<String>,
    },
    /// An error without source locations, e.g. an unreadable file.
    Failure(&'a QuillError),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Syntax { diag, .. } => f.write_str(diag.message()),
            Report::Failure(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Report::Syntax { .. } => None,
            Report::Failure(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Syntax { diag, .. } => diag
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            Report::Failure(err) => Some(Box::new(failure_code(err))),
        }
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Syntax { diag, .. } => diag
                .help()
                .map(|help| Box::new(help) as Box<dyn fmt::Display>),
            Report::Failure(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Report::Syntax { source, .. } => Some(*source as &dyn miette::SourceCode),
            Report::Failure(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Syntax { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }
        Some(Box::new(diag.labels().iter().map(labeled_span)))
    }
}

fn failure_code(err: &QuillError) -> &'static str {
    match err {
        QuillError::Io(_) => "quill::io",
        QuillError::Config(_) => "quill::config",
        QuillError::Syntax { .. } => "quill::syntax",
    }
}

fn labeled_span(label: &Label) -> LabeledSpan {
    let span = span_to_miette(label.span());
    let message = Some(label.message().to_string());
    match label.role() {
        LabelRole::Offending => LabeledSpan::new_primary_with_span(message, span),
        LabelRole::Context => LabeledSpan::new_with_span(message, span),
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::from(span.range())
}

/// The named source for a syntax error, `None` for other errors.
pub fn named_source(err: &QuillError, name: &str) -> Option<NamedSource<String>> {
    match err {
        QuillError::Syntax { src, .. } => Some(NamedSource::new(name, src.clone())),
        _ => None,
    }
}

/// Split `err` into reports, one per syntax diagnostic.
///
/// Syntax diagnostics point into `source`; without it they are reported as
/// a single failure.
pub fn reports<'a>(err: &'a QuillError, source: Option<&'a NamedSource<String>>) -> Vec<Report<'a>> {
    match (err, source) {
        (QuillError::Syntax { err: parse_err, .. }, Some(source)) => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Report::Syntax { diag, source })
            .collect(),
        _ => vec![Report::Failure(err)],
    }
}

/// Render every report of `err` with miette's graphical handler.
///
/// `name` labels the source snippets, usually the input path.
pub fn render(err: &QuillError, name: &str) -> Vec<String> {
    let handler = GraphicalReportHandler::new();
    let source = named_source(err, name);

    reports(err, source.as_ref())
        .iter()
        .map(|report| {
            let mut out = String::new();
            match handler.render_report(&mut out, report) {
                Ok(()) => out,
                Err(_) => report.to_string(),
            }
        })
        .collect()
}
