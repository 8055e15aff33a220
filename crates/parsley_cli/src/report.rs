//! Rendering parser diagnostics through `miette`.

use miette::{LabeledSpan, NamedSource, SourceCode};
use parsley_diagnostics::Diagnostic;
use std::fmt;
use std::sync::Arc;

/// A parser diagnostic together with the text it points into.
#[derive(Debug)]
pub struct SourceReport {
    diagnostic: Diagnostic,
    source: NamedSource<Arc<str>>,
}

impl SourceReport {
    pub fn new(diagnostic: Diagnostic, text: Arc<str>) -> Self {
        let source = NamedSource::new(diagnostic.filename.to_string(), text);
        Self { diagnostic, source }
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message_text)
    }
}

impl std::error::Error for SourceReport {}

impl miette::Diagnostic for SourceReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "{}({})",
            self.diagnostic.category, self.diagnostic.code
        )))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span;
        let start = span.start.index as usize;
        let len = (span.end.index - span.start.index) as usize;
        Some(Box::new(std::iter::once(LabeledSpan::at(start..start + len, "here"))))
    }
}

/// Errors that stop a file from being parsed at all.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InputError {
    #[error("could not read {path}")]
    #[diagnostic(code(parsley::io))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    #[diagnostic(code(parsley::encoding))]
    Encoding { path: String },

    #[error("could not load options from {path}")]
    #[diagnostic(code(parsley::config), help("the file must be a JSON object such as {{ \"syntax\": [\"ts\"] }}"))]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("the parser failed on {path}")]
    #[diagnostic(code(parsley::internal))]
    Internal {
        path: String,
        #[source]
        source: parsley_parser::InternalError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;
    use parsley_core::{Position, SourceSpan};
    use parsley_diagnostics::messages;

    #[test]
    fn test_report_labels_the_span() {
        let text: Arc<str> = Arc::from("let = 1;");
        let span = SourceSpan::new(Position::new(1, 4, 4), Position::new(1, 5, 5));
        let diagnostic = Diagnostic::new(
            Arc::from("input.js"),
            span,
            &messages::UNEXPECTED_TOKEN,
            &["'='"],
        );
        let report = SourceReport::new(diagnostic, text);
        assert_eq!(report.to_string(), "Unexpected '='.");
        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
        assert_eq!(report.code().unwrap().to_string(), "parse(1201)");
    }
}
