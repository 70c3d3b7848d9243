//! Diagnostic values and sinks.
//!
//! Validators and planners never panic or print directly; they build a
//! [`Diagnostic`] and hand it to whatever [`DiagnosticSink`] the driver was
//! constructed with. Production code uses [`ConsoleDiagnosticSink`]; tests
//! use [`CollectingDiagnosticSink`] to assert on exactly what was emitted.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ignored,
    Note,
    Remark,
    Warning,
    Error,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Ignored => "ignored",
            Severity::Note => "note",
            Severity::Remark => "remark",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single diagnostic message, optionally tied to a source location
/// (typically the offending command-line argument or a path).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            location: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn remark(message: impl Into<String>) -> Self {
        Self::new(Severity::Remark, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render as the default sink's one-line format:
    /// `<location>: <severity>: <message>`.
    pub fn render(&self) -> String {
        match &self.location {
            Some(loc) => format!("{}: {}: {}", loc, self.severity.label(), self.message),
            None => format!("{}: {}", self.severity.label(), self.message),
        }
    }
}

/// Where diagnostics go. Kept as a trait object on the `Driver` so tests can
/// substitute a collector without touching stderr.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);

    fn error_count(&self) -> usize {
        0
    }
}

/// Writes each diagnostic to stderr as it arrives, tracking how many were
/// errors so callers can decide the process exit code.
#[derive(Default)]
pub struct ConsoleDiagnosticSink {
    errors: Mutex<usize>,
}

impl ConsoleDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for ConsoleDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Error {
            *self.errors.lock().unwrap() += 1;
        }
        eprintln!("{}", diagnostic.render());
    }

    fn error_count(&self) -> usize {
        *self.errors.lock().unwrap()
    }
}

/// Accumulates every diagnostic in memory; used by tests.
#[derive(Default)]
pub struct CollectingDiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.severity == severity)
    }
}

impl DiagnosticSink for CollectingDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_location_when_present() {
        let d = Diagnostic::warning("unused option").with_location("-foo");
        assert_eq!(d.render(), "-foo: warning: unused option");
    }

    #[test]
    fn render_without_location() {
        let d = Diagnostic::error("no input files");
        assert_eq!(d.render(), "error: no input files");
    }

    #[test]
    fn collecting_sink_tracks_error_count() {
        let sink = CollectingDiagnosticSink::new();
        sink.emit(Diagnostic::warning("w"));
        sink.emit(Diagnostic::error("e1"));
        sink.emit(Diagnostic::error("e2"));
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.diagnostics().len(), 3);
    }
}
