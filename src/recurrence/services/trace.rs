//! Diagnostic trace collected during a generation run.

/// Ordered, human-readable decision log for one run.
///
/// Every line is also emitted at debug level; only an enabled trace keeps
/// the lines for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTrace {
    lines: Option<Vec<String>>,
}

impl RunTrace {
    /// Creates a trace that keeps its lines.
    #[must_use]
    pub const fn recording() -> Self {
        Self {
            lines: Some(Vec::new()),
        }
    }

    /// Creates a trace that only logs.
    #[must_use]
    pub const fn discarding() -> Self {
        Self { lines: None }
    }

    /// Records one decision.
    pub fn note(&mut self, line: impl Into<String>) {
        let text = line.into();
        tracing::debug!("{text}");
        if let Some(lines) = self.lines.as_mut() {
            lines.push(text);
        }
    }

    /// Consumes the trace, returning the kept lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines.unwrap_or_default()
    }
}
