// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Diagnostic sinks
//!
//! Non-fatal conditions detected by the core (currently only a contact
//! normal that is not unit length) are reported through a
//! [`DiagnosticSink`] injected into each body. The core never touches
//! process-wide logging state unless the [`TracingSink`] is chosen.

use std::fmt;

/// A non-fatal condition observed while updating a body
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// A normal passed to `bounce` deviated from unit length
    NonUnitNormal {
        /// Measured length of the supplied normal
        length: f64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonUnitNormal { length } => {
                write!(f, "normal not unit: |n|={:.3}", length)
            }
        }
    }
}

/// Receiver for non-fatal diagnostics
pub trait DiagnosticSink {
    /// Handle one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(target: "projectile", "{}", diagnostic);
    }
}

/// Discards every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory so a driver can inspect or display them
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// Diagnostics recorded so far, oldest first
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Remove and return everything recorded so far
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.report(Diagnostic::NonUnitNormal { length: 2.0 });
        assert_eq!(sink.diagnostics().len(), 1);

        let taken = sink.take();
        assert_eq!(taken, vec![Diagnostic::NonUnitNormal { length: 2.0 }]);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_sink_through_mut_reference() {
        fn report_once<S: DiagnosticSink>(mut sink: S) {
            sink.report(Diagnostic::NonUnitNormal { length: 0.5 });
        }

        let mut sink = RecordingSink::new();
        report_once(&mut sink);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::NonUnitNormal { length: 1.25 };
        assert_eq!(d.to_string(), "normal not unit: |n|=1.250");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_emits_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut sink = TracingSink;
            sink.report(Diagnostic::NonUnitNormal { length: 2.0 });
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("projectile"), "{output}");
        assert!(output.contains("normal not unit: |n|=2.000"), "{output}");
    }
}
