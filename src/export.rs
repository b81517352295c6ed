//! # Task Export Seam
//!
//! Serializers (CSV column layout, calendar fields) are external
//! collaborators. The orchestrator resolves a formatter by format, hands it
//! the fetched rows, and wraps the rendered bytes with filename and MIME
//! metadata from [`ExportFormat`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::models::{ExportFormat, Task};

/// Renders a batch of tasks into one export format.
pub trait ExportFormatter: Send + Sync {
    /// Convert a list of tasks to the target format.
    fn format(&self, tasks: &[Task]) -> DomainResult<Vec<u8>>;
}

impl std::fmt::Debug for dyn ExportFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExportFormatter")
    }
}

/// Formatters keyed by the format they render.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<ExportFormat, Arc<dyn ExportFormatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a formatter, replacing any previous registration for the format
    pub fn register(&mut self, format: ExportFormat, formatter: Arc<dyn ExportFormatter>) {
        self.formatters.insert(format, formatter);
    }

    /// Resolve the formatter for a format.
    ///
    /// A format nothing is registered for surfaces as a validation error,
    /// matching the contract for unsupported formats.
    pub fn resolve(&self, format: ExportFormat) -> DomainResult<Arc<dyn ExportFormatter>> {
        self.formatters.get(&format).cloned().ok_or_else(|| {
            DomainError::validation()
                .with_message(format!("unsupported export format: {format}"))
        })
    }

    pub fn is_registered(&self, format: ExportFormat) -> bool {
        self.formatters.contains_key(&format)
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formats", &self.formatters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    struct HeaderOnlyCsv;

    impl ExportFormatter for HeaderOnlyCsv {
        fn format(&self, tasks: &[Task]) -> DomainResult<Vec<u8>> {
            let mut out = b"id,title\n".to_vec();
            for task in tasks {
                out.extend_from_slice(format!("{},{}\n", task.id, task.title).as_bytes());
            }
            Ok(out)
        }
    }

    #[test]
    fn test_resolve_returns_registered_formatter() {
        let mut registry = FormatterRegistry::new();
        registry.register(ExportFormat::Csv, Arc::new(HeaderOnlyCsv));

        let formatter = registry.resolve(ExportFormat::Csv).unwrap();
        let bytes = formatter.format(&[]).unwrap();
        assert_eq!(bytes, b"id,title\n");
    }

    #[test]
    fn test_missing_registration_is_a_validation_error() {
        let registry = FormatterRegistry::new();
        let err = registry.resolve(ExportFormat::Ical).unwrap_err();
        assert!(err.is_code(ErrorCode::ValidationFailed));
        assert_eq!(err.message(), "unsupported export format: ical");
    }

    #[test]
    fn test_is_registered() {
        let mut registry = FormatterRegistry::new();
        assert!(!registry.is_registered(ExportFormat::Csv));
        registry.register(ExportFormat::Csv, Arc::new(HeaderOnlyCsv));
        assert!(registry.is_registered(ExportFormat::Csv));
    }
}
