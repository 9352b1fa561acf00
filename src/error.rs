//! Error types for the designer.

use crate::element::{ElementKind, Property};
use crate::preview::Backend;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ModelError {
    #[error("{kind} elements have no {property} property")]
    NotApplicable { kind: ElementKind, property: Property },

    #[error("element index {index} out of range (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub(crate) enum SurfaceError {
    /// A frame ended with pushes and pops that do not match.
    #[error("unbalanced {what} stack: {pushed} pushed, {popped} popped")]
    Unbalanced {
        what: &'static str,
        pushed: usize,
        popped: usize,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub(crate) enum PreviewError {
    #[error("no rendering backend could be started ({})", describe_attempts(.attempts))]
    NoBackend { attempts: Vec<(Backend, String)> },

    #[error("render error: {0}")]
    Frame(#[from] SurfaceError),
}

fn describe_attempts(attempts: &[(Backend, String)]) -> String {
    attempts
        .iter()
        .map(|(backend, err)| format!("{backend}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_backend_lists_every_attempt() {
        let err = PreviewError::NoBackend {
            attempts: vec![
                (Backend::Wgpu, "no adapter".into()),
                (Backend::Glow, "no GL context".into()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("wgpu: no adapter"), "{msg}");
        assert!(msg.contains("glow: no GL context"), "{msg}");
    }

    #[test]
    fn test_not_applicable_message() {
        let err = ModelError::NotApplicable {
            kind: ElementKind::Checkbox,
            property: Property::Items,
        };
        assert_eq!(err.to_string(), "Checkbox elements have no Items property");
    }
}
