//! Tracing subscriber initialization for native hosts
//!
//! The library only emits `tracing` events. Binaries call [`init`] once;
//! embedders with their own subscriber skip it.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Install a stderr subscriber
///
/// `filter` overrides `RUST_LOG`; without either the level is `info`.
pub fn init(filter: Option<&str>) -> Result<(), LoggingError> {
    let env_filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
                filter: directives.to_string(),
                reason: e.to_string(),
            })?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        let err = init(Some("page_flow=notalevel")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
    }
}
