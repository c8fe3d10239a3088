//! Error taxonomy for the pagination engine
//!
//! Only [`ConfigurationError`] is ever returned to the embedding application,
//! and only at attach time. Measurement and apply failures are recovered inside
//! the controller: the last good layout stays on screen and the failure is
//! logged.

use thiserror::Error;

/// Invalid layout configuration, fatal at attach time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// `pageHeight` was not supplied
    #[error("pageHeight is required")]
    MissingPageHeight,

    /// A dimension is negative, NaN or infinite
    #[error("{field} must be a non-negative finite number, got {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    /// Header and padding leave no room for content on a page
    #[error("per-page content capacity must be positive, got {capacity}px")]
    NonPositiveCapacity { capacity: f64 },

    /// Header, footer and padding together do not fit inside a page
    #[error("pageHeight {page_height}px does not exceed header, footer and padding ({chrome}px)")]
    ChromeExceedsPage { page_height: f64, chrome: f64 },

    /// Debounce window is not a usable duration
    #[error("debounceMs must be a non-negative finite number, got {0}")]
    InvalidDebounce(f64),

    /// Stability threshold of zero would never declare stability
    #[error("stabilityThreshold must be at least 1")]
    ZeroStabilityThreshold,
}

/// The rendering surface is not mounted or reported an unusable height
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("natural height unavailable (measured {measured})")]
pub struct MeasurementUnavailable {
    pub measured: f64,
}

/// Chrome mutation could not be completed by the host surface
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyFailure {
    /// The page container the chrome is inserted into does not exist
    #[error("chrome container is missing")]
    MissingContainer,

    /// The host rejected a single chrome element
    #[error("host rejected chrome element {element}: {reason}")]
    Rejected { element: String, reason: String },
}

/// Any failure a repagination cycle can hit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaginationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Measurement(#[from] MeasurementUnavailable),

    #[error("chrome apply failed: {0}")]
    Apply(#[from] ApplyFailure),

    /// Natural height would need more pages than the engine lays out
    #[error("natural height {height}px needs more than {limit} pages")]
    PageLimit { height: f64, limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::NonPositiveCapacity { capacity: -8.0 };
        assert_eq!(
            err.to_string(),
            "per-page content capacity must be positive, got -8px"
        );

        let err: PaginationError = ApplyFailure::MissingContainer.into();
        assert_eq!(err.to_string(), "chrome apply failed: chrome container is missing");
    }

    #[test]
    fn test_measurement_converts() {
        let err: PaginationError = MeasurementUnavailable { measured: 0.0 }.into();
        assert!(matches!(err, PaginationError::Measurement(_)));
    }
}
