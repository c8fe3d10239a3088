//! Page layout configuration
//!
//! [`PaginationOptions`] is the loosely typed surface the embedding
//! application configures (every field optional, camelCase on the wire).
//! [`LayoutConfig`] is the resolved, validated value the engine owns for its
//! whole lifetime.

mod loader;

pub use loader::{load_file, ConfigError};

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// A4 height at 72 DPI
pub const A4_PAGE_HEIGHT: f64 = 842.0;
pub const DEFAULT_HEADER_HEIGHT: f64 = 50.0;
pub const DEFAULT_FOOTER_HEIGHT: f64 = 50.0;
pub const DEFAULT_PAGE_GAP: f64 = 20.0;
pub const DEFAULT_GAP_BORDER: f64 = 1.0;
pub const DEFAULT_CONTENT_PADDING: f64 = 24.0;
pub const DEFAULT_BREAK_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_DEBOUNCE_MS: f64 = 150.0;
/// Upper bound on pages a single measurement may request
pub const MAX_PAGE_COUNT: usize = 100_000;

/// User-facing pagination options, all optional except `pageHeight`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaginationOptions {
    pub page_height: Option<f64>,
    pub page_header_height: Option<f64>,
    pub page_footer_height: Option<f64>,
    pub page_gap: Option<f64>,
    pub page_gap_border_size: Option<f64>,
    pub content_padding_top: Option<f64>,
    pub content_padding_bottom: Option<f64>,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub page_break_background: Option<String>,
    pub debounce_ms: Option<f64>,
    pub stability_threshold: Option<u32>,
}

/// Resolved layout configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_height: f64,
    pub page_header_height: f64,
    pub page_footer_height: f64,
    pub page_gap: f64,
    pub page_gap_border_size: f64,
    pub content_padding_top: f64,
    pub content_padding_bottom: f64,
    pub header_text: String,
    pub footer_text: String,
    pub page_break_background: String,
    /// Quiet period before a burst of changes triggers a recompute
    pub debounce_ms: f64,
    /// Consecutive cycles with an unchanged page count before pagination is
    /// declared stable
    pub stability_threshold: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::with_page_height(A4_PAGE_HEIGHT)
    }
}

impl LayoutConfig {
    /// Default chrome around a page of the given height
    pub fn with_page_height(page_height: f64) -> Self {
        Self {
            page_height,
            page_header_height: DEFAULT_HEADER_HEIGHT,
            page_footer_height: DEFAULT_FOOTER_HEIGHT,
            page_gap: DEFAULT_PAGE_GAP,
            page_gap_border_size: DEFAULT_GAP_BORDER,
            content_padding_top: DEFAULT_CONTENT_PADDING,
            content_padding_bottom: DEFAULT_CONTENT_PADDING,
            header_text: String::new(),
            footer_text: String::new(),
            page_break_background: DEFAULT_BREAK_BACKGROUND.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stability_threshold: 1,
        }
    }

    /// Resolve options against defaults and validate the result
    pub fn resolve(options: PaginationOptions) -> Result<Self, ConfigurationError> {
        let page_height = options
            .page_height
            .ok_or(ConfigurationError::MissingPageHeight)?;
        let defaults = Self::with_page_height(page_height);

        let config = Self {
            page_height,
            page_header_height: options
                .page_header_height
                .unwrap_or(defaults.page_header_height),
            page_footer_height: options
                .page_footer_height
                .unwrap_or(defaults.page_footer_height),
            page_gap: options.page_gap.unwrap_or(defaults.page_gap),
            page_gap_border_size: options
                .page_gap_border_size
                .unwrap_or(defaults.page_gap_border_size),
            content_padding_top: options
                .content_padding_top
                .unwrap_or(defaults.content_padding_top),
            content_padding_bottom: options
                .content_padding_bottom
                .unwrap_or(defaults.content_padding_bottom),
            header_text: options.header_text.unwrap_or(defaults.header_text),
            footer_text: options.footer_text.unwrap_or(defaults.footer_text),
            page_break_background: options
                .page_break_background
                .unwrap_or(defaults.page_break_background),
            debounce_ms: options.debounce_ms.unwrap_or(defaults.debounce_ms),
            stability_threshold: options
                .stability_threshold
                .unwrap_or(defaults.stability_threshold),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the arithmetic relies on
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let dimensions = [
            ("pageHeight", self.page_height),
            ("pageHeaderHeight", self.page_header_height),
            ("pageFooterHeight", self.page_footer_height),
            ("pageGap", self.page_gap),
            ("pageGapBorderSize", self.page_gap_border_size),
            ("contentPaddingTop", self.content_padding_top),
            ("contentPaddingBottom", self.content_padding_bottom),
        ];
        for (field, value) in dimensions {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidDimension { field, value });
            }
        }

        if !self.debounce_ms.is_finite() || self.debounce_ms < 0.0 {
            return Err(ConfigurationError::InvalidDebounce(self.debounce_ms));
        }
        if self.stability_threshold == 0 {
            return Err(ConfigurationError::ZeroStabilityThreshold);
        }

        let capacity = self.per_page_capacity();
        if capacity <= 0.0 {
            return Err(ConfigurationError::NonPositiveCapacity { capacity });
        }

        let chrome = self.page_header_height + self.page_footer_height + self.content_padding();
        if self.page_height <= chrome {
            return Err(ConfigurationError::ChromeExceedsPage {
                page_height: self.page_height,
                chrome,
            });
        }

        Ok(())
    }

    /// Combined top and bottom content padding
    pub fn content_padding(&self) -> f64 {
        self.content_padding_top + self.content_padding_bottom
    }

    /// Usable content height inside one page after header and padding
    pub fn per_page_capacity(&self) -> f64 {
        self.page_height - self.page_header_height - self.content_padding()
    }

    /// Extra height every page after the first adds on top of `page_height`
    pub fn overhead_per_extra_page(&self) -> f64 {
        self.page_gap + self.page_gap_border_size + self.page_header_height
    }
}

impl From<&LayoutConfig> for PaginationOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            page_height: Some(config.page_height),
            page_header_height: Some(config.page_header_height),
            page_footer_height: Some(config.page_footer_height),
            page_gap: Some(config.page_gap),
            page_gap_border_size: Some(config.page_gap_border_size),
            content_padding_top: Some(config.content_padding_top),
            content_padding_bottom: Some(config.content_padding_bottom),
            header_text: Some(config.header_text.clone()),
            footer_text: Some(config.footer_text.clone()),
            page_break_background: Some(config.page_break_background.clone()),
            debounce_ms: Some(config.debounce_ms),
            stability_threshold: Some(config.stability_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.page_height, 842.0);
        assert_eq!(config.content_padding(), 48.0);
        assert_eq!(config.per_page_capacity(), 744.0); // 842 - 50 - 48
        assert_eq!(config.overhead_per_extra_page(), 71.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let options = PaginationOptions {
            page_height: Some(842.0),
            header_text: Some("transcript.txt".to_string()),
            footer_text: Some("Page".to_string()),
            ..Default::default()
        };

        let config = LayoutConfig::resolve(options).unwrap();
        assert_eq!(config.page_header_height, 50.0);
        assert_eq!(config.page_gap, 20.0);
        assert_eq!(config.page_gap_border_size, 1.0);
        assert_eq!(config.header_text, "transcript.txt");
        assert_eq!(config.footer_text, "Page");
    }

    #[test]
    fn test_resolve_requires_page_height() {
        let err = LayoutConfig::resolve(PaginationOptions::default()).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingPageHeight);
    }

    #[test]
    fn test_non_positive_capacity_rejected() {
        let config = LayoutConfig {
            page_header_height: 800.0,
            ..LayoutConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NonPositiveCapacity { capacity: -6.0 })
        );
    }

    #[test]
    fn test_footer_counted_in_chrome() {
        let config = LayoutConfig {
            page_footer_height: 744.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::ChromeExceedsPage { .. })
        ));
    }

    #[test]
    fn test_invalid_dimension_rejected() {
        let config = LayoutConfig {
            page_gap: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidDimension { field: "pageGap", .. })
        ));

        let config = LayoutConfig {
            content_padding_top: -1.0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tunables_validated() {
        let config = LayoutConfig {
            stability_threshold: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::ZeroStabilityThreshold));

        let config = LayoutConfig {
            debounce_ms: -5.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::InvalidDebounce(-5.0)));
    }

    #[test]
    fn test_options_round_trip_through_json() {
        let config = LayoutConfig::default();
        let options = PaginationOptions::from(&config);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"pageGapBorderSize\":1.0"));

        let parsed: PaginationOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(LayoutConfig::resolve(parsed).unwrap(), config);
    }
}
