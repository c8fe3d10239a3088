//! Page count and container height arithmetic
//!
//! Pure functions over a [`LayoutConfig`]. The rendered container for `n`
//! pages is
//!
//! ```text
//! paginated_height(n) = padding + page_height * n + overhead_per_extra_page * (n - 1)
//! ```
//!
//! and the page count for a measured natural height steps by the distance
//! between two consecutive paginated heights, so that a container that is
//! exactly `paginated_height(n)` tall (or one pixel short of it) maps back to
//! `n` pages.

use crate::config::{LayoutConfig, MAX_PAGE_COUNT};
use crate::error::{ConfigurationError, MeasurementUnavailable, PaginationError};

/// Rendered container height for `page_count` pages (counts below 1 clamp to 1)
pub fn paginated_height(config: &LayoutConfig, page_count: usize) -> f64 {
    let n = page_count.max(1) as f64;
    config.content_padding()
        + config.page_height * n
        + config.overhead_per_extra_page() * (n - 1.0)
}

/// Height of a single page container; content below this fits on one page
pub fn single_page_baseline(config: &LayoutConfig) -> f64 {
    paginated_height(config, 1)
}

/// Height each additional page adds to the container
pub fn page_stride(config: &LayoutConfig) -> f64 {
    config.page_height + config.overhead_per_extra_page()
}

/// Chrome that sits in the content flow at every page break
///
/// The part of [`page_stride`] that is not usable content capacity.
pub fn break_chrome_height(config: &LayoutConfig) -> f64 {
    page_stride(config) - config.per_page_capacity()
}

/// Number of pages needed for content of the given natural height
///
/// Never less than 1, including for empty content; negative heights count
/// as empty. NaN and infinite heights are not measurements, and heights
/// needing more than [`MAX_PAGE_COUNT`] pages are refused.
pub fn page_count_for(config: &LayoutConfig, natural_height: f64) -> Result<usize, PaginationError> {
    let capacity = config.per_page_capacity();
    if capacity <= 0.0 || !capacity.is_finite() {
        return Err(ConfigurationError::NonPositiveCapacity { capacity }.into());
    }
    if !natural_height.is_finite() {
        return Err(MeasurementUnavailable {
            measured: natural_height,
        }
        .into());
    }

    let excess = (natural_height - single_page_baseline(config)).max(0.0);
    let extra_pages = (excess / page_stride(config)).ceil();
    if extra_pages >= MAX_PAGE_COUNT as f64 {
        return Err(PaginationError::PageLimit {
            height: natural_height,
            limit: MAX_PAGE_COUNT,
        });
    }

    Ok(1 + extra_pages as usize)
}

/// Convenience wrapper binding the arithmetic to one configuration
#[derive(Debug, Clone, Copy)]
pub struct HeightArithmetic<'a> {
    config: &'a LayoutConfig,
}

impl<'a> HeightArithmetic<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn paginated_height(&self, page_count: usize) -> f64 {
        paginated_height(self.config, page_count)
    }

    pub fn page_count_for(&self, natural_height: f64) -> Result<usize, PaginationError> {
        page_count_for(self.config, natural_height)
    }

    pub fn single_page_baseline(&self) -> f64 {
        single_page_baseline(self.config)
    }

    pub fn page_stride(&self) -> f64 {
        page_stride(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn a4() -> LayoutConfig {
        LayoutConfig {
            page_height: 842.0,
            page_header_height: 50.0,
            page_gap: 20.0,
            page_gap_border_size: 1.0,
            content_padding_top: 24.0,
            content_padding_bottom: 24.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_single_page_height() {
        assert_eq!(paginated_height(&a4(), 1), 890.0); // 48 + 842
    }

    #[test]
    fn test_multi_page_height() {
        let config = a4();
        assert_eq!(paginated_height(&config, 2), 1803.0); // 48 + 842 * 2 + 71
        assert_eq!(paginated_height(&config, 8), 48.0 + 842.0 * 8.0 + 71.0 * 7.0);
        assert_eq!(paginated_height(&config, 9), 48.0 + 842.0 * 9.0 + 71.0 * 8.0);
    }

    #[test]
    fn test_zero_pages_clamps() {
        assert_eq!(paginated_height(&a4(), 0), paginated_height(&a4(), 1));
    }

    #[test]
    fn test_page_count_for_known_heights() {
        let config = a4();
        assert_eq!(page_count_for(&config, 0.0).unwrap(), 1);
        assert_eq!(page_count_for(&config, 890.0).unwrap(), 1);
        assert_eq!(page_count_for(&config, 891.0).unwrap(), 2);
        assert_eq!(page_count_for(&config, 1500.0).unwrap(), 2);
        assert_eq!(page_count_for(&config, 1803.0).unwrap(), 2);
        assert_eq!(page_count_for(&config, 1804.0).unwrap(), 3);
    }

    #[test]
    fn test_negative_height_counts_as_empty() {
        assert_eq!(page_count_for(&a4(), -100.0).unwrap(), 1);
    }

    #[test]
    fn test_non_finite_height_is_not_a_measurement() {
        let config = a4();
        for height in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                page_count_for(&config, height),
                Err(PaginationError::Measurement(_))
            ));
        }
    }

    #[test]
    fn test_huge_height_hits_page_limit() {
        let config = a4();
        for height in [1.0e13, 1.0e300, f64::MAX] {
            assert_eq!(
                page_count_for(&config, height),
                Err(PaginationError::PageLimit {
                    height,
                    limit: MAX_PAGE_COUNT
                })
            );
        }
        // The largest count still allowed
        let last = paginated_height(&config, MAX_PAGE_COUNT);
        assert_eq!(page_count_for(&config, last).unwrap(), MAX_PAGE_COUNT);
    }

    #[test]
    fn test_misconfiguration_fails() {
        let config = LayoutConfig {
            page_height: 90.0,
            ..a4()
        };
        assert_eq!(
            page_count_for(&config, 5000.0),
            Err(PaginationError::Configuration(
                ConfigurationError::NonPositiveCapacity { capacity: -8.0 }
            ))
        );
    }

    #[test]
    fn test_break_chrome_height() {
        // stride 913, capacity 744
        assert_eq!(break_chrome_height(&a4()), 169.0);
    }

    #[test]
    fn test_bound_wrapper() {
        let config = a4();
        let arithmetic = HeightArithmetic::new(&config);
        assert_eq!(arithmetic.single_page_baseline(), 890.0);
        assert_eq!(arithmetic.page_stride(), 913.0);
        assert_eq!(arithmetic.page_count_for(arithmetic.paginated_height(4)).unwrap(), 4);
    }

    proptest! {
        #[test]
        fn paginated_height_strictly_increasing(n in 1usize..500) {
            let config = a4();
            prop_assert!(paginated_height(&config, n + 1) > paginated_height(&config, n));
        }

        #[test]
        fn page_count_at_least_one(h in 0.0f64..1.0e7) {
            prop_assert!(page_count_for(&a4(), h).unwrap() >= 1);
        }

        #[test]
        fn page_count_round_trips(n in 1usize..2000) {
            let config = a4();
            let height = paginated_height(&config, n);
            prop_assert_eq!(page_count_for(&config, height).unwrap(), n);
            prop_assert_eq!(page_count_for(&config, height - 1.0).unwrap(), n);
        }

        #[test]
        fn round_trip_holds_for_any_valid_chrome(
            n in 1usize..200,
            page_height in 400.0f64..2000.0,
            header in 0.0f64..100.0,
            gap in 0.0f64..60.0,
            border in 0.0f64..4.0,
            padding in 0.0f64..60.0,
        ) {
            let config = LayoutConfig {
                page_height: page_height.round(),
                page_header_height: header.round(),
                page_footer_height: 0.0,
                page_gap: gap.round(),
                page_gap_border_size: border.round(),
                content_padding_top: padding.round(),
                content_padding_bottom: padding.round(),
                ..LayoutConfig::default()
            };
            let height = paginated_height(&config, n);
            prop_assert_eq!(page_count_for(&config, height).unwrap(), n);
            prop_assert_eq!(page_count_for(&config, height - 1.0).unwrap(), n);
        }
    }
}
