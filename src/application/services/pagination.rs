//! # Pagination Planner
//!
//! Splits a requested result size into upstream-API-sized pages.
//!
//! The upstream ranking source caps how many entries one call may return,
//! so a request for `total_limit` entries fans out into
//! `ceil(total_limit / page_size)` sequential calls. Every page is full
//! except possibly the last, and the per-page counts always sum to the
//! requested total.
//!
//! All functions here are pure; the fan-out itself lives in the ranking
//! service.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::application::services::pagination::{limit_for_page, page_count};
//!
//! assert_eq!(page_count(250, 100), 3);
//! assert_eq!(limit_for_page(0, 250, 100), 100);
//! assert_eq!(limit_for_page(2, 250, 100), 50);
//! ```

use serde::{Deserialize, Serialize};

/// Default upstream page size.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// One planned upstream call: which page to request and how many entries
/// to ask for on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePlan {
    /// 0-based upstream page index.
    pub page_index: u32,
    /// Number of entries to request on this page.
    pub count_for_page: u32,
}

/// Returns the number of pages needed to fetch `total_limit` entries.
///
/// A `total_limit` of zero needs zero pages; a `page_size` of zero is
/// treated the same way so the function stays total.
#[must_use]
pub fn page_count(total_limit: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_limit.div_ceil(page_size)
}

/// Returns the number of entries to request on `page_index` (0-based).
///
/// Pages at or beyond [`page_count`] yield zero. The last in-range page
/// carries `total_limit mod page_size` entries, or a full `page_size`
/// when the total divides evenly.
#[must_use]
pub fn limit_for_page(page_index: u32, total_limit: u32, page_size: u32) -> u32 {
    if page_index >= page_count(total_limit, page_size) {
        return 0;
    }

    // u64 so (page_index + 1) * page_size cannot overflow.
    if (u64::from(page_index) + 1) * u64::from(page_size) > u64::from(total_limit) {
        let remainder = total_limit % page_size;
        if remainder == 0 { page_size } else { remainder }
    } else {
        page_size
    }
}

/// Plans the full fan-out for `total_limit` entries.
#[must_use]
pub fn plan(total_limit: u32, page_size: u32) -> Vec<PagePlan> {
    (0..page_count(total_limit, page_size))
        .map(|page_index| PagePlan {
            page_index,
            count_for_page: limit_for_page(page_index, total_limit, page_size),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(total_limit: u32, page_size: u32) -> Vec<u32> {
        plan(total_limit, page_size)
            .iter()
            .map(|p| p.count_for_page)
            .collect()
    }

    #[test]
    fn partial_last_page() {
        assert_eq!(counts(250, 100), vec![100, 100, 50]);
    }

    #[test]
    fn exactly_one_full_page() {
        assert_eq!(counts(100, 100), vec![100]);
    }

    #[test]
    fn evenly_divisible_total() {
        assert_eq!(counts(300, 100), vec![100, 100, 100]);
    }

    #[test]
    fn total_smaller_than_page() {
        assert_eq!(counts(8, 10), vec![8]);
    }

    #[test]
    fn zero_total_plans_no_pages() {
        assert_eq!(page_count(0, 100), 0);
        assert!(plan(0, 100).is_empty());
        assert_eq!(limit_for_page(0, 0, 100), 0);
    }

    #[test]
    fn out_of_range_page_is_zero() {
        assert_eq!(limit_for_page(1, 10, 10), 0);
        assert_eq!(limit_for_page(2, 8, 10), 0);
    }

    #[test]
    fn zero_page_size_is_degenerate() {
        assert_eq!(page_count(100, 0), 0);
        assert_eq!(limit_for_page(0, 100, 0), 0);
        assert!(plan(100, 0).is_empty());
    }

    #[test]
    fn large_values_do_not_overflow() {
        assert_eq!(page_count(u32::MAX, 1), u32::MAX);
        assert_eq!(limit_for_page(u32::MAX - 1, u32::MAX, 1), 1);
    }

    proptest! {
        #[test]
        fn counts_sum_to_total(total in 0u32..100_000, page_size in 1u32..1_000) {
            let sum: u64 = plan(total, page_size)
                .iter()
                .map(|p| u64::from(p.count_for_page))
                .sum();
            prop_assert_eq!(sum, u64::from(total));
        }

        #[test]
        fn all_pages_full_except_last(total in 1u32..100_000, page_size in 1u32..1_000) {
            let pages = plan(total, page_size);
            let (last, interior) = pages.split_last().unwrap();
            for page in interior {
                prop_assert_eq!(page.count_for_page, page_size);
            }
            prop_assert!(last.count_for_page > 0);
            prop_assert!(last.count_for_page <= page_size);
        }

        #[test]
        fn page_indices_are_sequential(total in 0u32..10_000, page_size in 1u32..500) {
            for (i, page) in plan(total, page_size).iter().enumerate() {
                prop_assert_eq!(u64::from(page.page_index), i as u64);
            }
        }
    }
}
