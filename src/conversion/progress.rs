//! Two-phase progress percentage
//!
//! Extraction fills 0-30%, synthesis fills 30-100%.

/// Share of the progress bar given to extraction
pub const EXTRACTION_SHARE: u8 = 30;

/// Share of the progress bar given to synthesis
pub const SYNTHESIS_SHARE: u8 = 100 - EXTRACTION_SHARE;

/// Progress after `done` of `total` pages have been extracted
pub fn extraction_percent(done: usize, total: usize) -> u8 {
    scaled(done, total, EXTRACTION_SHARE)
}

/// Progress after `done` of `total` pages have been spoken
pub fn synthesis_percent(done: usize, total: usize) -> u8 {
    EXTRACTION_SHARE + scaled(done, total, SYNTHESIS_SHARE)
}

/// round(done / total * share), with an empty total counting as finished
fn scaled(done: usize, total: usize, share: u8) -> u8 {
    if total == 0 {
        return share;
    }
    let done = done.min(total);
    ((done as f64 / total as f64) * share as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_page_extraction() {
        assert_eq!(extraction_percent(0, 3), 0);
        assert_eq!(extraction_percent(1, 3), 10);
        assert_eq!(extraction_percent(2, 3), 20);
        assert_eq!(extraction_percent(3, 3), 30);
    }

    #[test]
    fn test_three_page_synthesis() {
        assert_eq!(synthesis_percent(0, 3), 30);
        assert_eq!(synthesis_percent(1, 3), 53);
        assert_eq!(synthesis_percent(2, 3), 77);
        assert_eq!(synthesis_percent(3, 3), 100);
    }

    #[test]
    fn test_matches_rounding_formula() {
        for total in 1..=40usize {
            for k in 0..=total {
                let expected = 30 + ((k as f64 / total as f64) * 70.0).round() as u8;
                assert_eq!(synthesis_percent(k, total), expected, "k={} total={}", k, total);
            }
        }
    }

    #[test]
    fn test_extraction_monotonic_and_ends_at_30() {
        for total in 1..=40usize {
            let mut last = 0;
            for k in 1..=total {
                let p = extraction_percent(k, total);
                assert!(p >= last);
                last = p;
            }
            assert_eq!(last, 30);
        }
    }

    #[test]
    fn test_degenerate_totals() {
        assert_eq!(extraction_percent(0, 0), 30);
        assert_eq!(synthesis_percent(0, 0), 100);
        assert_eq!(synthesis_percent(9, 3), 100);
    }
}
