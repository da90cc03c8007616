//! Page arithmetic shared by the list controller and the table footer.

/// Number of pages implied by `total`, never less than 1.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamps a requested page into `[1, page_count(total, page_size)]`.
pub fn clamp_page(page: u32, total: u64, page_size: u32) -> u32 {
    page.clamp(1, page_count(total, page_size))
}

/// 1-based item range displayed on `page`, as `(first, last)`.
///
/// `(0, 0)` when there is nothing to show.
pub fn visible_range(page: u32, page_size: u32, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let size = u64::from(page_size.max(1));
    let page = u64::from(clamp_page(page, total, page_size));
    let first = (page - 1) * size + 1;
    let last = (page * size).min(total);
    (first, last)
}

/// Page numbers to offer as direct buttons: at most `width` of them, centred
/// on `current` and shifted inward at either end.
///
/// Empty when there is nothing to page through.
pub fn page_window(current: u32, page_size: u32, total: u64, width: u32) -> Vec<u32> {
    if total == 0 || width == 0 {
        return Vec::new();
    }
    let count = page_count(total, page_size);
    let current = current.clamp(1, count);
    let width = width.min(count);
    let start = current
        .saturating_sub(width / 2)
        .clamp(1, count - width + 1);
    (start..start + width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 8, 1)]
    #[case(1, 8, 1)]
    #[case(8, 8, 1)]
    #[case(9, 8, 2)]
    #[case(17, 8, 3)]
    #[case(100, 0, 100)]
    fn page_count_is_ceiling_with_floor_of_one(
        #[case] total: u64,
        #[case] size: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(page_count(total, size), expected);
    }

    #[rstest]
    #[case(0, 17, 8, 1)]
    #[case(4, 17, 8, 3)]
    #[case(2, 17, 8, 2)]
    #[case(3, 0, 8, 1)]
    fn clamp_stays_within_bounds(
        #[case] page: u32,
        #[case] total: u64,
        #[case] size: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(clamp_page(page, total, size), expected);
    }

    #[test]
    fn clamp_holds_for_a_grid_of_inputs() {
        for total in 0..40u64 {
            for size in 1..10u32 {
                for page in 0..12u32 {
                    let clamped = clamp_page(page, total, size);
                    assert!(clamped >= 1);
                    assert!(clamped <= page_count(total, size));
                }
            }
        }
    }

    #[test]
    fn visible_range_covers_partial_last_page() {
        assert_eq!(visible_range(1, 8, 0), (0, 0));
        assert_eq!(visible_range(1, 8, 17), (1, 8));
        assert_eq!(visible_range(3, 8, 17), (17, 17));
        assert_eq!(visible_range(9, 8, 17), (17, 17));
    }

    #[rstest]
    #[case(1, 0, vec![])]
    #[case(1, 8, vec![1])]
    #[case(1, 40, vec![1, 2, 3, 4, 5])]
    #[case(3, 40, vec![1, 2, 3, 4, 5])]
    #[case(4, 80, vec![2, 3, 4, 5, 6])]
    #[case(10, 80, vec![6, 7, 8, 9, 10])]
    #[case(9, 80, vec![6, 7, 8, 9, 10])]
    #[case(2, 17, vec![1, 2, 3])]
    fn page_window_is_bounded_and_follows_the_current_page(
        #[case] current: u32,
        #[case] total: u64,
        #[case] expected: Vec<u32>,
    ) {
        assert_eq!(page_window(current, 8, total, 5), expected);
    }
}
