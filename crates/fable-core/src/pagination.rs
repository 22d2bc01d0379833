//! Page-number control computation for paged reading and editing views.

/// One control in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// A clickable 0-indexed page number.
    Number(usize),
    /// A gap between the fixed first/last page and the sliding window.
    Ellipsis,
}

/// Below this many pages every number is shown; above it the strip
/// collapses to first/last plus a sliding window. The original had both
/// 5 and 7 in circulation; 7 is the product constant here.
pub const SHOW_ALL_THRESHOLD: usize = 7;

/// Compute the pagination controls for `current` (0-indexed) out of
/// `total` pages.
///
/// Pure function, used identically by the edit and read views. The
/// output never contains a number outside `[0, total)` and never a
/// duplicate.
pub fn page_controls(total: usize, current: usize) -> Vec<PageControl> {
    if total == 0 {
        return Vec::new();
    }
    if total <= SHOW_ALL_THRESHOLD {
        return (0..total).map(PageControl::Number).collect();
    }

    // Sliding window [current-1, current+1], clamped to [1, total-2] so
    // it never collides with the fixed first/last controls.
    let low = current.saturating_sub(1).clamp(1, total - 2);
    let high = (current + 1).clamp(1, total - 2);

    let mut controls = Vec::with_capacity(7);
    controls.push(PageControl::Number(0));
    if low > 1 {
        controls.push(PageControl::Ellipsis);
    }
    for page in low..=high {
        controls.push(PageControl::Number(page));
    }
    if high < total - 2 {
        controls.push(PageControl::Ellipsis);
    }
    controls.push(PageControl::Number(total - 1));
    controls
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageControl::*;

    #[test]
    fn small_totals_show_every_page() {
        assert_eq!(page_controls(3, 1), vec![Number(0), Number(1), Number(2)]);
        assert_eq!(
            page_controls(7, 6),
            (0..7).map(Number).collect::<Vec<_>>()
        );
    }

    #[test]
    fn middle_of_a_long_strip_gets_two_ellipses() {
        assert_eq!(
            page_controls(20, 10),
            vec![
                Number(0),
                Ellipsis,
                Number(9),
                Number(10),
                Number(11),
                Ellipsis,
                Number(19),
            ]
        );
    }

    #[test]
    fn window_clamps_at_the_start() {
        assert_eq!(
            page_controls(20, 0),
            vec![Number(0), Number(1), Ellipsis, Number(19)]
        );
        assert_eq!(
            page_controls(20, 2),
            vec![
                Number(0),
                Number(1),
                Number(2),
                Number(3),
                Ellipsis,
                Number(19),
            ]
        );
    }

    #[test]
    fn window_clamps_at_the_end() {
        assert_eq!(
            page_controls(20, 19),
            vec![Number(0), Ellipsis, Number(18), Number(19)]
        );
    }

    #[test]
    fn no_out_of_range_or_duplicate_numbers() {
        for total in 1..40 {
            for current in 0..total {
                let controls = page_controls(total, current);
                let numbers: Vec<usize> = controls
                    .iter()
                    .filter_map(|c| match c {
                        Number(n) => Some(*n),
                        Ellipsis => None,
                    })
                    .collect();
                let mut deduped = numbers.clone();
                deduped.dedup();
                assert_eq!(numbers, deduped, "total={total} current={current}");
                assert!(numbers.iter().all(|&n| n < total));
                assert!(numbers.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn zero_total_yields_nothing() {
        assert!(page_controls(0, 0).is_empty());
    }
}
