/// Spreading a story of any length across the five-stage arc.
///
/// A page at zero-based `ordinal` in a story of `total` pages sits at
/// `round(ordinal / (total - 1) * 4)`. Ties round half to even, and the
/// division is done in integers so ties are detected exactly: in a
/// nine-page story the second page (0.5) stays at stage 0 while the
/// fourth (1.5) moves up to stage 2.

use crate::schema::stage::Stage;

const LAST_STAGE: usize = 4;

/// Arc index (0..=4) for the page at `ordinal` among `total` pages.
///
/// `ordinal` is the submission position, not the page's own index. A
/// single-page story (or an empty one) always maps to 0; ordinals past
/// the end clamp to the final stage.
pub fn stage_index(ordinal: usize, total: usize) -> usize {
    if total <= 1 {
        return 0;
    }
    let span = total - 1;
    if ordinal >= span {
        return LAST_STAGE;
    }

    let scaled = ordinal * LAST_STAGE;
    let quotient = scaled / span;
    let twice_remainder = (scaled % span) * 2;

    let rounded = if twice_remainder > span || (twice_remainder == span && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(LAST_STAGE)
}

/// The stage for the page at `ordinal` among `total` pages.
pub fn stage(ordinal: usize, total: usize) -> Stage {
    Stage::from_index(stage_index(ordinal, total))
}

/// Stages for every page of a `total`-page story, in order.
pub fn arc(total: usize) -> Vec<Stage> {
    (0..total).map(|ordinal| stage(ordinal, total)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_is_opening() {
        assert_eq!(stage_index(0, 1), 0);
        assert_eq!(stage_index(0, 0), 0);
    }

    #[test]
    fn endpoints_for_every_length() {
        for total in 2..=40 {
            assert_eq!(stage_index(0, total), 0, "total={}", total);
            assert_eq!(stage_index(total - 1, total), 4, "total={}", total);
        }
    }

    #[test]
    fn non_decreasing_for_every_length() {
        for total in 1..=40 {
            let stages: Vec<usize> = (0..total).map(|i| stage_index(i, total)).collect();
            assert!(
                stages.windows(2).all(|w| w[0] <= w[1]),
                "total={} stages={:?}",
                total,
                stages
            );
        }
    }

    #[test]
    fn five_pages_cover_every_stage() {
        assert_eq!(arc(5), Stage::ALL.to_vec());
    }

    #[test]
    fn three_pages() {
        assert_eq!(
            arc(3),
            vec![Stage::Opening, Stage::Disruption, Stage::Resolution]
        );
    }

    #[test]
    fn ties_round_half_to_even() {
        // nine pages: ordinals 1, 3, 5, 7 land exactly on .5
        assert_eq!(stage_index(1, 9), 0);
        assert_eq!(stage_index(3, 9), 2);
        assert_eq!(stage_index(5, 9), 2);
        assert_eq!(stage_index(7, 9), 4);
    }

    #[test]
    fn non_ties_round_to_nearest() {
        // four pages: 0, 1.33, 2.67, 4
        assert_eq!(
            (0..4).map(|i| stage_index(i, 4)).collect::<Vec<_>>(),
            vec![0, 1, 3, 4]
        );
    }

    #[test]
    fn ordinal_past_end_clamps() {
        assert_eq!(stage_index(10, 3), 4);
        assert_eq!(stage(10, 3), Stage::Resolution);
    }
}
