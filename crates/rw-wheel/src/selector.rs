//! Outcome selection
//!
//! Maps a wheel rotation to the segment under the fixed pointer at the top of
//! the circle. Pure and deterministic: the only source of chance in a wheel
//! draw is when the user lets go.

use rw_core::TAU;

/// Pointer position, top of the circle in canvas orientation
pub const POINTER_ANGLE: f64 = -std::f64::consts::FRAC_PI_2;

/// Reduce any angle into `[0, TAU)`
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if normalized >= TAU { 0.0 } else { normalized }
}

/// Index of the winning segment, `None` for an empty wheel
pub fn pick_winning_index(item_count: usize, rotation: f64) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let segment_angle = TAU / item_count as f64;
    let adjusted = normalize_angle(POINTER_ANGLE - rotation);
    let index = (adjusted / segment_angle).floor();
    let index = if index.is_finite() && index > 0.0 {
        index as usize
    } else {
        0
    };
    Some(index.min(item_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_four_segment_table() {
        // Segment i spans [i·π/2, (i+1)·π/2) of (pointer − rotation)
        let table = [
            // Exact boundaries land on the segment starting there
            (0.0, 3),
            (FRAC_PI_2, 2),
            (PI, 1),
            (3.0 * FRAC_PI_2, 0),
            (-0.1, 3),
            (0.1, 2),
            (FRAC_PI_2 + 0.1, 1),
            (PI + 0.1, 0),
            (3.0 * FRAC_PI_2 + 0.1, 3),
            (FRAC_PI_2 - 0.1, 2),
        ];
        for (rotation, expected) in table {
            assert_eq!(
                pick_winning_index(4, rotation),
                Some(expected),
                "rotation {rotation}"
            );
        }
    }

    #[test]
    fn test_index_always_in_range() {
        for count in 1..=40usize {
            let mut rotation = -50.0;
            while rotation < 50.0 {
                let index = pick_winning_index(count, rotation).unwrap();
                assert!(index < count);
                rotation += 0.173;
            }
        }
    }

    #[test]
    fn test_periodic_in_full_turns() {
        for count in [2usize, 3, 7, 100, 500] {
            for step in 0..200 {
                // Offset from segment edges so float noise cannot flip the result
                let rotation = step as f64 * 0.0917 + 0.5 * TAU / count as f64 * 0.37;
                assert_eq!(
                    pick_winning_index(count, rotation),
                    pick_winning_index(count, rotation + TAU)
                );
            }
        }
    }

    #[test]
    fn test_single_item_always_wins() {
        assert_eq!(pick_winning_index(1, 123.456), Some(0));
        assert_eq!(pick_winning_index(0, 1.0), None);
    }

    #[test]
    fn test_non_finite_rotation_is_clamped() {
        assert_eq!(pick_winning_index(5, f64::NAN), Some(0));
    }

    #[test]
    fn test_normalize_angle() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(TAU + 1.0), 1.0, epsilon = 1e-12);
        assert!(normalize_angle(-1e-18) < TAU);
    }
}
