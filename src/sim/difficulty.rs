//! Difficulty curve
//!
//! Level and visibility window are both driven by score alone. The window is
//! decayed from its previous value on each level-up (not recomputed from the
//! level), so float rounding compounds once per level.

/// Level implied by a score
#[inline]
pub fn level_for_score(score: u64, points_per_level: u64) -> u32 {
    (1 + score / points_per_level.max(1)) as u32
}

/// True when reaching `score` crosses a level boundary
#[inline]
pub fn is_level_up(score: u64, points_per_level: u64) -> bool {
    score > 0 && score.is_multiple_of(points_per_level.max(1))
}

/// Shrink the visibility window by one level step, floored
#[inline]
pub fn next_time_limit(prev_ms: f64, decay: f64, floor_ms: f64) -> f64 {
    (prev_ms * decay).max(floor_ms)
}

/// Whole-millisecond delay used to arm the disappearance timer
#[inline]
pub fn timer_delay_ms(time_limit_ms: f64) -> u64 {
    time_limit_ms.round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0, 5), 1);
        assert_eq!(level_for_score(4, 5), 1);
        assert_eq!(level_for_score(5, 5), 2);
        assert_eq!(level_for_score(14, 5), 3);
        assert_eq!(level_for_score(15, 5), 4);
    }

    #[test]
    fn test_is_level_up() {
        assert!(!is_level_up(0, 5));
        assert!(!is_level_up(4, 5));
        assert!(is_level_up(5, 5));
        assert!(!is_level_up(6, 5));
        assert!(is_level_up(10, 5));
    }

    #[test]
    fn test_time_limit_sequence_reaches_floor() {
        let mut limit = INITIAL_TIME_LIMIT_MS;
        let mut seen = vec![limit];
        for _ in 0..12 {
            limit = next_time_limit(limit, TIME_LIMIT_DECAY, MIN_TIME_LIMIT_MS);
            seen.push(limit);
        }
        assert_eq!(seen[1], 1800.0);
        assert!((seen[2] - 1620.0).abs() < 1e-9);
        assert!((seen[3] - 1458.0).abs() < 1e-9);
        // 2000 * 0.9^8 ~= 860.9, the ninth step would be ~774.8 and gets floored
        assert!(seen[8] > MIN_TIME_LIMIT_MS);
        assert_eq!(seen[9], MIN_TIME_LIMIT_MS);
        assert_eq!(seen[12], MIN_TIME_LIMIT_MS);
        assert!(seen.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_timer_delay_rounds() {
        assert_eq!(timer_delay_ms(2000.0), 2000);
        assert_eq!(timer_delay_ms(1312.2), 1312);
        assert_eq!(timer_delay_ms(1062.882), 1063);
    }
}
