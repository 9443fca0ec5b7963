use std::time::Duration;

/// Base score values for line clears.
///
/// Index corresponds to the number of lines cleared by one lock event; the
/// base value is multiplied by the level current at lock time. Clearing more
/// than four lines at once pays the last tier.
pub const LINE_SCORES: [usize; 5] = [0, 100, 300, 500, 800];

/// Points per cell descended by a soft drop (manual or gravity).
pub const SOFT_DROP_POINTS: usize = 1;

/// Points per cell of a hard drop's computed distance.
pub const HARD_DROP_POINTS: usize = 2;

/// Automatic-drop intervals by level, slowest first.
///
/// Levels past the end of the table stay clamped at the fastest entry.
pub const FALL_INTERVALS: [Duration; 10] = [
    Duration::from_millis(800),
    Duration::from_millis(650),
    Duration::from_millis(500),
    Duration::from_millis(400),
    Duration::from_millis(300),
    Duration::from_millis(250),
    Duration::from_millis(200),
    Duration::from_millis(150),
    Duration::from_millis(100),
    Duration::from_millis(50),
];

/// Score awarded for clearing `cleared` lines at `level`.
#[must_use]
pub fn line_clear_score(cleared: usize, level: usize) -> usize {
    LINE_SCORES[cleared.min(LINE_SCORES.len() - 1)] * level
}

/// Level derived from the cumulative score: one level per 1000 points,
/// starting at 1.
#[must_use]
pub fn level_for_score(score: usize) -> usize {
    score / 1000 + 1
}

/// Automatic-drop interval for the given level.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    FALL_INTERVALS[level.saturating_sub(1).min(FALL_INTERVALS.len() - 1)]
}
