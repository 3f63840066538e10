//! Percentage helpers shared by realm progress and quiz scoring.

/// Score a quiz must reach for the lesson to count as mastered.
pub const PERFECT_SCORE: i32 = 100;

/// `round(100 × part / whole)`, rounding halves up. Returns 0 when `whole` is 0.
#[must_use]
pub fn percent(part: usize, whole: usize) -> i32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    let rounded = (200 * part + whole) / (2 * whole);
    i32::try_from(rounded).unwrap_or(PERFECT_SCORE)
}

/// Realm progress for `completed` out of `total` lessons.
#[must_use]
pub fn realm_progress(completed: usize, total: usize) -> i32 {
    percent(completed, total)
}

/// Quiz score as a rounded percentage, or `None` for a quiz without questions.
#[must_use]
pub fn quiz_score(correct: usize, total: usize) -> Option<i32> {
    (total > 0).then(|| percent(correct, total))
}
