/// Weight of one solved easy problem.
pub const EASY_WEIGHT: i32 = 1;
/// Weight of one solved medium problem.
pub const MEDIUM_WEIGHT: i32 = 3;
/// Weight of one solved hard problem.
pub const HARD_WEIGHT: i32 = 5;
/// Share of the contest rating added on top of the problem score.
pub const CONTEST_BONUS_FACTOR: f64 = 0.2;

/// The composite rating together with its two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBreakdown {
    /// Weighted sum of solved problems.
    pub problem_rating: i32,
    /// `floor(contest_rating * 0.2)`.
    pub contest_bonus: i32,
    /// `problem_rating + contest_bonus`.
    pub rating: i32,
}

impl RatingBreakdown {
    /// Compute all components from solved counts and a contest rating.
    ///
    /// Integer arithmetic saturates at the `i32` bounds. A non-finite contest
    /// rating contributes no bonus.
    pub fn compute(easy: i32, medium: i32, hard: i32, contest_rating: f64) -> Self {
        let problem_rating = easy
            .saturating_mul(EASY_WEIGHT)
            .saturating_add(medium.saturating_mul(MEDIUM_WEIGHT))
            .saturating_add(hard.saturating_mul(HARD_WEIGHT));

        let contest_bonus = if contest_rating.is_finite() {
            // `as` saturates out-of-range floats.
            (contest_rating * CONTEST_BONUS_FACTOR).floor() as i32
        } else {
            0
        };

        Self {
            problem_rating,
            contest_bonus,
            rating: problem_rating.saturating_add(contest_bonus),
        }
    }
}

/// Composite score: `easy*1 + medium*3 + hard*5 + floor(contest_rating*0.2)`.
pub fn compute_rating(easy: i32, medium: i32, hard: i32, contest_rating: f64) -> i32 {
    RatingBreakdown::compute(easy, medium, hard, contest_rating).rating
}
