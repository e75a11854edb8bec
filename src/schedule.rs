use crate::card::resolve_weight;
use crate::error::Error;
use crate::error::Result;
use crate::grade::Grade;
use time::Duration;
use time::OffsetDateTime;
use tracing::debug;

pub const MIN_STABILITY: f64 = 2.4;
pub const MAX_STABILITY: f64 = 8760.0;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;
/// Effective score of a "Good" answer on a card of default weight.
pub const EXPECTED_SCORE: f64 = 2.0;
pub const DIFFICULTY_RATE: f64 = 0.3;

pub const DEFAULT_STABILITY: f64 = 24.0;
pub const DEFAULT_DIFFICULTY: f64 = 5.0;

const AGAIN_PENALTY: f64 = 0.5;
const GROWTH_RATE: f64 = 0.15;
const NEUTRAL_DIFFICULTY: f64 = 5.0;
const DIFFICULTY_INTERVAL_RATE: f64 = 0.12;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// The scheduling state of a topic. Stability is in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topic {
    pub stability: f64,
    pub difficulty: f64,
    pub next_review: OffsetDateTime,
    pub last_reviewed: Option<OffsetDateTime>,
}

impl Topic {
    /// A topic that has never been reviewed and is due immediately.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            difficulty: DEFAULT_DIFFICULTY,
            next_review: now,
            last_reviewed: None,
        }
    }

    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.next_review <= now
    }

    /// The topic as it stands after `result` has been persisted.
    pub fn apply(&self, result: &SchedulingResult) -> Self {
        Self {
            stability: result.stability,
            difficulty: result.difficulty,
            next_review: result.next_review,
            last_reviewed: Some(result.last_reviewed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingResult {
    pub stability: f64,
    pub difficulty: f64,
    pub next_review: OffsetDateTime,
    pub last_reviewed: OffsetDateTime,
}

pub fn effective_score(grade: Grade, intrinsic_weight: f64) -> f64 {
    f64::from(grade.score()) * intrinsic_weight
}

pub fn update_stability(current_stability: f64, grade: Grade, intrinsic_weight: f64) -> f64 {
    let next = match grade {
        // Forgetting halves stability no matter how important the card is
        Grade::Again => f64::max(MIN_STABILITY, current_stability * AGAIN_PENALTY),
        _ => {
            let growth = 1.0 + effective_score(grade, intrinsic_weight) * GROWTH_RATE;
            current_stability * growth
        }
    };

    bound(next, MIN_STABILITY, MAX_STABILITY)
}

pub fn update_difficulty(current_difficulty: f64, grade: Grade, intrinsic_weight: f64) -> f64 {
    let delta = (effective_score(grade, intrinsic_weight) - EXPECTED_SCORE) * DIFFICULTY_RATE;

    bound(current_difficulty - delta, MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Clamps `value` into `[min, max]`, sending NaN to `min`.
fn bound(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Projects the next review from the stability in hours, shortened for hard
/// topics and lengthened for easy ones.
///
/// # Panics
///
/// Panics if the resulting interval is not finite. Values produced by
/// [`update_stability`] and [`update_difficulty`] never are.
pub fn calculate_next_review(
    stability: f64,
    difficulty: f64,
    now: OffsetDateTime,
) -> OffsetDateTime {
    let modifier = 1.0 + (difficulty - NEUTRAL_DIFFICULTY) * DIFFICULTY_INTERVAL_RATE;
    let interval_hours = stability * modifier;

    now + Duration::seconds_f64(interval_hours * SECONDS_PER_HOUR)
}

/// Applies one review to `topic`.
///
/// Stability and difficulty are updated independently from the topic's
/// current values; the next review is projected from the updated pair.
/// A topic whose stability or difficulty is NaN or infinite is rejected.
pub fn process_review(
    topic: &Topic,
    grade: Grade,
    intrinsic_weight: f64,
    now: OffsetDateTime,
) -> Result<SchedulingResult> {
    if !topic.stability.is_finite() || !topic.difficulty.is_finite() {
        return Err(Error::InvalidTopicState {
            stability: topic.stability,
            difficulty: topic.difficulty,
        });
    }

    let weight = resolve_weight(Some(intrinsic_weight))?;

    let stability = update_stability(topic.stability, grade, weight);
    let difficulty = update_difficulty(topic.difficulty, grade, weight);
    let next_review = calculate_next_review(stability, difficulty, now);

    debug!(
        %grade,
        weight,
        stability.from = topic.stability,
        stability.to = stability,
        difficulty.from = topic.difficulty,
        difficulty.to = difficulty,
        %next_review,
        "processed review"
    );

    Ok(SchedulingResult {
        stability,
        difficulty,
        next_review,
        last_reviewed: now,
    })
}

/// Topics due at `now`, most overdue first. A `limit` of zero means no limit.
pub fn due_topics<'a>(
    topics: &'a [Topic],
    now: OffsetDateTime,
    limit: Option<usize>,
) -> Vec<&'a Topic> {
    let mut due: Vec<_> = topics.iter().filter(|t| t.is_due(now)).collect();

    due.sort_by_key(|t| t.next_review);

    if let Some(limit) = limit.filter(|&limit| limit > 0) {
        due.truncate(limit);
    }

    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-03-01 09:00 UTC);

    fn topic(stability: f64, difficulty: f64) -> Topic {
        Topic {
            stability,
            difficulty,
            next_review: NOW,
            last_reviewed: None,
        }
    }

    #[test]
    fn again_halves_stability() {
        assert_eq!(update_stability(100.0, Grade::Again, 1.0), 50.0);
        assert_eq!(update_stability(100.0, Grade::Again, 2.0), 50.0);
        assert_eq!(update_stability(100.0, Grade::Again, 0.5), 50.0);
    }

    #[test]
    fn again_floors_at_min_stability() {
        assert_eq!(update_stability(1.0, Grade::Again, 1.0), MIN_STABILITY);
    }

    #[test]
    fn grow_stability() {
        // 1 + 2 * 0.15
        assert_relative_eq!(
            update_stability(10.0, Grade::Good, 1.0),
            13.0,
            max_relative = 1e-12
        );
        // 1 + 3 * 2 * 0.15
        assert_relative_eq!(
            update_stability(10.0, Grade::Easy, 2.0),
            19.0,
            max_relative = 1e-12
        );
        // 1 + 1 * 0.5 * 0.15
        assert_relative_eq!(
            update_stability(10.0, Grade::Hard, 0.5),
            10.75,
            max_relative = 1e-12
        );
    }

    #[test]
    fn cap_stability() {
        assert_eq!(update_stability(8000.0, Grade::Easy, 2.0), MAX_STABILITY);
    }

    #[test]
    fn expected_score_keeps_difficulty() {
        assert_eq!(update_difficulty(5.0, Grade::Good, 1.0), 5.0);
    }

    #[test]
    fn easy_lowers_difficulty() {
        assert_relative_eq!(
            update_difficulty(5.0, Grade::Easy, 2.0),
            3.8,
            max_relative = 1e-12
        );
    }

    #[test]
    fn again_raises_difficulty() {
        assert_relative_eq!(
            update_difficulty(5.0, Grade::Again, 1.5),
            5.6,
            max_relative = 1e-12
        );
    }

    #[test]
    fn clamp_difficulty() {
        assert_eq!(update_difficulty(1.2, Grade::Easy, 2.0), MIN_DIFFICULTY);
        assert_eq!(update_difficulty(9.9, Grade::Again, 1.0), MAX_DIFFICULTY);
    }

    #[test]
    fn neutral_difficulty_uses_stability_as_interval() {
        assert_eq!(
            calculate_next_review(24.0, 5.0, NOW),
            NOW + Duration::hours(24)
        );
    }

    #[test]
    fn difficulty_scales_interval() {
        let hard = calculate_next_review(10.0, 10.0, NOW);
        let easy = calculate_next_review(10.0, 1.0, NOW);

        assert_relative_eq!(
            (hard - NOW).as_seconds_f64(),
            16.0 * SECONDS_PER_HOUR,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            (easy - NOW).as_seconds_f64(),
            5.2 * SECONDS_PER_HOUR,
            max_relative = 1e-9
        );
    }

    #[test]
    fn process_good_review() {
        let result = process_review(&topic(24.0, 5.0), Grade::Good, 1.0, NOW).unwrap();

        assert_relative_eq!(result.stability, 31.2, max_relative = 1e-12);
        assert_eq!(result.difficulty, 5.0);
        assert_relative_eq!(
            (result.next_review - NOW).as_seconds_f64(),
            31.2 * SECONDS_PER_HOUR,
            max_relative = 1e-9
        );
        assert_eq!(result.last_reviewed, NOW);
    }

    #[test]
    fn difficulty_updates_from_current_value() {
        let result = process_review(&topic(24.0, 7.0), Grade::Easy, 1.0, NOW).unwrap();

        assert_relative_eq!(result.difficulty, 6.7, max_relative = 1e-12);
        assert_relative_eq!(result.stability, 34.8, max_relative = 1e-12);
    }

    #[test]
    fn process_review_defaults_zero_weight() {
        let zero = process_review(&topic(24.0, 5.0), Grade::Easy, 0.0, NOW).unwrap();
        let one = process_review(&topic(24.0, 5.0), Grade::Easy, 1.0, NOW).unwrap();

        assert_eq!(zero, one);
    }

    #[test]
    fn process_review_rejects_negative_weight() {
        assert_eq!(
            process_review(&topic(24.0, 5.0), Grade::Good, -1.0, NOW),
            Err(Error::InvalidWeight(-1.0))
        );
    }

    #[test]
    fn repeated_good_reviews_grow_stability() {
        let first = topic(24.0, 5.0);
        let second = first.apply(&process_review(&first, Grade::Good, 1.0, NOW).unwrap());
        let third = second
            .apply(&process_review(&second, Grade::Good, 1.0, second.next_review).unwrap());

        assert!(second.stability >= first.stability);
        assert!(third.stability >= second.stability);
        assert_eq!(third.last_reviewed, Some(second.next_review));
    }

    #[test]
    fn new_topic_is_due() {
        let topic = Topic::new(NOW);

        assert_eq!(topic.stability, DEFAULT_STABILITY);
        assert_eq!(topic.difficulty, DEFAULT_DIFFICULTY);
        assert!(topic.is_due(NOW));
        assert!(!topic.is_due(NOW - Duration::seconds(1)));
    }

    #[test]
    fn due_topics_sorted_and_limited() {
        let mut topics = vec![];
        for hours in [-3, 5, -10, 0, -1] {
            let mut t = Topic::new(NOW);
            t.next_review = NOW + Duration::hours(hours);
            topics.push(t);
        }

        let due = due_topics(&topics, NOW, None);
        let offsets: Vec<_> = due
            .iter()
            .map(|t| (t.next_review - NOW).whole_hours())
            .collect();
        assert_eq!(offsets, [-10, -3, -1, 0]);

        let due = due_topics(&topics, NOW, Some(2));
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].next_review, NOW - Duration::hours(10));
    }

    #[test]
    fn zero_limit_returns_every_due_topic() {
        let topics = [Topic::new(NOW), Topic::new(NOW - Duration::hours(1))];

        assert_eq!(due_topics(&topics, NOW, Some(0)).len(), 2);
    }

    #[test]
    fn nan_state_lands_on_lower_bound() {
        assert_eq!(update_stability(f64::NAN, Grade::Good, 1.0), MIN_STABILITY);
        assert_eq!(update_stability(f64::NAN, Grade::Again, 1.0), MIN_STABILITY);
        assert_eq!(update_difficulty(f64::NAN, Grade::Good, 1.0), MIN_DIFFICULTY);
        assert_eq!(update_stability(24.0, Grade::Good, f64::NAN), MIN_STABILITY);
    }

    #[test]
    fn infinite_state_lands_on_bounds() {
        assert_eq!(update_stability(f64::INFINITY, Grade::Good, 1.0), MAX_STABILITY);
        assert_eq!(update_difficulty(f64::NEG_INFINITY, Grade::Hard, 1.0), MIN_DIFFICULTY);
    }

    #[test]
    fn process_review_rejects_non_finite_topic() {
        let result = process_review(&topic(f64::NAN, 5.0), Grade::Good, 1.0, NOW);
        assert!(matches!(result, Err(Error::InvalidTopicState { .. })));

        let result = process_review(&topic(24.0, f64::INFINITY), Grade::Again, 1.0, NOW);
        assert!(matches!(result, Err(Error::InvalidTopicState { .. })));
    }

    fn grade() -> impl Strategy<Value = Grade> {
        prop::sample::select(Grade::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn stability_stays_in_bounds(
            current in prop::num::f64::ANY,
            grade in grade(),
            weight in prop::num::f64::ANY,
        ) {
            let next = update_stability(current, grade, weight);
            prop_assert!((MIN_STABILITY..=MAX_STABILITY).contains(&next));
        }

        #[test]
        fn difficulty_stays_in_bounds(
            current in prop::num::f64::ANY,
            grade in grade(),
            weight in prop::num::f64::ANY,
        ) {
            let next = update_difficulty(current, grade, weight);
            prop_assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&next));
        }

        #[test]
        fn next_review_after_now(
            stability in MIN_STABILITY..=MAX_STABILITY,
            difficulty in MIN_DIFFICULTY..=MAX_DIFFICULTY,
            grade in grade(),
            weight in 0.5..=2.0f64,
        ) {
            let result =
                process_review(&topic(stability, difficulty), grade, weight, NOW).unwrap();
            prop_assert!(result.next_review > NOW);
        }
    }
}
