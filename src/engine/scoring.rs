use crate::config::{ApplyConfig, HintCharge, RushConfig};

/// Add `delta` to `score`, never dropping below zero.
pub fn apply_delta(score: i64, delta: i64) -> i64 {
    score.saturating_add(delta).max(0)
}

/// Subtract a penalty magnitude from `score`, never dropping below zero.
pub fn apply_penalty(score: i64, penalty: i64) -> i64 {
    apply_delta(score, penalty.saturating_neg())
}

/// Multiplier for a post-increment streak. The first correct answer of a run
/// earns the base award; each further one adds `base` linearly.
pub fn streak_multiplier(streak: u32, base: f64) -> f64 {
    1.0 + streak.saturating_sub(1) as f64 * base
}

/// Points for a correct Rush answer: streak-scaled base plus a time bonus.
pub fn rush_correct_points(rules: &RushConfig, streak: u32, time_remaining: u32) -> i64 {
    let streak_award =
        (rules.correct_points as f64 * streak_multiplier(streak, rules.streak_multiplier_base)).floor();
    let time_bonus = (time_remaining as f64 * rules.time_bonus_factor).floor();
    streak_award as i64 + time_bonus as i64
}

/// Time left after a wrong Rush answer.
pub fn rush_time_after_penalty(rules: &RushConfig, time_remaining: u32) -> u32 {
    time_remaining.saturating_sub(rules.time_penalty)
}

pub fn is_streak_signal(rules: &RushConfig, streak: u32) -> bool {
    streak >= rules.streak_signal_threshold
}

/// Points for a correct Apply answer.
///
/// Under [`HintCharge::OnRequest`] the hint was already paid for, so the award
/// is the full `correct_points`. Under [`HintCharge::OnCorrect`] a used hint is
/// taken out of the award here; the caller floors the resulting score.
pub fn apply_correct_points(rules: &ApplyConfig, hint_used: bool) -> i64 {
    match rules.hint_charge {
        HintCharge::OnCorrect if hint_used => rules.correct_points - rules.hint_penalty,
        _ => rules.correct_points,
    }
}

/// What revealing a hint costs at request time.
pub fn hint_request_cost(rules: &ApplyConfig) -> i64 {
    match rules.hint_charge {
        HintCharge::OnRequest => rules.hint_penalty,
        HintCharge::OnCorrect => 0,
    }
}

/// Rounded share of correct answers, in percent. Zero rounds yields 0.
pub fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}
