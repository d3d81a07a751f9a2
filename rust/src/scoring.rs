//! Sub-score functions for the four priority factors.
//!
//! Each function maps one raw task attribute onto [0, 100]. They are pure: the
//! reference date is an argument, never read from the wall clock here.

use chrono::NaiveDate;

use crate::calendar::count_working_days;

/// Upper bound of every sub-score.
pub const MAX_SUB_SCORE: f64 = 100.0;

/// Score how soon a task is due.
///
/// - Overdue: `min(100, 80 + days_overdue^1.5 * 2)`, super-linear in lateness
/// - Due today: 100
/// - Otherwise piecewise-linear in working days left (weekends and holidays
///   excluded), from 95 down to 0
pub fn urgency_score(due_date: NaiveDate, today: NaiveDate) -> f64 {
    let calendar_days = (due_date - today).num_days();

    if calendar_days < 0 {
        let days_overdue = calendar_days.unsigned_abs() as f64;
        return (80.0 + days_overdue.powf(1.5) * 2.0).min(MAX_SUB_SCORE);
    }
    if calendar_days == 0 {
        return MAX_SUB_SCORE;
    }

    let working_days = f64::from(count_working_days(today, due_date));
    if working_days <= 0.0 {
        95.0
    } else if working_days <= 3.0 {
        90.0 - working_days * 7.0
    } else if working_days <= 7.0 {
        70.0 - (working_days - 3.0) * 5.0
    } else if working_days <= 14.0 {
        50.0 - (working_days - 7.0) * 3.0
    } else if working_days <= 30.0 {
        30.0 - (working_days - 14.0) * 1.5
    } else {
        (10.0 - (working_days - 30.0) * 0.2).max(0.0)
    }
}

/// Score the user's importance rating. Ratings outside 1..=10 are clamped.
pub fn importance_score(importance: i64) -> f64 {
    let clamped = importance.clamp(1, 10) as f64;
    (clamped / 10.0) * MAX_SUB_SCORE
}

/// Score the effort estimate; short tasks ("quick wins") score high.
pub fn effort_score(estimated_hours: f64) -> f64 {
    let h = estimated_hours;
    if h < 1.0 {
        MAX_SUB_SCORE
    } else if h <= 2.0 {
        90.0 - (h - 1.0) * 10.0
    } else if h <= 4.0 {
        70.0 - (h - 2.0) * 10.0
    } else if h <= 8.0 {
        50.0 - (h - 4.0) * 5.0
    } else if h <= 16.0 {
        30.0 - (h - 8.0) * 2.5
    } else {
        (10.0 - (h - 16.0) * 0.5).max(0.0)
    }
}

/// Score how many tasks are blocked by this one.
///
/// Steps up quickly for the first few dependents, then gains 4 points per
/// dependent from 5 on, capped at 100.
pub fn dependency_score(dependent_count: usize) -> f64 {
    match dependent_count {
        0 => 0.0,
        1 => 30.0,
        2 => 50.0,
        3 => 65.0,
        4 => 75.0,
        n => (80.0 + (n - 5) as f64 * 4.0).min(MAX_SUB_SCORE),
    }
}

/// Round to two decimal places, as reported in score breakdowns.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
