//! Streak aggregate and its transition function.
//!
//! A [`Streak`] row is derived state: it summarises the sequence of ledger
//! entries for one `(task, user)` pair as consecutive-day counters. The
//! transition in [`apply_completion`] is applied exactly once per newly
//! recorded completion, in the order completions are recorded (which is not
//! necessarily calendar order).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived consecutive-day counters for one `(task, user)` pair.
///
/// ## Invariants
/// - `current_streak >= 0` and `longest_streak >= current_streak` after any
///   transition.
/// - `last_completed_date` is the date of the most recently *applied*
///   completion. When completions arrive out of order it can move backwards;
///   see [`apply_completion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    /// The task this streak belongs to.
    pub task_id: Uuid,
    /// The user this streak belongs to.
    pub user_id: Uuid,
    /// Count of consecutive calendar days ending at `last_completed_date`.
    pub current_streak: i32,
    /// Historical maximum of `current_streak` for this pair.
    pub longest_streak: i32,
    /// Date of the most recently applied completion, if any.
    pub last_completed_date: Option<NaiveDate>,
}

impl Streak {
    /// The transient zero-value row used before any completion exists.
    ///
    /// Reads return this default without persisting anything; the first
    /// recorded completion creates the durable row.
    pub const fn zero(task_id: Uuid, user_id: Uuid) -> Self {
        Self {
            task_id,
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
        }
    }
}

/// How a completion dated before `last_completed_date` is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackdatingPolicy {
    /// Keep the inherited behaviour: leave both counters untouched but still
    /// advance `last_completed_date` to the backdated date. This can leave
    /// `last_completed_date` earlier than a previously applied date.
    #[default]
    Preserve,
    /// Reject the completion outright; the ledger insert rolls back.
    Reject,
}

/// A completion rejected under [`BackdatingPolicy::Reject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("completion for {attempted} predates last applied completion on {last_completed}")]
pub struct BackdatedCompletion {
    /// The most recently applied completion date.
    pub last_completed: NaiveDate,
    /// The rejected, earlier completion date.
    pub attempted: NaiveDate,
}

/// Apply one newly recorded completion to a streak.
///
/// The caller guarantees `date` has no existing ledger entry for this pair;
/// duplicate-day completions are absorbed by the ledger and never reach this
/// function, so the day gap is never zero here.
///
/// Transition, with `gap = date - last_completed_date` in whole days:
/// - no previous date: `current = 1`, `longest = max(longest, 1)`;
/// - `gap == 1`: consecutive day, increment `current` and raise `longest`;
/// - `gap > 1`: streak broken, reset `current` to 1 (`longest` keeps its
///   maximum);
/// - `gap < 0`: a backdated completion; under
///   [`BackdatingPolicy::Preserve`] the counters stay as they are, under
///   [`BackdatingPolicy::Reject`] the completion is refused.
///
/// In every accepted case `last_completed_date` becomes `date`, including the
/// backdated one.
pub fn apply_completion(
    streak: &Streak,
    date: NaiveDate,
    policy: BackdatingPolicy,
) -> Result<Streak, BackdatedCompletion> {
    let mut next = streak.clone();

    match streak.last_completed_date {
        None => {
            next.current_streak = 1;
            next.longest_streak = streak.longest_streak.max(1);
        }
        Some(last) => {
            let gap = date.signed_duration_since(last).num_days();
            if gap == 1 {
                next.current_streak = streak.current_streak + 1;
                next.longest_streak = streak.longest_streak.max(next.current_streak);
            } else if gap > 1 {
                next.current_streak = 1;
            } else if policy == BackdatingPolicy::Reject {
                return Err(BackdatedCompletion {
                    last_completed: last,
                    attempted: date,
                });
            }
            // gap < 0 under Preserve: counters untouched.
        }
    }

    next.last_completed_date = Some(date);
    Ok(next)
}
