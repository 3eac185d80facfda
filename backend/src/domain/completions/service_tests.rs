//! Tests for the completion service.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::CompletionService;
use crate::domain::ports::{
    CompletionCommand, CompletionLedgerError, CompletionQuery, FixtureCompletionLedger,
    FixtureStreakStore, FixtureTaskGate, MockCompletionLedger, MockStreakStore, MockTaskGate,
    RecordCompletionRequest, RecordOutcome, StreakStoreError,
};
use crate::domain::{ErrorCode, Streak, TaskCompletion};

/// Clock pinned to 2024-06-15T08:00:00Z for deterministic date defaulting.
struct FixedClock;

const FIXED_EPOCH_SECS: i64 = 1_718_438_400;

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(FIXED_EPOCH_SECS, 0)
            .single()
            .expect("fixed timestamp is valid")
    }
}

fn fixed_today() -> NaiveDate {
    FixedClock.utc().date_naive()
}

fn day(text: &str) -> NaiveDate {
    text.parse().expect("valid test date")
}

fn existing_task_gate() -> MockTaskGate {
    let mut gate = MockTaskGate::new();
    gate.expect_task_exists().returning(|_| Ok(true));
    gate
}

fn completion_on(task_id: Uuid, user_id: Uuid, date: NaiveDate) -> TaskCompletion {
    TaskCompletion {
        id: Uuid::new_v4(),
        task_id,
        user_id,
        date,
        completed_at: FixedClock.utc(),
        notes: None,
    }
}

fn make_service(
    ledger: MockCompletionLedger,
    streaks: MockStreakStore,
    gate: MockTaskGate,
) -> CompletionService<MockCompletionLedger, MockStreakStore, MockTaskGate> {
    CompletionService::new(
        Arc::new(ledger),
        Arc::new(streaks),
        Arc::new(gate),
        Arc::new(FixedClock),
    )
}

fn request(task_id: Uuid, user_id: Uuid, date: Option<NaiveDate>) -> RecordCompletionRequest {
    RecordCompletionRequest {
        task_id,
        user_id,
        date,
        notes: None,
    }
}

#[tokio::test]
async fn record_completion_rejects_missing_task() {
    let mut gate = MockTaskGate::new();
    gate.expect_task_exists().times(1).returning(|_| Ok(false));
    let mut ledger = MockCompletionLedger::new();
    ledger.expect_find_completion().times(0);
    ledger.expect_record().times(0);

    let service = make_service(ledger, MockStreakStore::new(), gate);
    let error = service
        .record_completion(request(Uuid::new_v4(), Uuid::new_v4(), None))
        .await
        .expect_err("missing task must be rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn record_completion_defaults_date_to_current_day() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let today = fixed_today();

    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_find_completion()
        .withf(move |_, _, date| *date == today)
        .times(1)
        .returning(|_, _, _| Ok(None));
    ledger.expect_record().times(1).returning(|entry| {
        let streak = Streak {
            task_id: entry.task_id,
            user_id: entry.user_id,
            current_streak: 1,
            longest_streak: 1,
            last_completed_date: Some(entry.date),
        };
        Ok(RecordOutcome::Recorded {
            completion: entry.to_completion(),
            streak,
        })
    });

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let completion = service
        .record_completion(request(task_id, user_id, None))
        .await
        .expect("completion should be recorded");

    assert_eq!(completion.date, today);
    assert_eq!(completion.task_id, task_id);
    assert_eq!(completion.completed_at, FixedClock.utc());
}

#[tokio::test]
async fn duplicate_same_day_completion_returns_existing_without_recording() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let date = day("2024-01-02");
    let existing = completion_on(task_id, user_id, date);
    let returned = existing.clone();

    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_find_completion()
        .times(1)
        .returning(move |_, _, _| Ok(Some(returned.clone())));
    ledger.expect_record().times(0);

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let completion = service
        .record_completion(request(task_id, user_id, Some(date)))
        .await
        .expect("duplicate must be absorbed");

    assert_eq!(completion, existing);
}

#[tokio::test]
async fn recording_twice_yields_identical_responses() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let date = day("2024-01-01");

    let mut ledger = MockCompletionLedger::new();
    // First call: no entry yet, record succeeds.
    ledger
        .expect_find_completion()
        .times(1)
        .returning(|_, _, _| Ok(None));
    let recorded: Arc<std::sync::Mutex<Option<TaskCompletion>>> =
        Arc::new(std::sync::Mutex::new(None));
    let record_slot = Arc::clone(&recorded);
    ledger.expect_record().times(1).returning(move |entry| {
        let completion = entry.to_completion();
        *record_slot.lock().expect("slot lock") = Some(completion.clone());
        let streak = Streak {
            task_id: entry.task_id,
            user_id: entry.user_id,
            current_streak: 1,
            longest_streak: 1,
            last_completed_date: Some(entry.date),
        };
        Ok(RecordOutcome::Recorded { completion, streak })
    });
    // Second call: the pre-check finds the stored entry.
    let replay_slot = Arc::clone(&recorded);
    ledger
        .expect_find_completion()
        .times(1)
        .returning(move |_, _, _| Ok(replay_slot.lock().expect("slot lock").clone()));

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let first = service
        .record_completion(request(task_id, user_id, Some(date)))
        .await
        .expect("first call succeeds");
    let second = service
        .record_completion(request(task_id, user_id, Some(date)))
        .await
        .expect("replay succeeds");

    assert_eq!(first, second);
}

#[tokio::test]
async fn lost_insert_race_returns_winning_entry() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let date = day("2024-01-03");
    let winner = completion_on(task_id, user_id, date);
    let returned = winner.clone();

    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_find_completion()
        .times(1)
        .returning(|_, _, _| Ok(None));
    ledger.expect_record().times(1).returning(move |_| {
        Ok(RecordOutcome::Duplicate {
            existing: returned.clone(),
        })
    });

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let completion = service
        .record_completion(request(task_id, user_id, Some(date)))
        .await
        .expect("race loser still succeeds");

    assert_eq!(completion, winner);
}

#[tokio::test]
async fn ledger_connection_failure_maps_to_service_unavailable() {
    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_find_completion()
        .times(1)
        .returning(|_, _, _| Err(CompletionLedgerError::connection("pool exhausted")));

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let error = service
        .record_completion(request(Uuid::new_v4(), Uuid::new_v4(), None))
        .await
        .expect_err("connection failure propagates");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn backdated_rejection_maps_to_conflict() {
    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_find_completion()
        .times(1)
        .returning(|_, _, _| Ok(None));
    ledger.expect_record().times(1).returning(|_| {
        Err(CompletionLedgerError::backdated(
            day("2024-02-10"),
            day("2024-02-05"),
        ))
    });

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let error = service
        .record_completion(request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(day("2024-02-05")),
        ))
        .await
        .expect_err("strict mode rejects backdating");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let details = error.details().expect("conflict carries details");
    assert_eq!(details["code"], "backdated_completion");
}

#[tokio::test]
async fn streak_query_returns_stored_row() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let stored = Streak {
        task_id,
        user_id,
        current_streak: 2,
        longest_streak: 5,
        last_completed_date: Some(day("2024-01-02")),
    };
    let returned = stored.clone();

    let mut streaks = MockStreakStore::new();
    streaks
        .expect_find_streak()
        .times(1)
        .returning(move |_, _| Ok(Some(returned.clone())));

    let service = make_service(MockCompletionLedger::new(), streaks, existing_task_gate());
    let streak = service
        .streak_for_user(task_id, user_id)
        .await
        .expect("streak query succeeds");

    assert_eq!(streak, stored);
}

#[tokio::test]
async fn streak_query_defaults_to_zero_row_without_persisting() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut streaks = MockStreakStore::new();
    streaks
        .expect_find_streak()
        .times(1)
        .returning(|_, _| Ok(None));

    let service = make_service(MockCompletionLedger::new(), streaks, existing_task_gate());
    let streak = service
        .streak_for_user(task_id, user_id)
        .await
        .expect("streak query succeeds");

    assert_eq!(streak, Streak::zero(task_id, user_id));
}

#[tokio::test]
async fn streak_query_rejects_missing_task() {
    let mut gate = MockTaskGate::new();
    gate.expect_task_exists().times(1).returning(|_| Ok(false));
    let mut streaks = MockStreakStore::new();
    streaks.expect_find_streak().times(0);

    let service = make_service(MockCompletionLedger::new(), streaks, gate);
    let error = service
        .streak_for_user(Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect_err("missing task must be rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn streak_store_failure_maps_to_internal_error() {
    let mut streaks = MockStreakStore::new();
    streaks
        .expect_find_streak()
        .times(1)
        .returning(|_, _| Err(StreakStoreError::query("bad plan")));

    let service = make_service(MockCompletionLedger::new(), streaks, existing_task_gate());
    let error = service
        .streak_for_user(Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect_err("store failure propagates");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn completion_list_is_returned_for_existing_task() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let entries = vec![
        completion_on(task_id, user_id, day("2024-01-01")),
        completion_on(task_id, user_id, day("2024-01-02")),
    ];
    let returned = entries.clone();

    let mut ledger = MockCompletionLedger::new();
    ledger
        .expect_completions_for_task()
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let service = make_service(ledger, MockStreakStore::new(), existing_task_gate());
    let listed = service
        .completions_for_task(task_id)
        .await
        .expect("list succeeds");

    assert_eq!(listed, entries);
}

#[tokio::test]
async fn fixture_ports_support_database_less_flows() {
    let service = CompletionService::new(
        Arc::new(FixtureCompletionLedger),
        Arc::new(FixtureStreakStore),
        Arc::new(FixtureTaskGate),
        Arc::new(FixedClock),
    );

    let completion = service
        .record_completion(request(Uuid::new_v4(), Uuid::new_v4(), None))
        .await
        .expect("fixture record succeeds");
    assert_eq!(completion.date, fixed_today());

    let streak = service
        .streak_for_user(completion.task_id, completion.user_id)
        .await
        .expect("fixture streak query succeeds");
    assert_eq!(streak.current_streak, 0);
}
