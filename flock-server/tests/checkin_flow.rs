//! End-to-end check-in flow tests against a real temporary database.

use std::sync::Arc;

use flock_server::checkin::{
    AttendanceRecorder, CheckInError, CodeAllocator, ConnectivityState, OfflineQueue,
};
use flock_server::db::DbService;
use flock_server::db::repository::{RepoError, attendance, member, meeting};
use shared::models::{CheckInMethod, MeetingCreate, MemberCreate, NewAttendanceLog};
use sqlx::SqlitePool;
use tempfile::TempDir;

struct TestStation {
    pool: SqlitePool,
    queue: Arc<OfflineQueue>,
    connectivity: ConnectivityState,
    // Held so the directory outlives the test
    _dir: TempDir,
}

impl TestStation {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("flock.db");
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("database opens");
        let queue = Arc::new(
            OfflineQueue::open(dir.path().join("pending.redb")).expect("queue opens"),
        );
        Self {
            pool: db.pool,
            queue,
            connectivity: ConnectivityState::new(true),
            _dir: dir,
        }
    }

    fn recorder(&self) -> AttendanceRecorder {
        AttendanceRecorder::new(
            self.pool.clone(),
            self.queue.clone(),
            self.connectivity.clone(),
        )
    }

    async fn seed_member(&self, name: &str, code: &str) -> i64 {
        let created = member::create(
            &self.pool,
            MemberCreate {
                full_name: name.to_string(),
                phone_primary: "01234567890".to_string(),
                phone_secondary: None,
                address: "Cairo".to_string(),
                class_stage: "university".to_string(),
                university_year: Some(2),
                confessor_name: "Fr. Yousef".to_string(),
                photo_url: None,
                notes: None,
            },
            code,
        )
        .await
        .expect("member created");
        created.id
    }

    /// Meeting that started `minutes_ago` minutes before now
    async fn seed_meeting(&self, minutes_ago: i64) -> i64 {
        let now = shared::util::now_millis();
        // Shift 1s further back so the check-in lands past the full minute
        let start = now - minutes_ago * 60_000 - 1_000;
        let created = meeting::create(
            &self.pool,
            MeetingCreate {
                title: "Weekly Friday meeting".to_string(),
                description: None,
                location: Some("Main hall".to_string()),
                kind: "regular".to_string(),
                date: start - 19 * 3600 * 1000,
                start_time: start,
                end_time: start + 2 * 3600 * 1000,
            },
        )
        .await
        .expect("meeting created");
        created.id
    }
}

// ── Code allocation ─────────────────────────────────────────────────

#[tokio::test]
async fn allocator_starts_at_1000_on_an_empty_station() {
    let station = TestStation::new().await;
    let allocator = CodeAllocator::new(station.pool.clone());

    assert_eq!(allocator.next_code().await.expect("allocates"), "1000");
    assert_eq!(allocator.next_code().await.expect("allocates"), "1001");
}

#[tokio::test]
async fn allocator_continues_after_the_highest_imported_code() {
    let station = TestStation::new().await;
    station.seed_member("Imported Member", "1999").await;

    let allocator = CodeAllocator::new(station.pool.clone());
    allocator.sync_floor().await.expect("floor syncs");

    assert_eq!(allocator.next_code().await.expect("allocates"), "2000");
}

#[tokio::test]
async fn allocator_rejects_past_9999() {
    let station = TestStation::new().await;
    sqlx::query("UPDATE code_counter SET value = 9998 WHERE id = 0")
        .execute(&station.pool)
        .await
        .expect("counter primed");

    let allocator = CodeAllocator::new(station.pool.clone());
    assert_eq!(allocator.next_code().await.expect("allocates"), "9999");
    assert!(matches!(
        allocator.next_code().await,
        Err(CheckInError::CodeRangeExhausted)
    ));
    // Still exhausted on retry; the counter never wraps
    assert!(matches!(
        allocator.next_code().await,
        Err(CheckInError::CodeRangeExhausted)
    ));
}

#[tokio::test]
async fn backfill_assigns_codes_to_codeless_members() {
    let station = TestStation::new().await;
    station.seed_member("Has Code", "1500").await;

    // Imported row without a code
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO member (id, full_name, phone_primary, address, class_stage, confessor_name, is_active, created_at, updated_at) VALUES (?1, 'No Code', '0100', 'Giza', 'secondary', 'Fr. Marcos', 1, ?2, ?2)",
    )
    .bind(shared::util::snowflake_id())
    .bind(now)
    .execute(&station.pool)
    .await
    .expect("raw insert");

    let allocator = CodeAllocator::new(station.pool.clone());
    let assigned = allocator.backfill_missing().await.expect("backfill runs");
    assert_eq!(assigned, 1);

    let fixed = member::find_by_code(&station.pool, "1501")
        .await
        .expect("lookup works")
        .expect("member got the next code");
    assert_eq!(fixed.full_name, "No Code");
}

// ── Recording ───────────────────────────────────────────────────────

#[tokio::test]
async fn check_in_records_lateness_in_whole_minutes() {
    let station = TestStation::new().await;
    station.seed_member("Mina George", "1042").await;
    let meeting_id = station.seed_meeting(15).await;

    let outcome = station
        .recorder()
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Qr, "operator", None)
        .await
        .expect("check-in succeeds");

    assert_eq!(outcome.lateness_minutes, 15);
    assert!(!outcome.queued);
    let log = outcome.log.expect("persisted log");
    assert_eq!(log.method, "qr");
    assert_eq!(log.lateness_minutes, 15);
}

#[tokio::test]
async fn early_arrival_has_zero_lateness() {
    let station = TestStation::new().await;
    let member_id = station.seed_member("Early Bird", "2042").await;
    // Meeting starts in 10 minutes
    let meeting_id = station.seed_meeting(-10).await;

    let outcome = station
        .recorder()
        .record_member(member_id, Some(meeting_id), "operator", None)
        .await
        .expect("check-in succeeds");

    assert_eq!(outcome.lateness_minutes, 0);
}

#[tokio::test]
async fn second_check_in_is_rejected() {
    let station = TestStation::new().await;
    station.seed_member("Mina George", "1042").await;
    let meeting_id = station.seed_meeting(0).await;

    let recorder = station.recorder();
    recorder
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Manual, "operator", None)
        .await
        .expect("first check-in succeeds");

    let err = recorder
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Qr, "operator", None)
        .await
        .expect_err("duplicate is rejected");
    assert!(matches!(err, CheckInError::AlreadyCheckedIn { .. }));
}

#[tokio::test]
async fn store_constraint_catches_what_the_precheck_missed() {
    let station = TestStation::new().await;
    let member_id = station.seed_member("Mina George", "1042").await;
    let meeting_id = station.seed_meeting(0).await;

    let log = NewAttendanceLog {
        member_id,
        meeting_id,
        check_in_time: shared::util::now_millis(),
        method: CheckInMethod::Qr,
        lateness_minutes: 0,
        recorded_by: "operator".to_string(),
        note: None,
    };

    attendance::insert(&station.pool, &log)
        .await
        .expect("first insert lands");
    let err = attendance::insert(&station.pool, &log)
        .await
        .expect_err("second insert violates the unique index");
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn bad_inputs_fail_with_specific_errors() {
    let station = TestStation::new().await;
    station.seed_member("Mina George", "1042").await;
    let meeting_id = station.seed_meeting(0).await;
    let recorder = station.recorder();

    let err = recorder
        .record_by_code("12", Some(meeting_id), CheckInMethod::Manual, "op", None)
        .await
        .expect_err("two digits are not a code");
    assert!(matches!(err, CheckInError::InvalidCodeFormat(_)));

    let err = recorder
        .record_by_code("9876", Some(meeting_id), CheckInMethod::Manual, "op", None)
        .await
        .expect_err("nobody holds 9876");
    assert!(matches!(err, CheckInError::MemberNotFound(_)));

    let err = recorder
        .record_by_code("1042", None, CheckInMethod::Manual, "op", None)
        .await
        .expect_err("a meeting must be selected");
    assert!(matches!(err, CheckInError::MeetingNotSelected));

    let err = recorder
        .record_by_code("1042", Some(404), CheckInMethod::Manual, "op", None)
        .await
        .expect_err("unknown meeting");
    assert!(matches!(err, CheckInError::MeetingNotFound(404)));
}

// ── Offline queue ───────────────────────────────────────────────────

#[tokio::test]
async fn offline_check_in_queues_then_drains_on_reconnect() {
    let station = TestStation::new().await;
    station.seed_member("Mina George", "1042").await;
    // Scanned at 19:07 for a meeting that started at 19:00
    let meeting_id = station.seed_meeting(7).await;

    station.connectivity.set_online(false);
    let outcome = station
        .recorder()
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Qr, "operator", None)
        .await
        .expect("offline check-in is acknowledged");

    assert!(outcome.queued);
    assert!(outcome.log.is_none());
    assert_eq!(outcome.lateness_minutes, 7);
    assert_eq!(station.queue.pending_count().expect("count"), 1);
    assert!(
        attendance::find_by_meeting(&station.pool, meeting_id)
            .await
            .expect("list works")
            .is_empty()
    );

    // Reconnect and drain
    station.connectivity.set_online(true);
    let report = station
        .queue
        .drain(&station.pool)
        .await
        .expect("drain runs");
    assert_eq!(report.synced, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(station.queue.pending_count().expect("count"), 0);

    let logs = attendance::find_by_meeting(&station.pool, meeting_id)
        .await
        .expect("list works");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].lateness_minutes, 7);
    assert_eq!(logs[0].method, "qr");
}

#[tokio::test]
async fn drain_drops_records_that_became_duplicates() {
    let station = TestStation::new().await;
    station.seed_member("Mina George", "1042").await;
    let meeting_id = station.seed_meeting(0).await;
    let recorder = station.recorder();

    // Queued while offline...
    station.connectivity.set_online(false);
    recorder
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Scan, "op", None)
        .await
        .expect("queued");

    // ...then checked in online before the drain
    station.connectivity.set_online(true);
    recorder
        .record_by_code("1042", Some(meeting_id), CheckInMethod::Manual, "op", None)
        .await
        .expect("online check-in lands");

    let report = station.queue.drain(&station.pool).await.expect("drain runs");
    assert_eq!(report.synced, 0);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(station.queue.pending_count().expect("count"), 0);
}

#[tokio::test]
async fn queue_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pending.redb");

    let log = NewAttendanceLog {
        member_id: 7,
        meeting_id: 9,
        check_in_time: shared::util::now_millis(),
        method: CheckInMethod::Scan,
        lateness_minutes: 3,
        recorded_by: "op".to_string(),
        note: None,
    };

    {
        let queue = OfflineQueue::open(&path).expect("queue opens");
        queue.enqueue(&log).expect("enqueue works");
        assert_eq!(queue.pending_count().expect("count"), 1);
    }

    let reopened = OfflineQueue::open(&path).expect("queue reopens");
    assert_eq!(reopened.pending_count().expect("count"), 1);
    let pending = reopened.pending().expect("pending listed");
    assert_eq!(pending[0].1.member_id, 7);
    assert_eq!(pending[0].1.lateness_minutes, 3);
}
