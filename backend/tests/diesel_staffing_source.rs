//! Integration tests for `DieselStaffingSource` against embedded PostgreSQL.
//!
//! Each test migrates a fresh database, seeds two companies through a plain
//! `postgres` client, and reads them back through the Diesel adapter.
//! Tests use `pg-embedded-setup-unpriv` for the cluster and skip when
//! `SKIP_TEST_CLUSTER` is set and the cluster cannot start.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::error::SqlState;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use shiftboard::domain::ports::{CoverageQuery, CoverageRequest, StaffingSource};
use shiftboard::domain::{
    AvailabilityStatus, CompanyId, CoverageService, CoverageStatus, DateRange, DayBoundary,
    DayKey, OfficeId, ShiftId, ShiftStatus, TimestampWindow, UserId,
};
use shiftboard::outbound::persistence::{DbPool, DieselStaffingSource, PoolConfig, run_migrations};
use tokio::runtime::Runtime;
use uuid::Uuid;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{create_test_database, format_postgres_error, handle_cluster_setup_failure};

/// Identifiers of the seeded rows.
struct Seeded {
    company_a: CompanyId,
    company_b: CompanyId,
    office_a1: OfficeId,
    office_a2: OfficeId,
    office_b1: OfficeId,
    user_a1: UserId,
    user_a2: UserId,
    /// Company A shifts inside 2024-06-10..=2024-06-11 (UTC), in read order.
    shifts_in_window: Vec<ShiftId>,
}

struct TestContext {
    runtime: Runtime,
    pool: DbPool,
    database_url: String,
    seeded: Seeded,
    _cluster: TestCluster,
}

impl TestContext {
    fn source(&self, boundary: DayBoundary) -> DieselStaffingSource {
        DieselStaffingSource::new(self.pool.clone(), boundary)
    }

    fn client(&self) -> Client {
        Client::connect(&self.database_url, NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)))
    }
}

fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, minute, second)
        .single()
        .expect("valid timestamp")
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

fn day_key(day: u32) -> DayKey {
    DayKey::new(june(day))
}

fn window(boundary: DayBoundary, first: u32, last: u32) -> TimestampWindow {
    let range = DateRange::new(day_key(first), day_key(last)).expect("valid range");
    boundary.window(&range)
}

fn insert_office(client: &mut Client, company: Uuid, name: &str) -> Result<Uuid, String> {
    let id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO offices (id, company_id, name) VALUES ($1, $2, $3)",
            &[&id, &company, &name],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(id)
}

fn insert_user(
    client: &mut Client,
    company: Uuid,
    home_office: Option<Uuid>,
    name: &str,
) -> Result<Uuid, String> {
    let id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO users (id, company_id, home_office_id, display_name) \
             VALUES ($1, $2, $3, $4)",
            &[&id, &company, &home_office, &name],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(id)
}

fn insert_requirement(
    client: &mut Client,
    office: Uuid,
    work_date: NaiveDate,
    required_count: i32,
) -> Result<(), postgres::Error> {
    client
        .execute(
            "INSERT INTO staffing_requirements (id, office_id, work_date, required_count) \
             VALUES ($1, $2, $3, $4)",
            &[&Uuid::new_v4(), &office, &work_date, &required_count],
        )
        .map(|_| ())
}

fn insert_shift(
    client: &mut Client,
    user: Uuid,
    office: Uuid,
    work_date: DateTime<Utc>,
    status: &str,
) -> Result<Uuid, String> {
    let id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO shifts (id, user_id, office_id, work_date, status) \
             VALUES ($1, $2, $3, $4, $5)",
            &[&id, &user, &office, &work_date, &status],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(id)
}

fn insert_availability(
    client: &mut Client,
    user: Uuid,
    work_date: DateTime<Utc>,
    status: &str,
) -> Result<(), String> {
    client
        .execute(
            "INSERT INTO availability_requests (id, user_id, work_date, status) \
             VALUES ($1, $2, $3, $4)",
            &[&Uuid::new_v4(), &user, &work_date, &status],
        )
        .map(|_| ())
        .map_err(|err| format_postgres_error(&err))
}

/// Company A has offices A1 and A2, user A1 based at A1 and user A2 with no
/// home office. Company B has office B1 and one user based there. Rows sit on
/// and just outside the edges of 2024-06-10..=2024-06-11 in UTC.
fn seed(url: &str) -> Result<Seeded, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let (company_a, company_b) = (Uuid::new_v4(), Uuid::new_v4());

    let office_a1 = insert_office(&mut client, company_a, "A1")?;
    let office_a2 = insert_office(&mut client, company_a, "A2")?;
    let office_b1 = insert_office(&mut client, company_b, "B1")?;
    let user_a1 = insert_user(&mut client, company_a, Some(office_a1), "User A1")?;
    let user_a2 = insert_user(&mut client, company_a, None, "User A2")?;
    let user_b1 = insert_user(&mut client, company_b, Some(office_b1), "User B1")?;

    for (office, day, count) in [
        (office_a1, 10, 3),
        (office_a2, 11, 1),
        (office_a1, 12, 2),
        (office_a1, 9, 2),
        (office_b1, 10, 5),
    ] {
        insert_requirement(&mut client, office, june(day), count)
            .map_err(|err| format_postgres_error(&err))?;
    }

    let first_edge = insert_shift(&mut client, user_a1, office_a1, at(10, 0, 0, 0), "CONFIRMED")?;
    let cancelled = insert_shift(&mut client, user_a2, office_a1, at(10, 10, 0, 0), "CANCELLED")?;
    let last_edge = insert_shift(&mut client, user_a1, office_a2, at(11, 23, 59, 59), "SCHEDULED")?;
    insert_shift(&mut client, user_a1, office_a1, at(9, 23, 59, 59), "CONFIRMED")?;
    insert_shift(&mut client, user_a2, office_a2, at(12, 0, 0, 0), "CONFIRMED")?;
    insert_shift(&mut client, user_b1, office_b1, at(10, 9, 0, 0), "CONFIRMED")?;

    insert_availability(&mut client, user_a1, at(10, 23, 59, 59), "AVAILABLE")?;
    insert_availability(&mut client, user_a2, at(11, 8, 0, 0), "MAYBE")?;
    insert_availability(&mut client, user_a1, at(12, 0, 0, 0), "AVAILABLE")?;
    insert_availability(&mut client, user_b1, at(10, 8, 0, 0), "AVAILABLE")?;

    Ok(Seeded {
        company_a: CompanyId::from_uuid(company_a),
        company_b: CompanyId::from_uuid(company_b),
        office_a1: OfficeId::from_uuid(office_a1),
        office_a2: OfficeId::from_uuid(office_a2),
        office_b1: OfficeId::from_uuid(office_b1),
        user_a1: UserId::from_uuid(user_a1),
        user_a2: UserId::from_uuid(user_a2),
        shifts_in_window: [first_edge, cancelled, last_edge]
            .into_iter()
            .map(ShiftId::from_uuid)
            .collect(),
    })
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let name = create_test_database(&cluster.connection().database_url("postgres"))?;
    let database_url = cluster.connection().database_url(&name);

    runtime
        .block_on(run_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    let seeded = seed(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        pool,
        database_url,
        seeded,
        _cluster: cluster,
    })
}

#[fixture]
fn staffing_db() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn requirements_are_scoped_to_company_and_window(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!("SKIP-TEST-CLUSTER: requirements_are_scoped_to_company_and_window skipped");
        return;
    };
    let source = context.source(DayBoundary::utc());
    let seeded = &context.seeded;
    let window = window(DayBoundary::utc(), 10, 11);

    let company_a = context
        .runtime
        .block_on(source.fetch_requirements(&seeded.company_a, &window))
        .expect("company A requirements");
    let company_b = context
        .runtime
        .block_on(source.fetch_requirements(&seeded.company_b, &window))
        .expect("company B requirements");

    let rows: Vec<_> = company_a
        .iter()
        .map(|row| (row.office_id, row.date, row.required_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            (seeded.office_a1, at(10, 0, 0, 0), 3),
            (seeded.office_a2, at(11, 0, 0, 0), 1),
        ]
    );
    assert_eq!(company_b.len(), 1);
    assert_eq!(company_b[0].office_id, seeded.office_b1);
}

#[rstest]
fn shifts_respect_half_open_window_edges(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!("SKIP-TEST-CLUSTER: shifts_respect_half_open_window_edges skipped");
        return;
    };
    let source = context.source(DayBoundary::utc());
    let seeded = &context.seeded;

    let shifts = context
        .runtime
        .block_on(source.fetch_shifts(&seeded.company_a, &window(DayBoundary::utc(), 10, 11)))
        .expect("shifts");

    let ids: Vec<_> = shifts.iter().map(|shift| shift.id).collect();
    assert_eq!(ids, seeded.shifts_in_window);
    assert_eq!(shifts[0].date, at(10, 0, 0, 0));
    assert_eq!(shifts[1].status, ShiftStatus::Cancelled);
    assert_eq!(shifts[2].date, at(11, 23, 59, 59));
}

#[rstest]
fn availability_carries_current_home_office(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!("SKIP-TEST-CLUSTER: availability_carries_current_home_office skipped");
        return;
    };
    let source = context.source(DayBoundary::utc());
    let seeded = &context.seeded;
    let window = window(DayBoundary::utc(), 10, 11);

    let before = context
        .runtime
        .block_on(source.fetch_availability(&seeded.company_a, &window))
        .expect("availability");
    context
        .client()
        .execute(
            "UPDATE users SET home_office_id = $1 WHERE id = $2",
            &[seeded.office_a2.as_uuid(), seeded.user_a1.as_uuid()],
        )
        .unwrap_or_else(|err| panic!("move user: {}", format_postgres_error(&err)));
    let after = context
        .runtime
        .block_on(source.fetch_availability(&seeded.company_a, &window))
        .expect("availability");

    let rows: Vec<_> = before
        .iter()
        .map(|row| (row.user_id, row.status, row.home_office_id))
        .collect();
    assert_eq!(
        rows,
        vec![
            (
                seeded.user_a1,
                AvailabilityStatus::Available,
                Some(seeded.office_a1)
            ),
            (seeded.user_a2, AvailabilityStatus::Maybe, None),
        ]
    );
    assert_eq!(after[0].home_office_id, Some(seeded.office_a2));
}

#[rstest]
fn duplicate_requirement_for_office_and_day_is_rejected(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!(
            "SKIP-TEST-CLUSTER: duplicate_requirement_for_office_and_day_is_rejected skipped"
        );
        return;
    };
    let mut client = context.client();
    let office = *context.seeded.office_a1.as_uuid();

    let err = insert_requirement(&mut client, office, june(10), 4)
        .expect_err("second requirement for the same office and day");
    insert_requirement(&mut client, office, june(13), 4).expect("different day is accepted");

    assert_eq!(err.code(), Some(&SqlState::UNIQUE_VIOLATION));
}

#[rstest]
fn requirement_days_follow_the_day_boundary(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!("SKIP-TEST-CLUSTER: requirement_days_follow_the_day_boundary skipped");
        return;
    };
    let tokyo = DayBoundary::from_offset_minutes(540).expect("valid offset");
    let source = context.source(tokyo);
    let seeded = &context.seeded;

    let rows = context
        .runtime
        .block_on(source.fetch_requirements(&seeded.company_a, &window(tokyo, 10, 10)))
        .expect("requirements");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].office_id, seeded.office_a1);
    assert_eq!(rows[0].date, at(9, 15, 0, 0));
    assert_eq!(tokyo.day_key_of(&rows[0].date), day_key(10));
}

#[rstest]
fn coverage_over_postgres_matches_seeded_rows(staffing_db: Option<TestContext>) {
    let Some(context) = staffing_db else {
        eprintln!("SKIP-TEST-CLUSTER: coverage_over_postgres_matches_seeded_rows skipped");
        return;
    };
    let seeded = &context.seeded;
    let service = CoverageService::new(
        Arc::new(context.source(DayBoundary::utc())),
        DayBoundary::utc(),
    );
    let request = CoverageRequest::new(seeded.company_a, day_key(10), day_key(11))
        .expect("valid request");

    let days = context
        .runtime
        .block_on(service.compute_coverage(request))
        .expect("coverage")
        .days;

    assert_eq!(days.len(), 2);
    let first = &days[0];
    assert_eq!(
        (first.total_required, first.total_assigned, first.total_available),
        (3, 1, 1)
    );
    assert_eq!(first.status, CoverageStatus::Partial);
    let office = &first.per_office[&seeded.office_a1];
    assert_eq!((office.required, office.assigned, office.available), (3, 1, 1));

    let second = &days[1];
    assert_eq!(
        (second.total_required, second.total_assigned, second.total_available),
        (1, 1, 0)
    );
    assert_eq!(second.status, CoverageStatus::Fulfilled);
    assert_eq!(second.per_office[&seeded.office_a2].assigned, 1);
}
