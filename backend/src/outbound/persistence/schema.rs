//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Offices belonging to a company.
    offices (id) {
        id -> Uuid,
        /// Owning tenant.
        company_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Staff accounts.
    users (id) {
        id -> Uuid,
        /// Owning tenant.
        company_id -> Uuid,
        /// Current home office; availability is attributed here at read time.
        home_office_id -> Nullable<Uuid>,
        display_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Headcount targets, unique per office and business day.
    staffing_requirements (id) {
        id -> Uuid,
        office_id -> Uuid,
        /// Business day in the deployment's day boundary.
        work_date -> Date,
        required_count -> Int4,
        start_time -> Nullable<Time>,
        end_time -> Nullable<Time>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Shift assignments, including cancelled ones.
    shifts (id) {
        id -> Uuid,
        user_id -> Uuid,
        office_id -> Uuid,
        work_date -> Timestamptz,
        /// One of SCHEDULED, CONFIRMED, COMPLETED, CANCELLED.
        status -> Varchar,
    }
}

diesel::table! {
    /// Availability submitted by staff.
    availability_requests (id) {
        id -> Uuid,
        user_id -> Uuid,
        work_date -> Timestamptz,
        /// One of AVAILABLE, UNAVAILABLE, MAYBE.
        status -> Varchar,
    }
}

diesel::joinable!(staffing_requirements -> offices (office_id));
diesel::joinable!(shifts -> offices (office_id));
diesel::joinable!(availability_requests -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    offices,
    users,
    staffing_requirements,
    shifts,
    availability_requests,
);
