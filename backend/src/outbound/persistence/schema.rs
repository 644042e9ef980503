//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `backend/migrations`; `diesel print-schema` against a
//! migrated database regenerates this file.

diesel::table! {
    /// Sessions written while the external surf API is unreachable.
    surf_sessions_duplicate (id) {
        id -> Int8,
        session_name -> Varchar,
        location -> Varchar,
        date -> Date,
        time -> Time,
        end_time -> Time,
        /// Between 1 and 10, enforced by a check constraint.
        fun_rating -> Float8,
        session_notes -> Nullable<Text>,
        user_id -> Varchar,
        tagged_users -> Array<Text>,
        raw_swell -> Jsonb,
        created_at -> Timestamptz,
    }
}
