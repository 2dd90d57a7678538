//! # Taskdeck Postgres
//!
//! `PostgreSQL` implementation of the todo repository port.
//!
//! [`PgTodoRepo`] backs every port operation with `sqlx` queries against a
//! single `todos` table; the two domain uniqueness constraints (per-owner
//! `active_name`, one successor per `previous_todo_id`) live in the schema
//! and are mapped back to the port's error variants by constraint name.

mod todo_repo;

pub use todo_repo::PgTodoRepo;
