//! Capability ports consumed by the use cases.
//!
//! Everything a use case needs from the outside world is expressed as a
//! trait here and injected through
//! [`TodoEnvironment`](crate::environment::TodoEnvironment):
//!
//! - [`Clock`] supplies the current instant, keeping recurrence and
//!   "today" filters deterministic under test.
//! - [`TodoRepository`] is the abstract storage contract, with
//!   [`TodoWriter`] as its transaction-scoped write subset.

mod clock;
mod todo_repo;

pub use clock::{Clock, SystemClock};
pub use todo_repo::{
    NewTodoRecord, RepoFuture, TodoQuery, TodoRecordPatch, TodoRepoError, TodoRepository,
    TodoWriter, TxWork,
};
