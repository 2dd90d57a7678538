//! # Taskdeck Core
//!
//! The todo lifecycle engine: domain types, pure domain functions, the
//! abstract storage/clock ports, and the five use-case orchestrators
//! (Create, Get, List, Update, Delete).
//!
//! ## Architecture
//!
//! - **Ports**: all external capabilities ([`ports::TodoRepository`],
//!   [`ports::Clock`]) are traits injected through
//!   [`environment::TodoEnvironment`]. Use cases never touch a database or
//!   the system clock directly.
//! - **Pure core**: recurrence arithmetic, validation/normalization, and
//!   list-item assembly are plain functions with no I/O.
//! - **Closed error taxonomy**: every failure crossing the use-case boundary
//!   is a [`error::TodoUseCaseError`]; repository failures are caught and
//!   mapped, never propagated raw.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck_core::environment::TodoEnvironment;
//! use taskdeck_core::usecases::{CreateTodo, CreateTodoInput};
//!
//! let env = TodoEnvironment::new(repo, clock);
//! let create = CreateTodo::new(env);
//! let item = create.execute(input).await?;
//! ```

pub mod assembler;
pub mod environment;
pub mod error;
pub mod ports;
pub mod recurrence;
pub mod types;
pub mod usecases;
pub mod validation;

pub use environment::TodoEnvironment;
pub use error::{Result, TodoUseCaseError};
pub use types::{
    DueDateFilter, FieldError, ProgressStatus, RecurrenceType, TodoId, TodoItem, TodoListItem,
    UserId, ValidationReason,
};
