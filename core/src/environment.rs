//! Todo environment.
//!
//! Capability container injected into each use-case constructor.

use crate::ports::{Clock, TodoRepository};

/// External dependencies needed by the todo use cases.
///
/// Use cases hold no mutable state of their own; cloning the environment is
/// cheap when the capabilities are cheap to clone (pools, `Arc`s).
///
/// # Type Parameters
///
/// - `R`: todo repository
/// - `C`: clock
#[derive(Debug, Clone)]
pub struct TodoEnvironment<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Todo storage.
    pub repo: R,

    /// Time source.
    pub clock: C,
}

impl<R, C> TodoEnvironment<R, C>
where
    R: TodoRepository + Clone,
    C: Clock + Clone,
{
    /// Create a new todo environment.
    #[must_use]
    pub const fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }
}
