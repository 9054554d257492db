use std::fmt::Display;

use anyhow::{Context, Result};

/// Public prelude for `vcfx-error`.
///
/// Re-exports `anyhow` and `thiserror` so downstream crates only need a
/// single `use vcfx_error::prelude::*;`.
pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{loc, LocatedError, LocatedOption};
}

/// Wrap an ad-hoc error message with the caller's `file:line:column`.
#[macro_export]
macro_rules! loc {
    ($e: expr) => {
        Err(anyhow::anyhow!(format!("[{}:{}:{}] {}", file!(), line!(), column!(), $e)))
    }
}

/// Extends [`Result<T, E>`] with context that also records the call site.
///
/// # Example
/// ```should_panic
/// use vcfx_error::LocatedError;
///
/// fn compute(path: &str) -> anyhow::Result<()> {
///     std::fs::File::open(path).with_loc(|| format!("Failed to open {path}"))?;
///     Ok(())
/// }
///
/// compute("/does/not/exist").unwrap();
/// ```
pub trait LocatedError<T, E> {
    /// Attach eagerly-evaluated context plus the current call site.
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    /// Attach lazily-evaluated context plus the current call site.
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
    {
        let caller = std::panic::Location::caller();
        self.with_context(|| format!("[{}:{}:{}] {context}", caller.file(), caller.line(), caller.column()))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        let caller = std::panic::Location::caller();
        self.with_context(|| format!("[{}:{}:{}] {}", caller.file(), caller.line(), caller.column(), f()))
    }
}

/// Same contract as [`LocatedError`], for `Option<T>`.
pub trait LocatedOption<T> {
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
    {
        let caller = std::panic::Location::caller();
        self.with_context(|| format!("[{}:{}:{}] {context}", caller.file(), caller.line(), caller.column()))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        let caller = std::panic::Location::caller();
        self.with_context(|| format!("[{}:{}:{}] {}", caller.file(), caller.line(), caller.column(), f()))
    }
}
