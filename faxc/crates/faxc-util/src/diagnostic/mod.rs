//! Diagnostics: the checker's error taxonomy and how it renders to the
//! user.
//!
//! The checker never prints or handles multiple errors at once — the
//! first [`CheckError`] encountered aborts the check pass and propagates
//! with `?` up to the driver, which is the only place a diagnostic is
//! ever rendered or written to `stderr`.

mod check_error;

pub use check_error::CheckError;
