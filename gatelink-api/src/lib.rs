//! Wire vocabulary of the gate controller HTTP protocol.
//!
//! Every reply carries a numeric `code`; [`Outcome`] gives it meaning and the
//! `models` decoders turn raw JSON bodies into tagged replies at the boundary,
//! so callers never branch on bare integers.

pub mod code;
pub mod error;
pub mod models;

pub use code::Outcome;
pub use error::TimeOfDayError;
