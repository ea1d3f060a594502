//! Storage engine, journals and shared reply/error types.

pub mod error;
pub mod journal;
pub mod output;
pub mod store;
