//! `rulwatch-core` -- pure domain logic for the RUL monitoring dashboard.
//!
//! Nothing in this crate performs I/O. The monitor crate owns the HTTP
//! client, the state store and the renderer; everything here can be
//! tested in isolation.

pub mod error;
pub mod failure_date;
pub mod gauge;
pub mod machine;
pub mod merge;
pub mod metric_names;
pub mod status;
pub mod types;

pub use error::CoreError;
