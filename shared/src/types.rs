//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Currency amount
///
/// Prices travel as plain floats the way the backend sends them; rounding
/// only happens at presentation time.
pub type Amount = f64;
