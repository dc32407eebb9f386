//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! per-request trace span.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace};
