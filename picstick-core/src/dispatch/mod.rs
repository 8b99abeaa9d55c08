//! Command dispatch
//!
//! One dispatch cycle reads a keyword up to the separator, reads the
//! command body, runs the ICSP sequence and writes exactly one response.

pub mod buffer;
pub mod dispatcher;

pub use buffer::InputBuffer;
pub use dispatcher::{CommandDispatcher, CommandError, Dispatched};
