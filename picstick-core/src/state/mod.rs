//! Connection state machine
//!
//! Tracks where the host session is: disconnected, connected, or holding
//! the target in programming mode. The state is advisory; commands are
//! executed whatever the state.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::ConnectionState;
