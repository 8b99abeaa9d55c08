//! State machine definition

use super::events::Event;

/// Host session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No session
    #[default]
    Disconnected,
    /// Host said hello
    Connected,
    /// Target held in ICSP programming mode
    Programming,
}

impl ConnectionState {
    /// Check if programming commands are expected in this state
    pub fn is_programming(&self) -> bool {
        matches!(self, ConnectionState::Programming)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use ConnectionState::*;

        match (self, event) {
            // Session control works from anywhere
            (_, Event::Hello) => Connected,
            (_, Event::Bye) => Disconnected,
            (_, Event::ProgrammingStarted) => Programming,
            (_, Event::ProgrammingStopped) => Connected,

            // Programming commands leave the target in programming mode
            (_, Event::Programmed) => Programming,
        }
    }
}
