//! Events that trigger connection state transitions

use picstick_protocol::Keyword;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Host greeted the programmer
    Hello,
    /// Host ended the session
    Bye,
    /// Target entered programming mode
    ProgrammingStarted,
    /// Target released from programming mode
    ProgrammingStopped,
    /// A programming command (word, row, erase, read) completed
    Programmed,
}

impl Event {
    /// Event produced by a successfully executed command
    pub fn from_keyword(keyword: Keyword) -> Self {
        match keyword {
            Keyword::Hello => Event::Hello,
            Keyword::Bye => Event::Bye,
            Keyword::Start => Event::ProgrammingStarted,
            Keyword::Stop => Event::ProgrammingStopped,
            Keyword::Word | Keyword::Row | Keyword::Erase | Keyword::Read => Event::Programmed,
        }
    }
}
