//! Command keywords

/// Command keywords understood by the programmer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Keyword {
    /// Open a session
    Hello,
    /// Close a session
    Bye,
    /// Put the target into ICSP programming mode
    Start,
    /// Release the target from programming mode
    Stop,
    /// Program a single word
    Word,
    /// Program one 64-word row
    Row,
    /// Erase a row, user flash, or the whole device
    Erase,
    /// Read back one word
    Read,
}

// Wire format values
const KW_HELLO: &[u8] = b"hello";
const KW_BYE: &[u8] = b"bye";
const KW_START: &[u8] = b"start";
const KW_STOP: &[u8] = b"stop";
const KW_WORD: &[u8] = b"word";
const KW_ROW: &[u8] = b"row";
const KW_ERASE: &[u8] = b"erase";
const KW_READ: &[u8] = b"read";

impl Keyword {
    /// Every keyword, in matching order
    pub const ALL: [Keyword; 8] = [
        Keyword::Hello,
        Keyword::Bye,
        Keyword::Start,
        Keyword::Stop,
        Keyword::Word,
        Keyword::Row,
        Keyword::Erase,
        Keyword::Read,
    ];

    /// Wire spelling of the keyword
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Keyword::Hello => KW_HELLO,
            Keyword::Bye => KW_BYE,
            Keyword::Start => KW_START,
            Keyword::Stop => KW_STOP,
            Keyword::Word => KW_WORD,
            Keyword::Row => KW_ROW,
            Keyword::Erase => KW_ERASE,
            Keyword::Read => KW_READ,
        }
    }

    /// Match the bytes received before the separator
    ///
    /// Matching is case-sensitive and by exact prefix: `received` must
    /// start with the keyword, and any trailing bytes are ignored. Only
    /// the received bytes take part, never stale buffer contents.
    pub fn match_prefix(received: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kw| received.starts_with(kw.as_bytes()))
    }

    /// Returns true if this command drives the target over ICSP
    /// and assumes programming mode is active
    pub fn is_programming(self) -> bool {
        matches!(
            self,
            Keyword::Word | Keyword::Row | Keyword::Erase | Keyword::Read
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_keywords() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::match_prefix(kw.as_bytes()), Some(kw));
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        assert_eq!(Keyword::match_prefix(b"hello world"), Some(Keyword::Hello));
        assert_eq!(Keyword::match_prefix(b"rows"), Some(Keyword::Row));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(Keyword::match_prefix(b"HELLO"), None);
        assert_eq!(Keyword::match_prefix(b"Read"), None);
    }

    #[test]
    fn test_truncated_keyword_rejected() {
        assert_eq!(Keyword::match_prefix(b"hel"), None);
        assert_eq!(Keyword::match_prefix(b""), None);
    }

    #[test]
    fn test_programming_commands() {
        assert!(Keyword::Row.is_programming());
        assert!(Keyword::Read.is_programming());
        assert!(!Keyword::Hello.is_programming());
        assert!(!Keyword::Start.is_programming());
    }

    proptest! {
        #[test]
        fn prop_match_requires_keyword_prefix(received in proptest::collection::vec(any::<u8>(), 0..16)) {
            match Keyword::match_prefix(&received) {
                Some(kw) => prop_assert!(received.starts_with(kw.as_bytes())),
                None => {
                    for kw in Keyword::ALL {
                        prop_assert!(!received.starts_with(kw.as_bytes()));
                    }
                }
            }
        }
    }
}
