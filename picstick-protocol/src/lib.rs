//! picstick Host Command Protocol
//!
//! This crate defines the line-oriented protocol spoken between the host
//! and the programmer over the software UART. Keywords and the separator
//! are ASCII; addresses, words and row data are raw big-endian binary.
//!
//! # Protocol Overview
//!
//! ```text
//! host → programmer                       programmer → host
//! ┌─────────┬───┬──────────────────┐      ┌────────┬───┬──────────────┐
//! │ KEYWORD │ : │ BODY (per cmd)   │      │ STATUS │ : │ PAYLOAD      │
//! └─────────┴───┴──────────────────┘      └────────┴───┴──────────────┘
//! ```
//!
//! | Keyword | Body                                  | Success reply   |
//! |---------|---------------------------------------|-----------------|
//! | `hello` | none                                  | `OK:`           |
//! | `bye`   | none                                  | `OK:`           |
//! | `start` | none                                  | `OK:`           |
//! | `stop`  | none                                  | `OK:`           |
//! | `word`  | `AH AL : WH WL`                       | `OK:`           |
//! | `row`   | `AH AL :` then 128 data bytes         | `OK:`           |
//! | `erase` | `AH AL`                               | `OK:`           |
//! | `read`  | `AH AL`                               | `OK:` `WH WL`   |
//!
//! Failures reply `ERROR:` or `UNKNOWN:` followed by the raw bytes that
//! were rejected. The echo is not length-prefixed.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod keyword;
pub mod response;

pub use frame::{
    decode_address, EraseTarget, ProtocolError, RowBody, WordBody, ADDRESS_LEN, ERASE_ALL,
    ERASE_FLASH, INPUT_BUFFER_SIZE, ROW_BYTES, SEPARATOR, WORDS_PER_ROW, WORD_BODY_LEN,
};
pub use keyword::Keyword;
pub use response::{Response, MAX_RESPONSE_SIZE};
