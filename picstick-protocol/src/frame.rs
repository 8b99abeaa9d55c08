//! Command body framing
//!
//! A command is its keyword, the separator, then a body whose shape
//! depends on the keyword:
//! - `word`: ADDR_HI ADDR_LO ':' WORD_HI WORD_LO (5 raw bytes)
//! - `row`: ADDR_HI ADDR_LO ':' then exactly 128 raw bytes (64 words)
//! - `erase`, `read`: ADDR_HI ADDR_LO (2 raw bytes)
//!
//! All multi-byte values are big-endian.

/// Separator between keyword, fields and status
pub const SEPARATOR: u8 = b':';

/// Bytes in an address field
pub const ADDRESS_LEN: usize = 2;

/// Bytes in a `word` body, separator included
pub const WORD_BODY_LEN: usize = 5;

/// Words in one program-memory row
pub const WORDS_PER_ROW: usize = 64;

/// Bytes in one program-memory row
pub const ROW_BYTES: usize = WORDS_PER_ROW * 2;

/// Size of the shared input buffer: one row plus framing slack
pub const INPUT_BUFFER_SIZE: usize = ROW_BYTES + 4;

/// Erase address requesting a bulk erase of the whole device
pub const ERASE_ALL: u16 = 0xFFFF;

/// Erase address requesting a bulk erase of user flash only
pub const ERASE_FLASH: u16 = 0xFFFE;

/// Address loaded before a whole-device bulk erase (configuration space)
pub const DEVICE_ERASE_ADDRESS: u16 = 0x8000;

/// Address loaded before a user-flash bulk erase
pub const FLASH_ERASE_ADDRESS: u16 = 0x0000;

/// Errors that can occur while decoding or encoding protocol data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Wrong byte count or misplaced separator
    Framing,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Decode a big-endian address field
pub fn decode_address(bytes: &[u8]) -> Result<u16, ProtocolError> {
    match bytes {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(ProtocolError::Framing),
    }
}

/// Body of a `word` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordBody {
    /// Target address
    pub address: u16,
    /// Word to program
    pub word: u16,
}

impl WordBody {
    /// Parse the 5-byte body
    pub fn parse(body: &[u8]) -> Result<Self, ProtocolError> {
        match body {
            [ah, al, SEPARATOR, wh, wl] => Ok(Self {
                address: u16::from_be_bytes([*ah, *al]),
                word: u16::from_be_bytes([*wh, *wl]),
            }),
            _ => Err(ProtocolError::Framing),
        }
    }
}

/// Data section of a `row` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBody<'a> {
    data: &'a [u8],
}

impl<'a> RowBody<'a> {
    /// Wrap exactly [`ROW_BYTES`] of row data
    pub fn parse(data: &'a [u8]) -> Result<Self, ProtocolError> {
        if data.len() != ROW_BYTES {
            return Err(ProtocolError::Framing);
        }
        Ok(Self { data })
    }

    /// The row's words in programming order
    pub fn words(&self) -> impl Iterator<Item = u16> + 'a {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }
}

/// What an `erase` command erases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EraseTarget {
    /// Bulk erase of the whole device, configuration included
    Device,
    /// Bulk erase of user flash
    UserFlash,
    /// Erase the row containing the address
    Row(u16),
}

impl EraseTarget {
    /// Interpret an erase address, recognising the reserved sentinels
    pub fn from_address(address: u16) -> Self {
        match address {
            ERASE_ALL => EraseTarget::Device,
            ERASE_FLASH => EraseTarget::UserFlash,
            row => EraseTarget::Row(row),
        }
    }

    /// Address to load before issuing the erase
    pub fn address(self) -> u16 {
        match self {
            EraseTarget::Device => DEVICE_ERASE_ADDRESS,
            EraseTarget::UserFlash => FLASH_ERASE_ADDRESS,
            EraseTarget::Row(address) => address,
        }
    }

    /// Returns true if this is a bulk erase
    pub fn is_bulk(self) -> bool {
        !matches!(self, EraseTarget::Row(_))
    }
}
