//! ICSP command opcodes

/// 8-bit ICSP commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Load PC address (payload follows)
    LoadAddress = 0x80,
    /// Bulk erase program memory (and configuration if PC >= 0x8000)
    BulkErase = 0x18,
    /// Erase the row addressed by PC
    RowErase = 0xF0,
    /// Load data for NVM, then increment PC (payload follows)
    LoadDataIncrement = 0x02,
    /// Load data for NVM (payload follows)
    LoadData = 0x00,
    /// Read data from NVM, then increment PC
    ReadDataIncrement = 0xFE,
    /// Read data from NVM
    ReadData = 0xFC,
    /// Increment PC
    IncrementAddress = 0xF8,
    /// Begin internally timed programming
    BeginInternalWrite = 0xE0,
    /// Begin externally timed programming
    BeginExternalWrite = 0xC0,
    /// End externally timed programming
    EndExternalWrite = 0x82,
}

impl Opcode {
    /// Wire value of the command
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.code()
    }
}
