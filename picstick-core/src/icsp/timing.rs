//! ICSP timing constants
//!
//! These are contracts with the target chip. Shorter values make
//! programming fail, they do not make it faster.

/// Key clocked in after the entry hold to enter programming mode
pub const ENTRY_KEY: [u8; 4] = *b"MCHP";

/// Entry hold time (T_ENTH), lines low before the key
pub const ENTRY_HOLD_US: u32 = 250;

/// Clock high time (T_CKH)
pub const CLOCK_HIGH_US: u32 = 1;

/// Clock low time (T_CKL)
pub const CLOCK_LOW_US: u32 = 1;

/// Delay between a command and its payload, and between operations (T_DLY)
pub const COMMAND_DELAY_US: u32 = 3;

/// Bulk erase (T_ERAB, 8.4 ms max)
pub const BULK_ERASE_US: u32 = 8600;

/// Row erase (T_ERAR, 2.8 ms max)
pub const ROW_ERASE_US: u32 = 3000;

/// Internally timed program memory write (T_PINT, 2.8 ms max)
pub const PROGRAM_MEMORY_WRITE_US: u32 = 3000;

/// Internally timed configuration word write (T_PINT, 5.6 ms max)
pub const CONFIG_WORD_WRITE_US: u32 = 5800;

/// MCLR high before releasing the lines on exit
pub const EXIT_SETTLE_US: u32 = 10;

/// Clocks ignored at the start of a read frame
pub const READ_DUMMY_CLOCKS: usize = 9;

/// Data bits sampled from a read frame
pub const READ_DATA_BITS: usize = 14;
