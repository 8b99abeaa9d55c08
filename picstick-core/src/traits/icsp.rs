//! ICSP bus trait

/// ICSP master operations used by the command dispatcher
///
/// Every operation blocks for its full protocol duration and cannot be
/// cancelled part way.
pub trait IcspBus {
    /// Enter programming mode: lines low, entry hold, then the entry key
    fn enable(&mut self);

    /// Leave programming mode and release all lines
    fn disable(&mut self);

    /// Clock out an 8-bit command, MSB first
    fn command(&mut self, opcode: u8);

    /// Clock out a 24-bit payload frame carrying `word`
    fn payload(&mut self, word: u16);

    /// Clock in a data word
    fn read(&mut self) -> u16;

    /// Busy-wait for `us` microseconds
    fn wait_us(&mut self, us: u32);
}
