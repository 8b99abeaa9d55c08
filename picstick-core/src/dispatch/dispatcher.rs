//! Command dispatcher

use picstick_protocol::{
    decode_address, EraseTarget, Keyword, ProtocolError, Response, RowBody, WordBody,
    ADDRESS_LEN, ROW_BYTES, SEPARATOR, WORDS_PER_ROW, WORD_BODY_LEN,
};

use super::buffer::InputBuffer;
use crate::icsp::timing::{
    BULK_ERASE_US, COMMAND_DELAY_US, CONFIG_WORD_WRITE_US, PROGRAM_MEMORY_WRITE_US, ROW_ERASE_US,
};
use crate::icsp::Opcode;
use crate::state::{ConnectionState, Event};
use crate::traits::{ByteLink, IcspBus};

/// Why a dispatch cycle did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Command body had the wrong length or a misplaced separator;
    /// the first `received` buffer bytes were echoed back
    Framing { received: usize },
    /// Keyword not recognised; the first `received` buffer bytes were
    /// echoed back
    Unknown { received: usize },
    /// The response could not be encoded
    Encoding(ProtocolError),
}

impl From<ProtocolError> for CommandError {
    fn from(err: ProtocolError) -> Self {
        CommandError::Encoding(err)
    }
}

/// Report of one dispatch cycle, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatched {
    /// Matched keyword, if any
    pub keyword: Option<Keyword>,
    /// Outcome of the command
    pub result: Result<(), CommandError>,
    /// Connection state before the command
    pub previous: ConnectionState,
    /// Connection state after the command
    pub state: ConnectionState,
}

impl Dispatched {
    /// Check if a programming command arrived outside programming mode
    ///
    /// Such commands still run; this only flags them.
    pub fn out_of_state(&self) -> bool {
        self.keyword.is_some_and(Keyword::is_programming) && !self.previous.is_programming()
    }
}

/// Reads commands from a [`ByteLink`] and runs them on an [`IcspBus`]
pub struct CommandDispatcher<L, I> {
    link: L,
    icsp: I,
    buffer: InputBuffer,
    state: ConnectionState,
}

impl<L: ByteLink, I: IcspBus> CommandDispatcher<L, I> {
    /// Create a dispatcher in the disconnected state
    pub fn new(link: L, icsp: I) -> Self {
        Self {
            link,
            icsp,
            buffer: InputBuffer::new(),
            state: ConnectionState::default(),
        }
    }

    /// Run one dispatch cycle, blocking until the command is complete
    pub fn dispatch(&mut self) -> Dispatched {
        let previous = self.state;
        let received = self
            .link
            .recv_bytes_until(SEPARATOR, self.buffer.as_mut_slice());

        let keyword = Keyword::match_prefix(self.buffer.filled(received));
        let result = match keyword {
            Some(keyword) => self.run(keyword),
            None => {
                let response = Response::Unknown(self.buffer.filled(received));
                send_response(&mut self.link, response)
                    .and(Err(CommandError::Unknown { received }))
            }
        };

        if let (Some(keyword), Ok(())) = (keyword, result) {
            self.state = self.state.transition(Event::from_keyword(keyword));
        }

        Dispatched {
            keyword,
            result,
            previous,
            state: self.state,
        }
    }

    fn run(&mut self, keyword: Keyword) -> Result<(), CommandError> {
        let outcome = match keyword {
            Keyword::Hello | Keyword::Bye => Ok(None),
            Keyword::Start => {
                self.icsp.enable();
                Ok(None)
            }
            Keyword::Stop => {
                self.icsp.disable();
                Ok(None)
            }
            Keyword::Word => self.program_word().map(|()| None),
            Keyword::Row => self.program_row().map(|()| None),
            Keyword::Erase => self.erase().map(|()| None),
            Keyword::Read => self.read_word().map(Some),
        };

        match outcome {
            Ok(None) => send_response(&mut self.link, Response::Ok),
            Ok(Some(word)) => send_response(&mut self.link, Response::Word(word)),
            Err(received) => {
                let response = Response::Error(self.buffer.filled(received));
                send_response(&mut self.link, response)?;
                Err(CommandError::Framing { received })
            }
        }
    }

    /// Receive exactly `len` body bytes into the buffer
    ///
    /// A short read yields the number of bytes that did arrive.
    fn recv_exact(&mut self, len: usize) -> Result<(), usize> {
        let received = self.link.recv_bytes(self.buffer.window_mut(len));
        if received == len {
            Ok(())
        } else {
            Err(received)
        }
    }

    fn program_word(&mut self) -> Result<(), usize> {
        self.recv_exact(WORD_BODY_LEN)?;
        let WordBody { address, word } =
            WordBody::parse(self.buffer.filled(WORD_BODY_LEN)).map_err(|_| WORD_BODY_LEN)?;

        load_address(&mut self.icsp, address);
        send_with_payload(&mut self.icsp, Opcode::LoadData, word);
        self.icsp.command(Opcode::BeginInternalWrite.code());
        self.icsp.wait_us(CONFIG_WORD_WRITE_US);
        Ok(())
    }

    fn program_row(&mut self) -> Result<(), usize> {
        let received = self
            .link
            .recv_bytes_until(SEPARATOR, self.buffer.as_mut_slice());
        let address = decode_address(self.buffer.filled(received)).map_err(|_| received)?;

        self.recv_exact(ROW_BYTES)?;
        let row = RowBody::parse(self.buffer.filled(ROW_BYTES)).map_err(|_| ROW_BYTES)?;

        load_address(&mut self.icsp, address);
        // Every word but the last advances the address
        for (index, word) in row.words().enumerate() {
            let opcode = if index + 1 < WORDS_PER_ROW {
                Opcode::LoadDataIncrement
            } else {
                Opcode::LoadData
            };
            send_with_payload(&mut self.icsp, opcode, word);
        }
        self.icsp.command(Opcode::BeginInternalWrite.code());
        self.icsp.wait_us(PROGRAM_MEMORY_WRITE_US);
        Ok(())
    }

    fn erase(&mut self) -> Result<(), usize> {
        self.recv_exact(ADDRESS_LEN)?;
        let address = decode_address(self.buffer.filled(ADDRESS_LEN)).map_err(|_| ADDRESS_LEN)?;
        let target = EraseTarget::from_address(address);

        let (opcode, duration) = if target.is_bulk() {
            (Opcode::BulkErase, BULK_ERASE_US)
        } else {
            (Opcode::RowErase, ROW_ERASE_US)
        };

        load_address(&mut self.icsp, target.address());
        self.icsp.command(opcode.code());
        self.icsp.wait_us(duration);
        Ok(())
    }

    fn read_word(&mut self) -> Result<u16, usize> {
        self.recv_exact(ADDRESS_LEN)?;
        let address = decode_address(self.buffer.filled(ADDRESS_LEN)).map_err(|_| ADDRESS_LEN)?;

        load_address(&mut self.icsp, address);
        self.icsp.command(Opcode::ReadData.code());
        self.icsp.wait_us(COMMAND_DELAY_US);
        Ok(self.icsp.read())
    }
}

fn send_response<L: ByteLink>(link: &mut L, response: Response<'_>) -> Result<(), CommandError> {
    let encoded = response.encode_to_vec()?;
    link.send_bytes(&encoded);
    Ok(())
}

/// Command, delay, payload, delay
fn send_with_payload<I: IcspBus>(icsp: &mut I, opcode: Opcode, word: u16) {
    icsp.command(opcode.code());
    icsp.wait_us(COMMAND_DELAY_US);
    icsp.payload(word);
    icsp.wait_us(COMMAND_DELAY_US);
}

fn load_address<I: IcspBus>(icsp: &mut I, address: u16) {
    send_with_payload(icsp, Opcode::LoadAddress, address);
}
