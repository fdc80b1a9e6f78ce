//! Link abstraction: any byte-oriented channel to the host.
//!
//! Concrete implementations:
//! - UART serial on the device ([`UartLink`](crate::adapters::uart_link))
//! - in-memory pipes in tests
//!
//! Script loading, telemetry and pause handling are generic over `Link`,
//! so a new channel requires zero changes to the protocol logic.

use crate::error::LinkError;

/// Line terminator used for every status line.
pub const LINE_END: &[u8] = b"\r\n";

/// Byte-oriented, non-blocking channel.
pub trait Link {
    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// Write `data`, returning how many bytes were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, LinkError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), LinkError>;

    /// Write every byte of `data`. A link that accepts nothing is closed.
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), LinkError> {
        while !data.is_empty() {
            match self.write(data)? {
                0 => return Err(LinkError::Closed),
                n => data = &data[n..],
            }
        }
        Ok(())
    }

    /// Write `line` followed by `\r\n` and flush.
    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.write_all(line.as_bytes())?;
        self.write_all(LINE_END)?;
        self.flush()
    }
}

impl<L: Link + ?Sized> Link for &mut L {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        (**self).flush()
    }
}
