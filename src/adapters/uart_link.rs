//! UART link adapter (device only).
//!
//! Wraps an ESP-IDF `UartDriver` as a non-blocking [`Link`]. The host
//! tooling talks 8N1 at the configured baud rate.

use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::uart::UartDriver;
use log::warn;

use crate::error::LinkError;
use crate::protocol::Link;

pub struct UartLink<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartLink<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl Link for UartLink<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.uart.read(buf, NON_BLOCK).map_err(|e| {
            warn!("UART read failed: {e}");
            LinkError::ReadFailed
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        self.uart.write(data).map_err(|e| {
            warn!("UART write failed: {e}");
            LinkError::WriteFailed
        })
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        self.uart.wait_tx_done(BLOCK).map_err(|e| {
            warn!("UART flush failed: {e}");
            LinkError::WriteFailed
        })
    }
}
