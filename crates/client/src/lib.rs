//! ESC/POS device client: one handle over serial or TCP.
//!
//! [`Device`] wraps a [`Transport`] (serial line or TCP socket), sends the
//! `ESC @` initialization command exactly once as soon as the transport is
//! open, and re-emits every inbound chunk to a listener registry. The
//! [`ReceiptPrinter`] and [`CustomerDisplay`] profiles layer device-specific
//! commands on top, and the status query protocol correlates a `DLE EOT n`
//! request with the next inbound chunk.
//!
//! The API is synchronous (`std::net`, `serialport`); inbound data is read
//! by one background thread per handle.
mod config;
mod device;
mod display;
mod error;
mod inbound;
mod printer;
#[cfg(feature = "serial")]
mod serial;
mod status;
mod target;
#[cfg(feature = "tcp")]
mod tcp;
#[cfg(test)]
pub(crate) mod testing;

pub use config::{
    DEFAULT_BAUD, DeviceConfig, DeviceTimeouts, SerialDataBits, SerialFlowControl, SerialParity,
    SerialSettings, SerialStopBits,
};
pub use device::{Device, ReadyState};
pub use display::CustomerDisplay;
pub use error::DeviceError;
pub use inbound::{InboundHub, ListenerId};
pub use printer::ReceiptPrinter;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use status::{StatusEncoding, StatusReply};
pub use target::{DEFAULT_PORT, Target, TransportKind, resolve_addr};
#[cfg(feature = "tcp")]
pub use tcp::TcpTransport;

pub use escpos_link_codes as codes;

use std::io::Read;

// ── Traits ──────────────────────────────────────────────────────────────

/// A byte stream to a device. Both serial and TCP transports implement this.
///
/// A transport is open once constructed. The device handle writes through
/// it from the caller's thread and reads from the separate handle returned
/// by [`Transport::reader`] on its inbound thread.
pub trait Transport: Send {
    /// Which kind of stream this is.
    fn kind(&self) -> TransportKind;

    /// Human-readable peer name (socket address or port path) for logs.
    fn peer(&self) -> String;

    /// Write all of `data` and flush.
    ///
    /// After [`close`](Transport::close) this returns
    /// [`DeviceError::ConnectionClosed`].
    fn write_all(&mut self, data: &[u8]) -> Result<(), DeviceError>;

    /// An independent read handle on the same stream.
    ///
    /// Reads should time out periodically (`ErrorKind::TimedOut` or
    /// `WouldBlock`) so the inbound thread can notice shutdown, and return
    /// `Ok(0)` once the stream is closed.
    fn reader(&mut self) -> Result<Box<dyn Read + Send>, DeviceError>;

    /// Tear down the stream. Idempotent.
    fn close(&mut self) -> Result<(), DeviceError>;
}

/// Open the transport named by `target`.
///
/// Connection failures are returned as-is; nothing is retried.
pub fn open_transport(
    target: &Target,
    config: &DeviceConfig,
) -> Result<Box<dyn Transport>, DeviceError> {
    config.validate()?;
    match target {
        #[cfg(feature = "tcp")]
        Target::Network { host, port } => {
            let addr = resolve_addr(host, *port)?;
            Ok(Box::new(TcpTransport::connect(addr, config)?))
        }
        #[cfg(not(feature = "tcp"))]
        Target::Network { .. } => Err(DeviceError::TransportUnavailable("tcp")),
        #[cfg(feature = "serial")]
        Target::Serial { path, settings } => {
            Ok(Box::new(SerialTransport::open(path, settings, config)?))
        }
        #[cfg(not(feature = "serial"))]
        Target::Serial { .. } => Err(DeviceError::TransportUnavailable("serial")),
    }
}

/// List serial port names available on this system.
///
/// Returns an empty list when the `serial` feature is disabled.
pub fn list_serial_ports() -> Vec<String> {
    #[cfg(feature = "serial")]
    {
        SerialTransport::list_ports()
    }
    #[cfg(not(feature = "serial"))]
    {
        Vec::new()
    }
}
