//! TCP transport for network receipt printers (port 9100 / RAW).

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::{DeviceConfig, DeviceError, Transport, TransportKind};

/// A synchronous TCP connection to an ESC/POS device.
///
/// The stream is configured with TCP_NODELAY, keepalive, the configured
/// write timeout, and the poll interval as its read timeout so the inbound
/// reader wakes up regularly.
pub struct TcpTransport {
    stream: Option<TcpStream>,
    addr: SocketAddr,
}

impl TcpTransport {
    /// Connect to `addr` within `config.timeouts.connect`.
    pub fn connect(addr: SocketAddr, config: &DeviceConfig) -> Result<Self, DeviceError> {
        let stream =
            TcpStream::connect_timeout(&addr, config.timeouts.connect).map_err(|e| {
                match e.kind() {
                    io::ErrorKind::ConnectionRefused => DeviceError::ConnectionRefused {
                        addr: addr.to_string(),
                        source: e,
                    },
                    io::ErrorKind::TimedOut => DeviceError::ConnectionTimeout {
                        addr: addr.to_string(),
                        timeout: config.timeouts.connect,
                        source: e,
                    },
                    _ => DeviceError::ConnectionFailed {
                        addr: addr.to_string(),
                        source: e,
                    },
                }
            })?;

        configure_stream(&stream, &addr, config)?;
        log::debug!("tcp: connected to {addr}");

        Ok(Self {
            stream: Some(stream),
            addr,
        })
    }

    /// The socket address this transport is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    fn stream(&mut self) -> Result<&mut TcpStream, DeviceError> {
        self.stream.as_mut().ok_or(DeviceError::ConnectionClosed)
    }
}

impl Transport for TcpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Tcp
    }

    fn peer(&self) -> String {
        self.addr.to_string()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        let stream = self.stream()?;
        stream.write_all(data).map_err(DeviceError::WriteFailed)?;
        stream.flush().map_err(DeviceError::WriteFailed)?;
        Ok(())
    }

    fn reader(&mut self) -> Result<Box<dyn Read + Send>, DeviceError> {
        let clone = self.stream()?.try_clone().map_err(DeviceError::ReadFailed)?;
        Ok(Box::new(clone))
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        if let Some(stream) = self.stream.take() {
            // Unblocks the inbound reader with Ok(0).
            let _ = stream.shutdown(Shutdown::Both);
            log::debug!("tcp: closed {}", self.addr);
        }
        Ok(())
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Configure TCP_NODELAY, keepalive, and read/write timeouts on a stream.
fn configure_stream(
    stream: &TcpStream,
    addr: &SocketAddr,
    config: &DeviceConfig,
) -> Result<(), DeviceError> {
    let failed = |e| DeviceError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    };

    // Commands are small; send them as soon as they are written.
    stream.set_nodelay(true).map_err(failed)?;
    configure_keepalive(stream, Duration::from_secs(60)).map_err(failed)?;
    stream
        .set_write_timeout(Some(config.timeouts.write))
        .map_err(failed)?;
    stream
        .set_read_timeout(Some(config.timeouts.poll))
        .map_err(failed)?;

    Ok(())
}

/// Configure TCP keepalive on a `TcpStream` via `socket2`.
fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}
