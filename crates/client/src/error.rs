//! Typed error types for the device client.

use std::io;
use std::time::Duration;

use escpos_link_codes::CodeError;

/// Device error conditions, categorized by type.
///
/// Transport failures are surfaced as-is; this crate never retries. Use
/// [`DeviceError::is_transport()`] to separate transport failures from
/// caller mistakes when implementing a retry policy on top.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    // -- Connection --
    /// The device actively refused the connection.
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the device responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The transport has been closed, locally or by the device.
    #[error("connection closed")]
    ConnectionClosed,

    // -- Address --
    /// The provided target string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// DNS resolution found no addresses for the given hostname.
    #[error("no address found for hostname: {0}")]
    NoAddressFound(String),

    // -- Transport --
    /// A serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    SerialError(String),

    /// The target needs a transport that was not compiled in.
    #[error("{0} transport not enabled in this build")]
    TransportUnavailable(&'static str),

    /// Writing to the device failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// Reading from the device failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// The inbound reader thread could not be started.
    #[error("failed to start inbound reader: {0}")]
    InboundPump(#[source] io::Error),

    // -- Status protocol --
    /// A status request is already waiting for its reply on this handle.
    ///
    /// Inbound data carries no framing, so a second outstanding request
    /// could not be told apart from the first.
    #[error("a status query is already pending on this device")]
    StatusQueryPending,

    /// No inbound data arrived before the status timeout.
    #[error("no status reply within {0:?}")]
    StatusTimeout(Duration),

    /// The device replied with an empty chunk.
    #[error("empty status reply")]
    EmptyReply,

    // -- Caller --
    /// A command parameter was rejected before anything was sent.
    #[error(transparent)]
    InvalidArgument(#[from] CodeError),

    /// An invalid configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DeviceError {
    /// Returns `true` if this error came from the transport (connection,
    /// I/O, or a missing reply) rather than from the caller's input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeviceError::ConnectionRefused { .. }
                | DeviceError::ConnectionTimeout { .. }
                | DeviceError::ConnectionFailed { .. }
                | DeviceError::ConnectionClosed
                | DeviceError::NoAddressFound(_)
                | DeviceError::SerialError(_)
                | DeviceError::WriteFailed(_)
                | DeviceError::ReadFailed(_)
                | DeviceError::StatusTimeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors() {
        assert!(
            DeviceError::ConnectionTimeout {
                addr: "x".into(),
                timeout: Duration::from_secs(1),
                source: io::Error::new(io::ErrorKind::TimedOut, "test"),
            }
            .is_transport()
        );
        assert!(
            DeviceError::ConnectionRefused {
                addr: "x".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "test"),
            }
            .is_transport()
        );
        assert!(DeviceError::ConnectionClosed.is_transport());
        assert!(
            DeviceError::WriteFailed(io::Error::new(io::ErrorKind::BrokenPipe, "test"))
                .is_transport()
        );
        assert!(DeviceError::ReadFailed(io::Error::other("test")).is_transport());
        assert!(DeviceError::SerialError("busy".into()).is_transport());
        assert!(DeviceError::StatusTimeout(Duration::from_millis(5)).is_transport());
    }

    #[test]
    fn caller_errors() {
        assert!(!DeviceError::InvalidAddress("x".into()).is_transport());
        assert!(!DeviceError::StatusQueryPending.is_transport());
        assert!(!DeviceError::TransportUnavailable("serial").is_transport());
        assert!(!DeviceError::InvalidConfig("x".into()).is_transport());
        assert!(!DeviceError::EmptyReply.is_transport());
        let err = DeviceError::from(CodeError::OutOfRange {
            param: "row",
            value: 3,
            min: 1,
            max: 2,
        });
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "row must be in 1..=2, got 3");
    }
}
