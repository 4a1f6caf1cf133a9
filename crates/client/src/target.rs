//! Connection targets and network address resolution.
//!
//! A [`Target`] names either a serial device or a network endpoint. Parsing
//! accepts the formats users type on the command line:
//! `/dev/ttyUSB0`, `COM3`, `IP`, `IP:PORT`, `[IPv6]:PORT`, `hostname`,
//! `hostname:PORT`. The network port defaults to 9100.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::{DeviceError, SerialSettings};

/// Default raw printing port (JetDirect / RAW).
pub const DEFAULT_PORT: u16 = 9100;

/// Which kind of byte stream backs a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransportKind {
    /// Local serial line (RS-232, USB-serial, Bluetooth SPP).
    Serial,
    /// TCP stream socket.
    Tcp,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Serial => write!(f, "serial"),
            TransportKind::Tcp => write!(f, "tcp"),
        }
    }
}

/// Where to find the device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Target {
    /// A serial device path and its line settings.
    Serial {
        /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
        path: String,
        /// Line settings.
        #[cfg_attr(feature = "serde", serde(default))]
        settings: SerialSettings,
    },
    /// A network endpoint.
    Network {
        /// Hostname or IP literal.
        host: String,
        /// TCP port.
        #[cfg_attr(feature = "serde", serde(default = "default_port"))]
        port: u16,
    },
}

#[cfg(feature = "serde")]
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Target {
    /// A serial target with the given settings.
    pub fn serial(path: impl Into<String>, settings: SerialSettings) -> Self {
        Target::Serial {
            path: path.into(),
            settings,
        }
    }

    /// A network target.
    pub fn network(host: impl Into<String>, port: u16) -> Self {
        Target::Network {
            host: host.into(),
            port,
        }
    }

    /// The transport this target is opened with.
    pub fn kind(&self) -> TransportKind {
        match self {
            Target::Serial { .. } => TransportKind::Serial,
            Target::Network { .. } => TransportKind::Tcp,
        }
    }

    /// Parse a user-supplied target string.
    ///
    /// Serial paths get [`SerialSettings::default()`]; network targets
    /// without a port get [`DEFAULT_PORT`]. No DNS lookup happens here.
    pub fn parse(input: &str) -> Result<Self, DeviceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DeviceError::InvalidAddress(input.to_string()));
        }
        if looks_like_serial_path(input) {
            return Ok(Target::serial(input, SerialSettings::default()));
        }

        // "192.168.1.55:9100" or "[::1]:9100"
        if let Ok(addr) = input.parse::<SocketAddr>() {
            return Ok(Target::network(addr.ip().to_string(), addr.port()));
        }
        // "192.168.1.55" or "::1"
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Ok(Target::network(ip.to_string(), DEFAULT_PORT));
        }
        // "printer01.local:9100"
        if let Some((host, port)) = input.rsplit_once(':') {
            if host.is_empty() || host.contains(':') {
                return Err(DeviceError::InvalidAddress(input.to_string()));
            }
            let port = port
                .parse::<u16>()
                .map_err(|_| DeviceError::InvalidAddress(input.to_string()))?;
            return Ok(Target::network(host, port));
        }
        if input.contains(char::is_whitespace) {
            return Err(DeviceError::InvalidAddress(input.to_string()));
        }
        // "printer01.local"
        Ok(Target::network(input, DEFAULT_PORT))
    }
}

impl FromStr for Target {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Serial { path, settings } => write!(f, "{path}@{}", settings.baud_rate),
            Target::Network { host, port } if host.contains(':') => write!(f, "[{host}]:{port}"),
            Target::Network { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

fn looks_like_serial_path(input: &str) -> bool {
    if input.starts_with('/') || input.starts_with(r"\\.\") {
        return true;
    }
    let upper = input.to_ascii_uppercase();
    upper
        .strip_prefix("COM")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Resolve a host and port to a `SocketAddr`.
///
/// IP literals are used directly. Hostnames go through the system resolver
/// and the first result is used.
pub fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, DeviceError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }
    if let Ok(mut addrs) = (host, port).to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }
    Err(DeviceError::NoAddressFound(host.to_string()))
}
