//! Configuration types for the device client.

use std::time::Duration;

/// Complete device configuration: timeouts + inbound reader settings.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Transport timeout settings.
    pub timeouts: DeviceTimeouts,
    /// Log every outbound write and inbound chunk as hex at `trace` level.
    pub trace_io: bool,
    /// Size of the inbound read buffer; one read is one data event.
    pub read_chunk_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeouts: DeviceTimeouts::default(),
            trace_io: false,
            read_chunk_size: 256,
        }
    }
}

impl DeviceConfig {
    /// Check invariants that the transports rely on.
    pub fn validate(&self) -> Result<(), crate::DeviceError> {
        if self.read_chunk_size == 0 {
            return Err(crate::DeviceError::InvalidConfig(
                "read_chunk_size must be >= 1".into(),
            ));
        }
        if self.timeouts.poll.is_zero() {
            return Err(crate::DeviceError::InvalidConfig(
                "poll timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Timeout settings for device connections.
///
/// Defaults are tuned for LAN and USB-serial receipt hardware:
/// - `connect`: 5s
/// - `write`: 30s (raster images can be large at 9600 baud)
/// - `status`: 2s (real-time status replies are immediate when the device is alive)
/// - `poll`: 100ms (how often the inbound reader checks for shutdown)
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DeviceTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
    /// Maximum time the blocking status helpers wait for a reply.
    pub status: Duration,
    /// Read timeout of the inbound reader between shutdown checks.
    pub poll: Duration,
}

impl Default for DeviceTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
            status: Duration::from_secs(2),
            poll: Duration::from_millis(100),
        }
    }
}

/// Default baud rate for ESC/POS serial devices (9600 8N1).
pub const DEFAULT_BAUD: u32 = 9600;

/// Serial line settings.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialSettings {
    /// Baud rate.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: SerialDataBits,
    /// Parity checking.
    pub parity: SerialParity,
    /// Stop bits.
    pub stop_bits: SerialStopBits,
    /// Flow control.
    pub flow_control: SerialFlowControl,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD,
            data_bits: SerialDataBits::Eight,
            parity: SerialParity::None,
            stop_bits: SerialStopBits::One,
            flow_control: SerialFlowControl::None,
        }
    }
}

impl SerialSettings {
    /// Default 8N1 settings at the given baud rate.
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Number of data bits per serial character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SerialDataBits {
    /// 5 bits.
    Five,
    /// 6 bits.
    Six,
    /// 7 bits.
    Seven,
    /// 8 bits.
    Eight,
}

/// Serial parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SerialParity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Number of serial stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SerialStopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Serial flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SerialFlowControl {
    /// No flow control.
    None,
    /// XON/XOFF.
    Software,
    /// RTS/CTS.
    Hardware,
}
