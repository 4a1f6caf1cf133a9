//! Real-time status requests and the roll paper status codes.

use crate::printer;

/// The four `DLE EOT n` real-time status requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusRequest {
    /// `DLE EOT 1`: printer status.
    Printer,
    /// `DLE EOT 2`: offline cause.
    Offline,
    /// `DLE EOT 3`: error cause.
    Error,
    /// `DLE EOT 4`: roll paper sensor.
    PaperSensor,
}

impl StatusRequest {
    /// The command bytes for this request.
    pub fn command(self) -> &'static [u8] {
        match self {
            StatusRequest::Printer => printer::TRANSMIT_PRINTER_STATUS,
            StatusRequest::Offline => printer::TRANSMIT_OFFLINE_STATUS,
            StatusRequest::Error => printer::TRANSMIT_ERROR_STATUS,
            StatusRequest::PaperSensor => printer::TRANSMIT_PAPER_SENSOR_STATUS,
        }
    }
}

/// Known replies to the roll paper sensor request, as hex strings.
///
/// The codes are compared against the hex rendering of the reply byte;
/// leading zeros are not significant (`"0"` and `"00"` are the same code).
pub const PAPER_STATUS_CODES: &[(&str, &str)] = &[("error", "0"), ("ok", "12"), ("no_paper", "1e")];

/// Decoded roll paper sensor status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaperStatus {
    /// Paper present (`0x12`).
    Ok,
    /// Paper end detected (`0x1e`).
    NoPaper,
    /// The device reported an error (`0x00`).
    Error,
    /// Any other reply byte.
    Unknown(u8),
}

impl PaperStatus {
    /// Decode a single reply byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x12 => PaperStatus::Ok,
            0x1e => PaperStatus::NoPaper,
            0x00 => PaperStatus::Error,
            other => PaperStatus::Unknown(other),
        }
    }

    /// Decode a hex status code such as `"12"`, `"1e"` or `"0"`.
    ///
    /// Returns `None` if `code` is not one or two hex digits.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() || code.len() > 2 {
            return None;
        }
        u8::from_str_radix(code, 16).ok().map(Self::from_byte)
    }

    /// Decode the first byte of a raw reply chunk.
    pub fn from_reply(reply: &[u8]) -> Option<Self> {
        reply.first().copied().map(Self::from_byte)
    }

    /// Name as used in [`PAPER_STATUS_CODES`], or `"unknown"`.
    pub fn name(self) -> &'static str {
        match self {
            PaperStatus::Ok => "ok",
            PaperStatus::NoPaper => "no_paper",
            PaperStatus::Error => "error",
            PaperStatus::Unknown(_) => "unknown",
        }
    }
}
