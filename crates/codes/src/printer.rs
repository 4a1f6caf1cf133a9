//! Receipt printer command byte strings.
//!
//! Fixed commands are `&'static [u8]` constants. The small enums in this
//! module ([`CutMode`], [`TextStyle`], [`Underline`], [`Font`], [`Align`],
//! [`RasterScale`]) select one of those constants, so callers never build
//! formatting bytes by hand.

use crate::{CodeError, NamedCommand};

// ── Initialization ──────────────────────────────────────────────────────

/// `ESC @`: reset the device to its power-on state.
///
/// Sent exactly once by the device handle as soon as the transport is open.
pub const HW_INIT: &[u8] = b"\x1b\x40";

// ── Paper cutting ───────────────────────────────────────────────────────

/// `GS V 0`: full paper cut.
pub const PAPER_FULL_CUT: &[u8] = b"\x1d\x56\x00";
/// `GS V 1`: partial paper cut.
pub const PAPER_PART_CUT: &[u8] = b"\x1d\x56\x01";

// ── Text formatting ─────────────────────────────────────────────────────

/// `ESC ! 0`: normal text.
pub const TXT_NORMAL: &[u8] = b"\x1b\x21\x00";
/// `ESC ! 16`: double height text.
pub const TXT_2HEIGHT: &[u8] = b"\x1b\x21\x10";
/// `ESC ! 32`: double width text.
pub const TXT_2WIDTH: &[u8] = b"\x1b\x21\x20";
/// `ESC - 0`: underline off.
pub const TXT_UNDERL_OFF: &[u8] = b"\x1b\x2d\x00";
/// `ESC - 1`: 1-dot underline.
pub const TXT_UNDERL_ON: &[u8] = b"\x1b\x2d\x01";
/// `ESC - 2`: 2-dot underline.
pub const TXT_UNDERL2_ON: &[u8] = b"\x1b\x2d\x02";
/// `ESC E 0`: bold off.
pub const TXT_BOLD_OFF: &[u8] = b"\x1b\x45\x00";
/// `ESC E 1`: bold on.
pub const TXT_BOLD_ON: &[u8] = b"\x1b\x45\x01";
/// `ESC M 0`: font A.
pub const TXT_FONT_A: &[u8] = b"\x1b\x4d\x00";
/// `ESC M 1`: font B.
pub const TXT_FONT_B: &[u8] = b"\x1b\x4d\x01";
/// `ESC a 0`: left justification.
pub const TXT_ALIGN_LT: &[u8] = b"\x1b\x61\x00";
/// `ESC a 1`: centering.
pub const TXT_ALIGN_CT: &[u8] = b"\x1b\x61\x01";
/// `ESC a 2`: right justification.
pub const TXT_ALIGN_RT: &[u8] = b"\x1b\x61\x02";

// ── Status requests (real-time, DLE EOT n) ──────────────────────────────

/// `DLE EOT 1`: transmit printer status.
pub const TRANSMIT_PRINTER_STATUS: &[u8] = b"\x10\x04\x01";
/// `DLE EOT 2`: transmit offline status.
pub const TRANSMIT_OFFLINE_STATUS: &[u8] = b"\x10\x04\x02";
/// `DLE EOT 3`: transmit error status.
pub const TRANSMIT_ERROR_STATUS: &[u8] = b"\x10\x04\x03";
/// `DLE EOT 4`: transmit roll paper sensor status.
pub const TRANSMIT_PAPER_SENSOR_STATUS: &[u8] = b"\x10\x04\x04";

// ── Barcode format ──────────────────────────────────────────────────────

/// `GS H 0`: HRI characters off.
pub const BARCODE_TXT_OFF: &[u8] = b"\x1d\x48\x00";
/// `GS H 1`: HRI characters above the barcode.
pub const BARCODE_TXT_ABV: &[u8] = b"\x1d\x48\x01";
/// `GS H 2`: HRI characters below the barcode.
pub const BARCODE_TXT_BLW: &[u8] = b"\x1d\x48\x02";
/// `GS H 3`: HRI characters above and below the barcode.
pub const BARCODE_TXT_BTH: &[u8] = b"\x1d\x48\x03";
/// `GS f 0`: font A for HRI characters.
pub const BARCODE_FONT_A: &[u8] = b"\x1d\x66\x00";
/// `GS f 1`: font B for HRI characters.
pub const BARCODE_FONT_B: &[u8] = b"\x1d\x66\x01";
/// `GS h 100`: default barcode height (valid range 1–255 dots).
pub const BARCODE_HEIGHT: &[u8] = b"\x1d\x68\x64";
/// `GS w 3`: default barcode module width (valid range 2–6).
pub const BARCODE_WIDTH: &[u8] = b"\x1d\x77\x03";
/// `GS k 0`: UPC-A.
pub const BARCODE_UPC_A: &[u8] = b"\x1d\x6b\x00";
/// `GS k 1`: UPC-E.
pub const BARCODE_UPC_E: &[u8] = b"\x1d\x6b\x01";
/// `GS k 2`: EAN-13.
pub const BARCODE_EAN13: &[u8] = b"\x1d\x6b\x02";
/// `GS k 3`: EAN-8.
pub const BARCODE_EAN8: &[u8] = b"\x1d\x6b\x03";
/// `GS k 4`: CODE39.
pub const BARCODE_CODE39: &[u8] = b"\x1d\x6b\x04";
/// `GS k 5`: ITF (interleaved 2 of 5).
pub const BARCODE_ITF: &[u8] = b"\x1d\x6b\x05";
/// `GS k 6`: NW7 (Codabar).
pub const BARCODE_NW7: &[u8] = b"\x1d\x6b\x06";
/// `GS k 73`: CODE128.
pub const BARCODE_CODE128: &[u8] = b"\x1d\x6b\x49";
/// `{B`: CODE128 character set B, prefixed to the barcode data.
pub const BARCODE_CODE128_B: &[u8] = b"\x7b\x42";

// ── Raster image ────────────────────────────────────────────────────────

/// `GS v 0 0`: raster image, normal size.
pub const S_RASTER_N: &[u8] = b"\x1d\x76\x30\x00";
/// `GS v 0 1`: raster image, double width.
pub const S_RASTER_2W: &[u8] = b"\x1d\x76\x30\x01";
/// `GS v 0 2`: raster image, double height.
pub const S_RASTER_2H: &[u8] = b"\x1d\x76\x30\x02";
/// `GS v 0 3`: raster image, quadruple size.
pub const S_RASTER_Q: &[u8] = b"\x1d\x76\x30\x03";

/// Line terminator appended by the line-printing operations: `LF CR`.
pub const LINE_TERMINATOR: &[u8] = b"\n\r";

/// All fixed printer commands, by name.
pub const COMMANDS: &[NamedCommand] = &[
    cmd("hw-init", "initialize printer", HW_INIT),
    cmd("paper-full-cut", "full paper cut", PAPER_FULL_CUT),
    cmd("paper-part-cut", "partial paper cut", PAPER_PART_CUT),
    cmd("txt-normal", "normal text", TXT_NORMAL),
    cmd("txt-2height", "double height text", TXT_2HEIGHT),
    cmd("txt-2width", "double width text", TXT_2WIDTH),
    cmd("txt-underl-off", "underline off", TXT_UNDERL_OFF),
    cmd("txt-underl-on", "1-dot underline", TXT_UNDERL_ON),
    cmd("txt-underl2-on", "2-dot underline", TXT_UNDERL2_ON),
    cmd("txt-bold-off", "bold off", TXT_BOLD_OFF),
    cmd("txt-bold-on", "bold on", TXT_BOLD_ON),
    cmd("txt-font-a", "font A", TXT_FONT_A),
    cmd("txt-font-b", "font B", TXT_FONT_B),
    cmd("txt-align-left", "left justification", TXT_ALIGN_LT),
    cmd("txt-align-center", "centering", TXT_ALIGN_CT),
    cmd("txt-align-right", "right justification", TXT_ALIGN_RT),
    cmd("status-printer", "transmit printer status", TRANSMIT_PRINTER_STATUS),
    cmd("status-offline", "transmit offline status", TRANSMIT_OFFLINE_STATUS),
    cmd("status-error", "transmit error status", TRANSMIT_ERROR_STATUS),
    cmd(
        "status-paper",
        "transmit roll paper sensor status",
        TRANSMIT_PAPER_SENSOR_STATUS,
    ),
    cmd("barcode-txt-off", "HRI characters off", BARCODE_TXT_OFF),
    cmd("barcode-txt-above", "HRI characters above", BARCODE_TXT_ABV),
    cmd("barcode-txt-below", "HRI characters below", BARCODE_TXT_BLW),
    cmd("barcode-txt-both", "HRI characters above and below", BARCODE_TXT_BTH),
    cmd("barcode-font-a", "HRI font A", BARCODE_FONT_A),
    cmd("barcode-font-b", "HRI font B", BARCODE_FONT_B),
    cmd("barcode-height", "barcode height 100 dots", BARCODE_HEIGHT),
    cmd("barcode-width", "barcode module width 3", BARCODE_WIDTH),
    cmd("barcode-upc-a", "barcode type UPC-A", BARCODE_UPC_A),
    cmd("barcode-upc-e", "barcode type UPC-E", BARCODE_UPC_E),
    cmd("barcode-ean13", "barcode type EAN-13", BARCODE_EAN13),
    cmd("barcode-ean8", "barcode type EAN-8", BARCODE_EAN8),
    cmd("barcode-code39", "barcode type CODE39", BARCODE_CODE39),
    cmd("barcode-itf", "barcode type ITF", BARCODE_ITF),
    cmd("barcode-nw7", "barcode type NW7", BARCODE_NW7),
    cmd("barcode-code128", "barcode type CODE128", BARCODE_CODE128),
    cmd("barcode-code128-b", "CODE128 character set B", BARCODE_CODE128_B),
    cmd("raster-normal", "raster image normal size", S_RASTER_N),
    cmd("raster-2width", "raster image double width", S_RASTER_2W),
    cmd("raster-2height", "raster image double height", S_RASTER_2H),
    cmd("raster-quad", "raster image quadruple", S_RASTER_Q),
];

const fn cmd(name: &'static str, description: &'static str, bytes: &'static [u8]) -> NamedCommand {
    NamedCommand {
        name,
        description,
        bytes,
    }
}

// ── Selectors ───────────────────────────────────────────────────────────

/// Paper cut mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CutMode {
    /// Cut all the way through the paper.
    Full,
    /// Leave one point uncut.
    Partial,
}

impl CutMode {
    /// The command bytes for this cut mode.
    pub fn command(self) -> &'static [u8] {
        match self {
            CutMode::Full => PAPER_FULL_CUT,
            CutMode::Partial => PAPER_PART_CUT,
        }
    }
}

/// Print mode selected with `ESC !`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextStyle {
    /// Single width, single height.
    Normal,
    /// Double height.
    DoubleHeight,
    /// Double width.
    DoubleWidth,
}

impl TextStyle {
    /// The command bytes for this print mode.
    pub fn command(self) -> &'static [u8] {
        match self {
            TextStyle::Normal => TXT_NORMAL,
            TextStyle::DoubleHeight => TXT_2HEIGHT,
            TextStyle::DoubleWidth => TXT_2WIDTH,
        }
    }
}

/// Underline thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Underline {
    /// No underline.
    Off,
    /// 1-dot underline.
    Single,
    /// 2-dot underline.
    Double,
}

impl Underline {
    /// The command bytes for this underline mode.
    pub fn command(self) -> &'static [u8] {
        match self {
            Underline::Off => TXT_UNDERL_OFF,
            Underline::Single => TXT_UNDERL_ON,
            Underline::Double => TXT_UNDERL2_ON,
        }
    }
}

/// Character font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Font {
    /// Font A (12×24 on most devices).
    A,
    /// Font B (9×17 on most devices).
    B,
}

impl Font {
    /// The command bytes selecting this font.
    pub fn command(self) -> &'static [u8] {
        match self {
            Font::A => TXT_FONT_A,
            Font::B => TXT_FONT_B,
        }
    }
}

/// Line justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Align {
    /// Left justification.
    Left,
    /// Centered.
    Center,
    /// Right justification.
    Right,
}

impl Align {
    /// The command bytes selecting this justification.
    pub fn command(self) -> &'static [u8] {
        match self {
            Align::Left => TXT_ALIGN_LT,
            Align::Center => TXT_ALIGN_CT,
            Align::Right => TXT_ALIGN_RT,
        }
    }
}

/// Raster image scaling for `GS v 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RasterScale {
    /// 1×1.
    Normal,
    /// 2× horizontally.
    DoubleWidth,
    /// 2× vertically.
    DoubleHeight,
    /// 2× in both directions.
    Quadruple,
}

impl RasterScale {
    /// The command prefix for this raster scale.
    ///
    /// The caller appends the `xL xH yL yH` size bytes and the bitmap data.
    pub fn command(self) -> &'static [u8] {
        match self {
            RasterScale::Normal => S_RASTER_N,
            RasterScale::DoubleWidth => S_RASTER_2W,
            RasterScale::DoubleHeight => S_RASTER_2H,
            RasterScale::Quadruple => S_RASTER_Q,
        }
    }

    /// Build a complete `GS v 0` image: prefix, `xL xH yL yH`, bitmap.
    ///
    /// `data` is row-major, `width_bytes` bytes per row (8 dots per byte,
    /// MSB leftmost), `height_dots` rows.
    pub fn image_command(
        self,
        width_bytes: u16,
        height_dots: u16,
        data: &[u8],
    ) -> Result<Vec<u8>, CodeError> {
        let expected = usize::from(width_bytes) * usize::from(height_dots);
        if data.len() != expected {
            return Err(CodeError::RasterSize {
                expected,
                actual: data.len(),
            });
        }
        let prefix = self.command();
        let mut out = Vec::with_capacity(prefix.len() + 4 + data.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(&width_bytes.to_le_bytes());
        out.extend_from_slice(&height_dots.to_le_bytes());
        out.extend_from_slice(data);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_image_carries_little_endian_size() {
        let cmd = RasterScale::DoubleWidth
            .image_command(0x0102, 1, &vec![0xff; 0x0102])
            .unwrap();
        assert_eq!(&cmd[..8], b"\x1d\x76\x30\x01\x02\x01\x01\x00");
        assert_eq!(cmd.len(), 8 + 0x0102);
        assert_eq!(
            RasterScale::Normal.image_command(2, 2, &[0; 3]),
            Err(CodeError::RasterSize {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn cut_commands() {
        assert_eq!(CutMode::Full.command(), [0x1d, 0x56, 0x00]);
        assert_eq!(CutMode::Partial.command(), [0x1d, 0x56, 0x01]);
    }

    #[test]
    fn status_requests_share_dle_eot_prefix() {
        for cmd in [
            TRANSMIT_PRINTER_STATUS,
            TRANSMIT_OFFLINE_STATUS,
            TRANSMIT_ERROR_STATUS,
            TRANSMIT_PAPER_SENSOR_STATUS,
        ] {
            assert_eq!(&cmd[..2], [crate::control::DLE, crate::control::EOT]);
        }
    }

    #[test]
    fn selectors_differ_only_in_parameter_byte() {
        let underline: Vec<_> = [Underline::Off, Underline::Single, Underline::Double]
            .iter()
            .map(|u| u.command())
            .collect();
        for (n, bytes) in underline.iter().enumerate() {
            assert_eq!(&bytes[..2], b"\x1b\x2d");
            assert_eq!(bytes[2], n as u8);
        }
        assert_eq!(Align::Center.command(), b"\x1b\x61\x01");
        assert_eq!(Font::B.command(), b"\x1b\x4d\x01");
        assert_eq!(TextStyle::DoubleWidth.command(), b"\x1b\x21\x20");
        assert_eq!(RasterScale::Quadruple.command(), b"\x1d\x76\x30\x03");
    }

    #[test]
    fn line_terminator_is_lf_then_cr() {
        assert_eq!(LINE_TERMINATOR, [crate::control::LF, crate::control::CR]);
    }
}
