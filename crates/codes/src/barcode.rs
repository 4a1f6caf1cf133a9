//! Barcode configuration and print commands.
//!
//! Only the command bytes are produced here; the printer renders the symbol.

use crate::CodeError;
use crate::control::{GS, NUL};
use crate::printer;
use crate::vfd::check_range;

/// Barcode symbologies selectable with `GS k m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Symbology {
    /// UPC-A (11 or 12 digits).
    UpcA,
    /// UPC-E (6 to 8, 11 or 12 digits).
    UpcE,
    /// EAN-13 / JAN-13 (12 or 13 digits).
    Ean13,
    /// EAN-8 / JAN-8 (7 or 8 digits).
    Ean8,
    /// CODE39.
    Code39,
    /// Interleaved 2 of 5 (even number of digits).
    Itf,
    /// NW7 / Codabar.
    Nw7,
    /// CODE128, sent in character set B.
    Code128,
}

impl Symbology {
    /// All symbologies, in `GS k` selector order.
    pub const ALL: [Symbology; 8] = [
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code39,
        Symbology::Itf,
        Symbology::Nw7,
        Symbology::Code128,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::Code39 => "CODE39",
            Symbology::Itf => "ITF",
            Symbology::Nw7 => "NW7",
            Symbology::Code128 => "CODE128",
        }
    }

    /// The `GS k m` selector prefix for this symbology.
    pub fn select(self) -> &'static [u8] {
        match self {
            Symbology::UpcA => printer::BARCODE_UPC_A,
            Symbology::UpcE => printer::BARCODE_UPC_E,
            Symbology::Ean13 => printer::BARCODE_EAN13,
            Symbology::Ean8 => printer::BARCODE_EAN8,
            Symbology::Code39 => printer::BARCODE_CODE39,
            Symbology::Itf => printer::BARCODE_ITF,
            Symbology::Nw7 => printer::BARCODE_NW7,
            Symbology::Code128 => printer::BARCODE_CODE128,
        }
    }

    /// Build the complete print command for `data`.
    ///
    /// The six numeric/alphanumeric symbologies use the NUL-terminated form
    /// (`GS k m d1..dk NUL`). CODE128 uses the length-prefixed form with the
    /// character set B prefix (`GS k 73 n {B d1..dk`).
    pub fn print_command(self, data: &str) -> Result<Vec<u8>, CodeError> {
        self.check_data(data)?;
        let select = self.select();
        let mut out = Vec::with_capacity(select.len() + data.len() + 3);
        out.extend_from_slice(select);
        if self == Symbology::Code128 {
            let n = data.len() + printer::BARCODE_CODE128_B.len();
            let n = u8::try_from(n).map_err(|_| self.invalid("data longer than 253 bytes"))?;
            out.push(n);
            out.extend_from_slice(printer::BARCODE_CODE128_B);
            out.extend_from_slice(data.as_bytes());
        } else {
            out.extend_from_slice(data.as_bytes());
            out.push(NUL);
        }
        Ok(out)
    }

    fn check_data(self, data: &str) -> Result<(), CodeError> {
        if data.is_empty() {
            return Err(self.invalid("data is empty"));
        }
        if !data.is_ascii() || data.bytes().any(|b| b == NUL) {
            return Err(self.invalid("data must be printable ASCII"));
        }
        let digits = data.bytes().all(|b| b.is_ascii_digit());
        let len = data.len();
        match self {
            Symbology::UpcA if !digits || !(11..=12).contains(&len) => {
                Err(self.invalid("expected 11 or 12 digits"))
            }
            Symbology::UpcE if !digits || !matches!(len, 6..=8 | 11 | 12) => {
                Err(self.invalid("expected 6-8, 11 or 12 digits"))
            }
            Symbology::Ean13 if !digits || !(12..=13).contains(&len) => {
                Err(self.invalid("expected 12 or 13 digits"))
            }
            Symbology::Ean8 if !digits || !(7..=8).contains(&len) => {
                Err(self.invalid("expected 7 or 8 digits"))
            }
            Symbology::Itf if !digits || len % 2 != 0 => {
                Err(self.invalid("expected an even number of digits"))
            }
            Symbology::Code39
                if !data
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b" $%+-./*".contains(&b)) =>
            {
                Err(self.invalid("unsupported CODE39 character"))
            }
            _ => Ok(()),
        }
    }

    fn invalid(self, details: &str) -> CodeError {
        CodeError::InvalidBarcodeData {
            symbology: self.name(),
            details: details.to_string(),
        }
    }
}

/// Position of the human-readable interpretation (HRI) text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HriPosition {
    /// No HRI text.
    Off,
    /// Above the symbol.
    Above,
    /// Below the symbol.
    #[default]
    Below,
    /// Above and below the symbol.
    Both,
}

impl HriPosition {
    /// The `GS H n` command for this position.
    pub fn command(self) -> &'static [u8] {
        match self {
            HriPosition::Off => printer::BARCODE_TXT_OFF,
            HriPosition::Above => printer::BARCODE_TXT_ABV,
            HriPosition::Below => printer::BARCODE_TXT_BLW,
            HriPosition::Both => printer::BARCODE_TXT_BTH,
        }
    }
}

/// Font used for the HRI text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HriFont {
    /// Font A.
    #[default]
    A,
    /// Font B.
    B,
}

impl HriFont {
    /// The `GS f n` command for this font.
    pub fn command(self) -> &'static [u8] {
        match self {
            HriFont::A => printer::BARCODE_FONT_A,
            HriFont::B => printer::BARCODE_FONT_B,
        }
    }
}

/// Barcode appearance settings sent before a barcode print command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarcodeSetup {
    /// HRI text position.
    pub hri: HriPosition,
    /// HRI text font.
    pub font: HriFont,
    /// Symbol height in dots (1–255).
    pub height: u8,
    /// Module width (2–6).
    pub width: u8,
}

impl Default for BarcodeSetup {
    fn default() -> Self {
        Self {
            hri: HriPosition::Below,
            font: HriFont::A,
            height: printer::BARCODE_HEIGHT[2],
            width: printer::BARCODE_WIDTH[2],
        }
    }
}

impl BarcodeSetup {
    /// Encode as `GS H n`, `GS f n`, `GS h n`, `GS w n`, in that order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodeError> {
        check_range("barcode height", self.height, 1, 255)?;
        check_range("barcode width", self.width, 2, 6)?;
        let mut out = Vec::with_capacity(12);
        out.extend_from_slice(self.hri.command());
        out.extend_from_slice(self.font.command());
        out.extend_from_slice(&[GS, b'h', self.height]);
        out.extend_from_slice(&[GS, b'w', self.width]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_setup_matches_table_defaults() {
        let bytes = BarcodeSetup::default().to_bytes().unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(printer::BARCODE_TXT_BLW);
        expected.extend_from_slice(printer::BARCODE_FONT_A);
        expected.extend_from_slice(printer::BARCODE_HEIGHT);
        expected.extend_from_slice(printer::BARCODE_WIDTH);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn setup_rejects_bad_width_and_height() {
        let setup = BarcodeSetup {
            width: 7,
            ..BarcodeSetup::default()
        };
        assert!(matches!(
            setup.to_bytes(),
            Err(CodeError::OutOfRange { param: "barcode width", .. })
        ));
        let setup = BarcodeSetup {
            height: 0,
            ..BarcodeSetup::default()
        };
        assert!(setup.to_bytes().is_err());
    }

    #[test]
    fn ean13_is_nul_terminated() {
        let bytes = Symbology::Ean13.print_command("400638133393").unwrap();
        assert_eq!(&bytes[..3], b"\x1d\x6b\x02");
        assert_eq!(&bytes[3..15], b"400638133393");
        assert_eq!(bytes.last(), Some(&0x00));
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn code128_is_length_prefixed_with_set_b() {
        let bytes = Symbology::Code128.print_command("Ab-12").unwrap();
        assert_eq!(bytes, b"\x1d\x6b\x49\x07{BAb-12");
    }

    #[test]
    fn numeric_symbologies_reject_letters() {
        assert!(Symbology::UpcA.print_command("12345678901X").is_err());
        assert!(Symbology::Itf.print_command("123").is_err());
        assert!(Symbology::Ean8.print_command("1234567").is_ok());
    }

    #[test]
    fn code39_character_set() {
        assert!(Symbology::Code39.print_command("ABC-123").is_ok());
        assert!(Symbology::Code39.print_command("abc").is_err());
    }

    #[test]
    fn empty_data_is_rejected() {
        for sym in Symbology::ALL {
            assert!(sym.print_command("").is_err(), "{} accepted empty data", sym.name());
        }
    }

    #[test]
    fn selectors_follow_gs_k_order() {
        for (sym, expected) in Symbology::ALL.iter().zip([0u8, 1, 2, 3, 4, 5, 6, 73]) {
            assert_eq!(sym.select(), [0x1d, 0x6b, expected]);
        }
    }
}
