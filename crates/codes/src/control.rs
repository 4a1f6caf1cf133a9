//! Raw ASCII control characters used by ESC/POS devices.

/// Null.
pub const NUL: u8 = 0x00;
/// End of transmission. Second byte of the `DLE EOT n` status requests.
pub const EOT: u8 = 0x04;
/// Enquiry.
pub const ENQ: u8 = 0x05;
/// Horizontal tab. On a VFD this moves the cursor one column right.
pub const HT: u8 = 0x09;
/// Line feed.
pub const LF: u8 = 0x0A;
/// Form feed. On a VFD this clears the screen.
pub const FF: u8 = 0x0C;
/// Carriage return.
pub const CR: u8 = 0x0D;
/// Data link escape. Prefix of the real-time status requests.
pub const DLE: u8 = 0x10;
/// Device control 4.
pub const DC4: u8 = 0x14;
/// Cancel. On a VFD this clears the cursor line.
pub const CAN: u8 = 0x18;
/// Escape. Prefix of most printer commands.
pub const ESC: u8 = 0x1B;
/// File separator.
pub const FS: u8 = 0x1C;
/// Group separator. Prefix of cut, barcode and raster commands.
pub const GS: u8 = 0x1D;

/// Every control character with its mnemonic, in byte order.
pub const TABLE: &[(&str, u8)] = &[
    ("NUL", NUL),
    ("EOT", EOT),
    ("ENQ", ENQ),
    ("HT", HT),
    ("LF", LF),
    ("FF", FF),
    ("CR", CR),
    ("DLE", DLE),
    ("DC4", DC4),
    ("CAN", CAN),
    ("ESC", ESC),
    ("FS", FS),
    ("GS", GS),
];

/// Return the mnemonic for a control byte, if it is one of [`TABLE`].
pub fn mnemonic(byte: u8) -> Option<&'static str> {
    TABLE.iter().find(|(_, b)| *b == byte).map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_by_byte() {
        assert!(TABLE.windows(2).all(|w| w[0].1 < w[1].1));
    }

    #[test]
    fn mnemonic_lookup() {
        assert_eq!(mnemonic(0x1B), Some("ESC"));
        assert_eq!(mnemonic(0x1D), Some("GS"));
        assert_eq!(mnemonic(b'A'), None);
    }
}
