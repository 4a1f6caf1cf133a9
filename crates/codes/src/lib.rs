//! ESC/POS command tables for receipt printers and customer displays.
//!
//! Everything in this crate is static data or a pure function: control
//! characters, compound command byte strings, status codes, text centering,
//! and the Unicode → CP437 encoder. Nothing here touches a device; see
//! `escpos_link_client` for transports and the device handle.
mod barcode;
mod center;
pub mod control;
mod cp437;
mod error;
pub mod printer;
mod status;
pub mod vfd;

pub use barcode::{BarcodeSetup, HriFont, HriPosition, Symbology};
pub use center::{DISPLAY_LINE_WIDTH, PRINTER_LINE_WIDTH, center_text};
pub use cp437::{Cp437, TextEncoder};
pub use error::CodeError;
pub use status::{PAPER_STATUS_CODES, PaperStatus, StatusRequest};

/// A named command byte string, as listed in the lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedCommand {
    /// Kebab-case name used for lookup (e.g. `paper-full-cut`).
    pub name: &'static str,
    /// Short human-readable description.
    pub description: &'static str,
    /// Exact bytes sent to the device.
    pub bytes: &'static [u8],
}

/// Look up a printer or display command by its kebab-case name.
///
/// Matching ignores ASCII case and treats `_` like `-`, so `TXT_BOLD_ON`
/// finds `txt-bold-on`. Printer commands are searched first, then display
/// commands.
pub fn find_command(name: &str) -> Option<&'static NamedCommand> {
    printer::COMMANDS
        .iter()
        .chain(vfd::COMMANDS.iter())
        .find(|c| same_name(c.name, name))
}

fn same_name(canonical: &str, given: &str) -> bool {
    let fold = |b: u8| if b == b'_' { b'-' } else { b.to_ascii_lowercase() };
    canonical.len() == given.len()
        && canonical
            .bytes()
            .zip(given.bytes())
            .all(|(a, b)| fold(a) == fold(b))
}
