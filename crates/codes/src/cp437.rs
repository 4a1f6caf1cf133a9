//! Unicode → Code Page 437 text encoding.
//!
//! Most ESC/POS printers and customer displays power up in CP437. ASCII
//! passes through unchanged, the upper half is looked up in [`CP437_HIGH`],
//! and anything else is transliterated to a close ASCII spelling where one
//! is known (`€` → `EUR`, `“` → `"`, `Ã` → `A`). Characters with no mapping
//! are dropped. Encoding never fails.

/// Converts outbound text to the device's 8-bit code page.
///
/// Implementations must be total: unmappable characters are substituted or
/// dropped, never reported as an error.
pub trait TextEncoder: Send {
    /// Encode `text` for transmission.
    fn encode(&self, text: &str) -> Vec<u8>;
}

/// The built-in CP437 encoder with transliteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cp437;

impl TextEncoder for Cp437 {
    fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut dropped = 0usize;
        for ch in text.chars() {
            if ch.is_ascii() {
                out.push(ch as u8);
            } else if let Some(byte) = to_cp437(ch) {
                out.push(byte);
            } else if let Some(ascii) = transliterate(ch) {
                out.extend_from_slice(ascii.as_bytes());
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("cp437: dropped {dropped} unmappable character(s)");
        }
        out
    }
}

/// Unicode code points for CP437 bytes `0x80..=0xFF`, indexed by `byte - 0x80`.
const CP437_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

fn to_cp437(ch: char) -> Option<u8> {
    CP437_HIGH
        .iter()
        .position(|&c| c == ch)
        .map(|i| 0x80 + i as u8)
}

/// ASCII approximations for common characters outside CP437.
fn transliterate(ch: char) -> Option<&'static str> {
    let s = match ch {
        'À' | 'Á' | 'Â' | 'Ã' => "A",
        'ã' => "a",
        'È' | 'Ê' | 'Ë' => "E",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' => "O",
        'õ' | 'ø' => "o",
        'Ù' | 'Ú' | 'Û' => "U",
        'Ý' | 'Ÿ' => "Y",
        'ý' => "y",
        'Š' => "S",
        'š' => "s",
        'Ž' => "Z",
        'ž' => "z",
        'Č' | 'Ć' => "C",
        'č' | 'ć' => "c",
        'Ł' => "L",
        'ł' => "l",
        'Œ' => "OE",
        'œ' => "oe",
        '‘' | '’' | '‚' | '′' => "'",
        '“' | '”' | '„' | '″' => "\"",
        '–' | '—' | '‐' | '−' => "-",
        '…' => "...",
        '•' => "*",
        '€' => "EUR",
        '©' => "(C)",
        '®' => "(R)",
        '™' => "TM",
        '×' => "x",
        '\u{2009}' | '\u{202F}' | '\u{2002}' | '\u{2003}' => " ",
        _ => return None,
    };
    Some(s)
}
