//! Fixed-width line centering.

/// Column width of a two-line customer display.
pub const DISPLAY_LINE_WIDTH: usize = 20;
/// Default column width used by `print_centered`.
pub const PRINTER_LINE_WIDTH: usize = 40;

/// Center `text` in a line of `width` columns by prepending spaces.
///
/// If the text is shorter than `width - 2` characters it is left-padded with
/// `(width - len) / 2` spaces (rounded down); no padding is added on the
/// right. Longer text is returned unchanged, never truncated. Length is
/// counted in `char`s.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len + 2 < width {
        let pad = (width - len) / 2;
        let mut out = String::with_capacity(pad + text.len());
        out.extend(std::iter::repeat_n(' ', pad));
        out.push_str(text);
        out
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_text() {
        assert_eq!(center_text("ab", 10), "    ab");
    }

    #[test]
    fn odd_remainder_rounds_down() {
        // (20 - 5) / 2 = 7.5 -> 7
        let out = center_text("hello", DISPLAY_LINE_WIDTH);
        assert_eq!(out, format!("{}hello", " ".repeat(7)));
    }

    #[test]
    fn padded_length_and_suffix_hold_for_all_short_lengths() {
        for width in [3usize, 10, 20, 40, 41] {
            for len in 0..width.saturating_sub(2) {
                let text: String = "x".repeat(len);
                let out = center_text(&text, width);
                assert_eq!(out.chars().count(), (width - len) / 2 + len);
                assert!(out.ends_with(&text));
            }
        }
    }

    #[test]
    fn text_at_or_over_threshold_is_unchanged() {
        for width in [2usize, 10, 20, 40] {
            for len in width.saturating_sub(2)..width + 5 {
                let text: String = "y".repeat(len);
                assert_eq!(center_text(&text, width), text);
            }
        }
    }

    #[test]
    fn tiny_widths_do_not_underflow() {
        assert_eq!(center_text("", 0), "");
        assert_eq!(center_text("", 1), "");
        assert_eq!(center_text("", 2), "");
        assert_eq!(center_text("", 3), " ");
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(center_text("café", 10), "   café");
    }
}
