//! Character-level helpers used at commit time: full-width substitution for
//! ALT-modified keys and the `unicodeNNNN` raw codepoint escape.

use crate::ImeError;

const ESCAPE_WORD: &str = "unicode";

/// Spelling characters accepted into the buffer: ASCII lowercase letters
/// plus the apostrophe syllable separator.
pub fn is_spelling_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '\''
}

/// Full-width substitute for an ALT-modified key.
///
/// Printable ASCII maps onto the Halfwidth and Fullwidth Forms block, except
/// that `.` becomes the ideographic full stop. Letters have no substitute.
pub fn fullwidth_for(c: char) -> Option<char> {
    match c {
        '.' => Some('。'),
        ' ' => Some('\u{3000}'),
        c if c.is_ascii_alphabetic() => None,
        '!'..='~' => char::from_u32(c as u32 - 0x21 + 0xFF01),
        _ => None,
    }
}

/// Chinese punctuation committed for the comma and period keys.
pub fn chinese_punctuation(c: char) -> Option<&'static str> {
    match c {
        ',' => Some("，"),
        '.' => Some("。"),
        _ => None,
    }
}

/// A decoded raw-unicode escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUnicode {
    pub codepoint: char,
}

impl RawUnicode {
    /// UTF-16 code units as committed to a UTF-16 text surface: one unit in
    /// the BMP, a surrogate pair above it.
    pub fn utf16_units(&self) -> Vec<u16> {
        let mut buf = [0u16; 2];
        self.codepoint.encode_utf16(&mut buf).to_vec()
    }

    pub fn text(&self) -> String {
        self.codepoint.to_string()
    }
}

/// Decode `unicode<digits>` or `<digits>unicode`.
///
/// Digits are decimal, or hexadecimal after a `0x` prefix. Anything that is
/// not a valid non-zero scalar value is reported as malformed and the caller
/// commits the token literally.
pub fn decode_raw_unicode(token: &str) -> Result<RawUnicode, ImeError> {
    let malformed = |reason: &str| ImeError::MalformedUnicodeEscape {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    if token.len() <= ESCAPE_WORD.len() {
        return Err(malformed("too short"));
    }
    let digits = if let Some(rest) = token.strip_prefix(ESCAPE_WORD) {
        rest
    } else if let Some(rest) = token.strip_suffix(ESCAPE_WORD) {
        rest
    } else {
        return Err(malformed("no unicode marker"));
    };

    let value = match digits.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    }
    .map_err(|e| malformed(&e.to_string()))?;

    if value == 0 {
        return Err(malformed("codepoint must be positive"));
    }
    let codepoint = char::from_u32(value).ok_or_else(|| malformed("not a scalar value"))?;
    Ok(RawUnicode { codepoint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullwidth_mapping() {
        assert_eq!(fullwidth_for('1'), Some('１'));
        assert_eq!(fullwidth_for('!'), Some('！'));
        assert_eq!(fullwidth_for('~'), Some('～'));
        assert_eq!(fullwidth_for(','), Some('，'));
        assert_eq!(fullwidth_for('.'), Some('。'));
        assert_eq!(fullwidth_for(' '), Some('\u{3000}'));
        assert_eq!(fullwidth_for('a'), None);
        assert_eq!(fullwidth_for('Q'), None);
        assert_eq!(fullwidth_for('\n'), None);
    }

    #[test]
    fn hex_prefix_escape() {
        let raw = decode_raw_unicode("unicode0x4f60").unwrap();
        assert_eq!(raw.text(), "你");
        assert_eq!(raw.utf16_units(), vec![0x4F60]);
    }

    #[test]
    fn decimal_suffix_escape() {
        let raw = decode_raw_unicode("20320unicode").unwrap();
        assert_eq!(raw.codepoint, '你');
    }

    #[test]
    fn supplementary_plane_is_a_surrogate_pair() {
        let raw = decode_raw_unicode("unicode0x1F600").unwrap();
        assert_eq!(raw.utf16_units(), vec![0xD83D, 0xDE00]);
        assert_eq!(raw.text(), "😀");
    }

    #[test]
    fn malformed_escapes() {
        for token in [
            "unicode",
            "unicod",
            "unicode0xzz",
            "unicode12ab",
            "unicode0",
            "unicode0xD800",
            "unicode0x110000",
            "hello123",
        ] {
            let err = decode_raw_unicode(token).unwrap_err();
            assert!(
                matches!(err, ImeError::MalformedUnicodeEscape { .. }),
                "{token} should be malformed"
            );
        }
    }

    #[test]
    fn spelling_chars() {
        assert!(is_spelling_char('a'));
        assert!(is_spelling_char('\''));
        assert!(!is_spelling_char('A'));
        assert!(!is_spelling_char('1'));
    }
}
