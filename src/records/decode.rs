use std::borrow::Cow;

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Decode sheet bytes to text.
///
/// A byte-order mark selects UTF-8, UTF-16LE or UTF-16BE and is stripped.
/// Without one, UTF-8 is tried first and Windows-1252 (Excel exports) is the fallback.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            log::debug!("Replaced invalid {} sequences", encoding.name());
        }
        return text;
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFlang,engine";
        assert_eq!(decode_text(bytes), "lang,engine");
    }

    #[test]
    fn utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "lang,é".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes), "lang,é");
    }

    #[test]
    fn utf16be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "voice".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&bytes), "voice");
    }

    #[test]
    fn plain_utf8_passes_through() {
        assert_eq!(decode_text("Zoë,ja-JP".as_bytes()), "Zoë,ja-JP");
    }

    #[test]
    fn windows_1252_fallback() {
        // "Zoë" with 0xEB for ë
        assert_eq!(decode_text(b"Zo\xEB"), "Zoë");
    }
}
