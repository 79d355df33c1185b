//! MIME type detection for uploaded media.

/// Guess a MIME type by inspecting magic numbers.
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|kind| kind.mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_png_magic_numbers() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(
            guess_mime_from_bytes(&png_header).as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn unknown_bytes_yield_none() {
        assert_eq!(guess_mime_from_bytes(&[0x00, 0x01]), None);
    }
}
