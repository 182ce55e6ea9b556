/// Audio payload with filename and content type in the shape the
/// transcription service expects. The bytes are never modified, only the
/// metadata around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    pub fn normalized(filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        let (filename, content_type) = normalize_metadata(filename, content_type);
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Rewrites voice-note metadata to what the transcription service accepts.
///
/// WhatsApp delivers voice messages as `.opus` files, but the codec is
/// wrapped in an Ogg container and the service rejects the bare `.opus`
/// suffix. Suffix match is case-insensitive; all other names pass through
/// untouched. Only the name and declared type are inspected, never the
/// bytes.
pub fn normalize_metadata(filename: &str, content_type: &str) -> (String, String) {
    match strip_suffix_ignore_case(filename, ".opus") {
        Some(stem) => (format!("{stem}.ogg"), "audio/ogg".to_string()),
        None => (filename.to_string(), content_type.to_string()),
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
        Some(&name[..split])
    } else {
        None
    }
}
