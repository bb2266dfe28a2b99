//! MIME classification from a short byte prefix.

use std::io::{Read, Seek, SeekFrom};

use crate::errors::TransferError;

const SNIFF_LEN: usize = 512;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Classifies the MIME type of `reader` from its first bytes, then rewinds
/// the cursor to the start so the content can be re-read for upload.
pub fn detect_content_type<R: Read + Seek>(reader: &mut R) -> Result<String, TransferError> {
    let mut buf = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < SNIFF_LEN {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let content_type = classify(&buf[..filled]);
    reader.seek(SeekFrom::Start(0))?;
    Ok(content_type)
}

fn classify(data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    if looks_like_text(data) {
        PLAIN_TEXT.to_string()
    } else {
        OCTET_STREAM.to_string()
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        // A multi-byte sequence cut off at the sniff boundary is still text.
        Err(err) if err.error_len().is_none() => {
            std::str::from_utf8(&data[..err.valid_up_to()]).unwrap_or("")
        }
        Err(_) => return false,
    };
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
}
