use std::fs;
use std::io;
use std::path::Path;

/// Reads a base document as UTF-8 text with universal newlines
///
/// `\r\n` and lone `\r` both become `\n`, so a document hashes the same whichever line endings
/// it was saved with.
pub fn read_document<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(normalize_newlines(&text))
}

pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
