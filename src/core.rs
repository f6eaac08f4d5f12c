use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use markup5ever_rcdom::RcDom;

use crate::env::{core::NoColor, EnvVar};
use crate::parsers::html::{
    find_elements, get_node_attr, get_node_name, html_to_dom, serialize_document,
};
use crate::translation::{LanguageChange, TranslationCoordinator};

/// Represents errors that can occur while reading, translating or writing a
/// flipbook document
///
/// Translation itself never fails; only document I/O and parsing end up here.
#[derive(Debug)]
pub struct FlipbookError {
    details: String,
}

impl FlipbookError {
    /// Creates a new FlipbookError with the given message
    pub fn new(msg: &str) -> FlipbookError {
        FlipbookError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for FlipbookError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for FlipbookError {}

impl From<io::Error> for FlipbookError {
    fn from(error: io::Error) -> Self {
        FlipbookError::new(&error.to_string())
    }
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";
const DEFAULT_ENCODING: &str = "utf-8";

/// Reads a document from a file path, or from stdin when `target` is `-`
pub fn read_document(target: &str) -> Result<Vec<u8>, FlipbookError> {
    if target == "-" {
        let mut data = Vec::new();
        io::stdin()
            .read_to_end(&mut data)
            .map_err(|e| FlipbookError::new(&format!("Failed to read stdin: {e}")))?;
        return Ok(data);
    }

    let path = Path::new(target);
    if !path.exists() {
        return Err(FlipbookError::new(&format!("File not found: {target}")));
    }

    fs::read(path).map_err(|e| FlipbookError::new(&format!("Failed to read file: {e}")))
}

/// Writes a document to a file path, or to stdout when `destination` is `-`
pub fn write_document(destination: &str, data: &[u8]) -> Result<(), FlipbookError> {
    if destination == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
        return Ok(());
    }

    fs::write(destination, data)
        .map_err(|e| FlipbookError::new(&format!("Failed to write {destination}: {e}")))
}

/// Finds the charset declared by a `<meta>` element, if any
pub fn detect_charset(data: &[u8]) -> Option<String> {
    let dom = html_to_dom(data, DEFAULT_ENCODING).ok()?;

    find_elements(&dom.document, |node| get_node_name(node) == Some("meta"))
        .into_iter()
        .find_map(|meta| {
            if let Some(charset) = get_node_attr(&meta, "charset") {
                return Some(charset.trim().to_string());
            }

            let is_content_type = get_node_attr(&meta, "http-equiv")
                .is_some_and(|value| value.eq_ignore_ascii_case("content-type"));
            if !is_content_type {
                return None;
            }

            get_node_attr(&meta, "content").and_then(|content| {
                content
                    .split(';')
                    .filter_map(|part| part.trim().split_once('='))
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
                    .map(|(_, value)| value.trim().to_string())
            })
        })
        .filter(|charset| !charset.is_empty())
}

fn parse(input: &[u8], encoding: Option<&str>) -> Result<(RcDom, String), FlipbookError> {
    let encoding = encoding
        .map(str::to_string)
        .or_else(|| detect_charset(input))
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

    let dom = html_to_dom(input, &encoding)
        .map_err(|e| FlipbookError::new(&format!("Failed to parse document: {e}")))?;
    Ok((dom, encoding))
}

fn serialize(dom: RcDom, encoding: &str) -> Result<Vec<u8>, FlipbookError> {
    serialize_document(dom, encoding)
        .map_err(|e| FlipbookError::new(&format!("Failed to serialize document: {e}")))
}

/// Switches a whole document to `target` and serializes it back in its own
/// encoding
pub async fn translate_document(
    coordinator: &TranslationCoordinator,
    input: &[u8],
    encoding: Option<&str>,
    target: &str,
) -> Result<(Vec<u8>, LanguageChange), FlipbookError> {
    let (dom, encoding) = parse(input, encoding)?;
    let change = coordinator.change_language(&dom.document, target).await;
    Ok((serialize(dom, &encoding)?, change))
}

/// Re-applies the stored preferred language to a document
pub async fn restore_document(
    coordinator: &TranslationCoordinator,
    input: &[u8],
    encoding: Option<&str>,
) -> Result<(Vec<u8>, LanguageChange), FlipbookError> {
    let (dom, encoding) = parse(input, encoding)?;
    let change = coordinator.restore_preferred_language(&dom.document).await;
    Ok((serialize(dom, &encoding)?, change))
}

/// Prints an error message to stderr, in red unless `NO_COLOR` is set
pub fn print_error_message(msg: &str) {
    if NoColor::get_or_default(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stderr
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipbook_error_display() {
        let error = FlipbookError::new("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_detect_charset_from_meta_charset() {
        let html = b"<html><head><meta charset=\"windows-1252\"></head><body></body></html>";
        assert_eq!(detect_charset(html).as_deref(), Some("windows-1252"));
    }

    #[test]
    fn test_detect_charset_from_http_equiv() {
        let html = b"<head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\"></head>";
        assert_eq!(detect_charset(html).as_deref(), Some("ISO-8859-1"));
    }

    #[test]
    fn test_detect_charset_missing() {
        assert_eq!(detect_charset(b"<p>Bonjour</p>"), None);
    }

    #[test]
    fn test_read_document_missing_file() {
        let error = read_document("/definitely/not/here.html").unwrap_err();
        assert!(error.to_string().starts_with("File not found"));
    }
}
