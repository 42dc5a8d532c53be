use crate::http::request::{Method, Request};

#[derive(Debug)]
pub enum ParseError {
    /// The raw bytes are not valid UTF-8.
    InvalidUtf8,
}

/// Extracts a request from the first line of a raw receive buffer.
///
/// Returns `Ok(None)` when the buffer holds nothing the server will answer:
/// an empty buffer, a blank first line, fewer than two whitespace-separated
/// tokens, or a method other than GET. Such connections are closed without
/// a single byte of response. A buffer that fails UTF-8 decoding is an
/// error instead, so the handler can log it before closing.
///
/// Only the first line is consulted. Header lines and anything else after
/// it are ignored entirely, valid or not, including a line cut short by
/// the receive cap.
pub fn parse_request(buf: &[u8]) -> Result<Option<Request>, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidUtf8)?;

    let first_line = match text.lines().next() {
        Some(line) => line,
        None => return Ok(None),
    };

    let mut tokens = first_line.split_whitespace();

    let method = match tokens.next().and_then(Method::from_str) {
        Some(method) => method,
        None => return Ok(None),
    };

    let path = match tokens.next() {
        Some(path) => path,
        None => return Ok(None),
    };

    Ok(Some(Request {
        method,
        path: path.to_string(),
    }))
}
