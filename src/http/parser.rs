use crate::http::request::RequestLine;

/// Extracts the request line from the raw bytes of a request.
///
/// Only the first line is looked at. It is split on ASCII whitespace and the
/// first three tokens become method, path and protocol; anything after the
/// third token is ignored. Invalid UTF-8 is replaced rather than rejected,
/// and missing tokens come back empty. Parsing never fails: deciding what a
/// malformed line means is left to routing.
pub fn parse_request_line(buf: &[u8]) -> RequestLine {
    let text = String::from_utf8_lossy(buf);
    let line = first_line(&text);

    let mut parts = line.split_ascii_whitespace();
    let mut next = || parts.next().unwrap_or_default().to_string();

    let method = next();
    let path = next();
    let protocol = next();

    RequestLine {
        method,
        path,
        protocol,
    }
}

/// Returns the text up to the first line break, with a trailing `\r` removed.
///
/// Leading blank lines are skipped so a stray CRLF before the request line
/// does not hide it.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default()
}
