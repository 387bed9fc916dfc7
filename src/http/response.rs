//! The four response templates this server can send.

use crate::http::mime::TEXT_HTML;

/// HTTP status codes the server responds with.
///
/// - `Ok` (200): the resource follows
/// - `BadRequest` (400): unsupported protocol version
/// - `NotFound` (404): the resource could not be opened
/// - `NotImplemented` (501): any method other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 501 Method Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the reason phrase sent on the status line.
    ///
    /// 501 uses "Method Not Implemented" rather than the registry's
    /// "Not Implemented".
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Method Not Implemented",
        }
    }
}

const BAD_REQUEST_BODY: &str = "<html>\n \
<body>\n  \
<h1>Bad Request</h1>\n  \
<p>This server did not understand your request.</p>\n \
</body>\n\
</html>\n";

const NOT_FOUND_BODY: &str = "<html>\n \
<body>\n  \
<h1>Sorry</h1>\n  \
<p>We could not find this file on zero. Apologies.</p>\n \
</body>\n\
</html>\n";

/// A response ready to be serialized: status, a single `Content-type`
/// header, and a body.
///
/// For 200 responses the body is empty here; the file contents are streamed
/// after the head by the resource responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the `Content-type` header
    pub content_type: String,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Head of a successful response carrying `mime` as its content type.
    pub fn ok(mime: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type: mime.into(),
            body: Vec::new(),
        }
    }

    /// 400 page sent when the protocol version is not understood.
    pub fn bad_request() -> Self {
        Self::html(StatusCode::BadRequest, BAD_REQUEST_BODY.as_bytes().to_vec())
    }

    /// 404 page sent when the requested resource cannot be opened.
    pub fn not_found() -> Self {
        Self::html(StatusCode::NotFound, NOT_FOUND_BODY.as_bytes().to_vec())
    }

    /// 501 page naming the method the client tried to use.
    pub fn not_implemented(method: &str) -> Self {
        let body = format!(
            "<html>\n \
<body>\n  \
<h1>Method Not Implemented</h1>\n  \
<p>The method {method} is not implemented by this server.</p>\n \
</body>\n\
</html>\n"
        );
        Self::html(StatusCode::NotImplemented, body.into_bytes())
    }

    fn html(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: TEXT_HTML.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_body_layout() {
        let body = String::from_utf8(Response::bad_request().body).unwrap();
        assert!(body.starts_with("<html>\n <body>\n  <h1>Bad Request</h1>\n"));
        assert!(body.ends_with(" </body>\n</html>\n"));
    }
}
