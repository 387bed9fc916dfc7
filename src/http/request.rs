/// The only method this server implements.
pub const METHOD_GET: &str = "GET";

/// Protocol versions accepted on the request line.
///
/// Matching is exact and case-sensitive: `http/1.1` or `HTTP/1.1x` are rejected.
pub const SUPPORTED_PROTOCOLS: [&str; 2] = ["HTTP/1.0", "HTTP/1.1"];

/// The three tokens of an HTTP request line.
///
/// Tokens are kept as raw strings. A token the client never sent is an
/// empty string, so a truncated line like `GET /` parses with an empty
/// `protocol` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// The request method as sent (e.g. "GET", "POST")
    pub method: String,
    /// The request path (e.g. "/index.html")
    pub path: String,
    /// Protocol version (e.g. "HTTP/1.1")
    pub protocol: String,
}

impl RequestLine {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            protocol: protocol.into(),
        }
    }

    /// Returns `true` if the protocol is exactly `HTTP/1.0` or `HTTP/1.1`.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::RequestLine;
    /// assert!(RequestLine::new("GET", "/", "HTTP/1.0").is_supported_protocol());
    /// assert!(!RequestLine::new("GET", "/", "HTTP/2").is_supported_protocol());
    /// ```
    pub fn is_supported_protocol(&self) -> bool {
        SUPPORTED_PROTOCOLS.contains(&self.protocol.as_str())
    }

    /// Returns `true` if the method is exactly `GET` (case-sensitive).
    pub fn is_get(&self) -> bool {
        self.method == METHOD_GET
    }
}
