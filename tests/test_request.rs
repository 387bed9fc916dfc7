use lantern::http::request::{RequestLine, SUPPORTED_PROTOCOLS};

#[test]
fn test_request_supported_protocols() {
    for protocol in SUPPORTED_PROTOCOLS {
        assert!(RequestLine::new("GET", "/", protocol).is_supported_protocol());
    }
}

#[test]
fn test_request_protocol_is_case_sensitive() {
    assert!(!RequestLine::new("GET", "/", "http/1.1").is_supported_protocol());
}

#[test]
fn test_request_protocol_rejects_trailing_characters() {
    assert!(!RequestLine::new("GET", "/", "HTTP/1.1x").is_supported_protocol());
    assert!(!RequestLine::new("GET", "/", "HTTP/1.").is_supported_protocol());
}

#[test]
fn test_request_other_versions_rejected() {
    assert!(!RequestLine::new("GET", "/", "HTTP/2.0").is_supported_protocol());
    assert!(!RequestLine::new("GET", "/", "HTTP/0.9").is_supported_protocol());
    assert!(!RequestLine::new("GET", "/", "").is_supported_protocol());
}

#[test]
fn test_request_method_get_is_case_sensitive() {
    assert!(RequestLine::new("GET", "/", "HTTP/1.1").is_get());
    assert!(!RequestLine::new("get", "/", "HTTP/1.1").is_get());
    assert!(!RequestLine::new("HEAD", "/", "HTTP/1.1").is_get());
}

#[test]
fn test_request_default_is_empty() {
    let line = RequestLine::default();

    assert!(line.method.is_empty());
    assert!(line.path.is_empty());
    assert!(line.protocol.is_empty());
}
