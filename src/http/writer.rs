use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::ConnectionError;
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response with bare `\n` line endings.
///
/// Only the `Content-type` header is written. There is no Content-Length;
/// the client finds the end of the body when the connection closes.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    buf.extend_from_slice(b"Content-type: ");
    buf.extend_from_slice(resp.content_type.as_bytes());
    buf.extend_from_slice(b"\n");

    // Header/body separator
    buf.extend_from_slice(b"\n");

    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> Result<(), ConnectionError>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await
                .map_err(ConnectionError::WriteResponse)?;

            if n == 0 {
                return Err(ConnectionError::PeerClosed);
            }

            self.written += n;
        }

        stream.flush().await.map_err(ConnectionError::WriteResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_head_has_no_body() {
        let bytes = serialize_response(&Response::ok("image/gif"));
        assert_eq!(bytes, b"HTTP/1.1 200 OK\nContent-type: image/gif\n\n");
    }
}
