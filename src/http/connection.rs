use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::ConnectionError;
use crate::http::parser::{first_line, parse_request_line};
use crate::http::request::RequestLine;
use crate::http::resource::{self, ResourceResolver};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Most bytes taken from a connection. Anything the client sends beyond
/// this in its first packet is never read.
pub const MAX_REQUEST_BYTES: usize = 511;

/// How long a finished connection keeps reading leftover input before it is
/// dropped.
const LINGER_TIMEOUT: Duration = Duration::from_millis(500);

/// Most leftover input discarded while lingering.
const MAX_LINGER_BYTES: usize = 64 * 1024;

/// What to do with a parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Protocol is not `HTTP/1.0` or `HTTP/1.1`
    BadProtocol,
    /// Any method other than `GET`, carrying the method as sent
    UnsupportedMethod(String),
    /// A valid GET for this path
    ServeResource(String),
}

/// Decides the outcome for a request line. The protocol is checked before
/// the method, so `POST / HTTP/2` is a bad protocol, not an unsupported method.
///
/// # Example
///
/// ```
/// # use lantern::http::connection::{route, RouteOutcome};
/// # use lantern::http::request::RequestLine;
/// let line = RequestLine::new("DELETE", "/a", "HTTP/1.1");
/// assert_eq!(route(&line), RouteOutcome::UnsupportedMethod("DELETE".into()));
/// ```
pub fn route(line: &RequestLine) -> RouteOutcome {
    if !line.is_supported_protocol() {
        RouteOutcome::BadProtocol
    } else if !line.is_get() {
        RouteOutcome::UnsupportedMethod(line.method.clone())
    } else {
        RouteOutcome::ServeResource(line.path.clone())
    }
}

pub struct Connection<S> {
    stream: S,
    resolver: Arc<ResourceResolver>,
    read_timeout: Option<Duration>,
    state: ConnectionState,
}

/// A connection carries exactly one request:
///
/// ```text
/// Reading ─┬─ peer closed ──────────────────────────────► Closed
///          └─► Routing ─┬─ bad protocol / method ─► Responding ─► Closed
///                       └─ GET ─► Serving ─┬─ body streamed ────► Closed
///                                          └─ 404, error ───────► (fatal)
/// ```
pub enum ConnectionState {
    Reading,
    Routing(RequestLine),
    Responding(ResponseWriter),
    Serving(String),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Arc<ResourceResolver>) -> Self {
        Self {
            stream,
            resolver,
            read_timeout: None,
            state: ConnectionState::Reading,
        }
    }

    /// Gives up on the connection if no request bytes arrive within `limit`.
    pub fn with_read_timeout(mut self, limit: Option<Duration>) -> Self {
        self.read_timeout = limit;
        self
    }

    /// Handles the connection's single request.
    ///
    /// Returns `Ok` once a response is fully written or when the peer closed
    /// without sending anything. Any error means the connection must be
    /// dropped without attempting another response.
    ///
    /// Unless the request itself could not be read, the write side is shut
    /// down and unread input drained before returning, so the peer sees a
    /// FIN after the body rather than a reset.
    pub async fn run(&mut self) -> Result<(), ConnectionError> {
        let result = self.drive().await;

        if !matches!(
            result,
            Err(ConnectionError::ReadRequest(_) | ConnectionError::ReadTimeout(_))
        ) {
            self.close_gracefully().await;
        }

        result
    }

    async fn drive(&mut self) -> Result<(), ConnectionError> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(raw) => {
                        let text = String::from_utf8_lossy(&raw);
                        info!(request = %first_line(&text), "Received request");
                        debug!(raw = %text, "Raw request");
                        ConnectionState::Routing(parse_request_line(&raw))
                    }
                    None => {
                        debug!("Peer closed before sending a request");
                        ConnectionState::Closed
                    }
                },

                ConnectionState::Routing(line) => match route(&line) {
                    RouteOutcome::BadProtocol => {
                        debug!(protocol = %line.protocol, "Unsupported protocol");
                        ConnectionState::Responding(ResponseWriter::new(&Response::bad_request()))
                    }
                    RouteOutcome::UnsupportedMethod(method) => {
                        debug!(method = %method, "Unsupported method");
                        ConnectionState::Responding(ResponseWriter::new(
                            &Response::not_implemented(&method),
                        ))
                    }
                    RouteOutcome::ServeResource(path) => ConnectionState::Serving(path),
                },

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Serving(path) => {
                    resource::serve(&mut self.stream, &self.resolver, &path).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Sends FIN, then discards whatever the peer still has in flight.
    ///
    /// Closing a socket with unread input makes the kernel answer with a
    /// reset, which can destroy a body the client has not read yet.
    async fn close_gracefully(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Failed to shut down write side");
            return;
        }

        let stream = &mut self.stream;
        let drain = async move {
            let mut sink = [0u8; 1024];
            let mut discarded = 0;
            while discarded < MAX_LINGER_BYTES {
                match stream.read(&mut sink).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => discarded += n,
                }
            }
            discarded
        };

        match timeout(LINGER_TIMEOUT, drain).await {
            Ok(discarded) => debug!(discarded, "Connection closed"),
            Err(_) => debug!("Peer did not close within linger timeout"),
        }
    }

    /// Performs the connection's one read. `None` means the peer closed
    /// without sending data.
    async fn read_request(&mut self) -> Result<Option<Bytes>, ConnectionError> {
        let limit = self.read_timeout;
        let mut buf = BytesMut::zeroed(MAX_REQUEST_BYTES);

        let read = self.stream.read(&mut buf[..]);
        let result = match limit {
            Some(limit) => timeout(limit, read)
                .await
                .map_err(|_| ConnectionError::ReadTimeout(limit))?,
            None => read.await,
        };
        let n = result.map_err(ConnectionError::ReadRequest)?;

        if n == 0 {
            return Ok(None);
        }

        buf.truncate(n);
        Ok(Some(buf.freeze()))
    }
}

/// Reads one request from `stream` and writes its response.
pub async fn dispatch<S>(stream: S, resolver: Arc<ResourceResolver>) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Connection::new(stream, resolver).run().await
}
