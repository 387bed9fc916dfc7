//! Resource responder: maps a request path onto a file under the document
//! root and streams it back.
//!
//! The head (`200 OK` plus content type) goes out only after the file has been
//! opened. Once it is sent, any failure can only end the connection. The
//! client then sees a truncated body, since responses carry no Content-Length.

use std::path::{Component, Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::ConnectionError;
use crate::http::mime::content_type_for;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Chunk size for copying a resource to the client.
const BUFFER_SIZE: usize = 8192;

/// Resolves request paths against a document root.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
}

impl ResourceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drops the first character of the request path (normally the leading
    /// `/`). A path of exactly `/` becomes the empty string.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::resource::ResourceResolver;
    /// assert_eq!(ResourceResolver::normalize("/index.html"), "index.html");
    /// assert_eq!(ResourceResolver::normalize("/"), "");
    /// ```
    pub fn normalize(path: &str) -> &str {
        let mut chars = path.chars();
        chars.next();
        chars.as_str()
    }

    /// Joins a normalized path onto the root.
    ///
    /// Returns `None` for the empty path and for anything that would leave
    /// the root: `..`, absolute paths and drive prefixes.
    pub fn resolve(&self, normalized: &str) -> Option<PathBuf> {
        if normalized.is_empty() {
            return None;
        }

        let mut resolved = self.root.clone();
        for comp in Path::new(normalized).components() {
            match comp {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    /// Opens the regular file a normalized path refers to.
    pub async fn open(&self, normalized: &str) -> Result<File, ConnectionError> {
        let path = self
            .resolve(normalized)
            .ok_or_else(|| ConnectionError::not_found(normalized))?;

        let file = File::open(&path)
            .await
            .map_err(|source| ConnectionError::OpenResource {
                path: path.clone(),
                source,
            })?;

        let metadata = file
            .metadata()
            .await
            .map_err(|source| ConnectionError::OpenResource {
                path: path.clone(),
                source,
            })?;

        if !metadata.is_file() {
            return Err(ConnectionError::not_found(path));
        }

        Ok(file)
    }
}

/// Serves the resource named by `path` on `stream`.
///
/// If the resource cannot be opened a 404 page is written and the open error
/// is returned, so the caller ends the connection.
pub async fn serve<S>(
    stream: &mut S,
    resolver: &ResourceResolver,
    path: &str,
) -> Result<(), ConnectionError>
where
    S: AsyncWrite + Unpin,
{
    info!(path = %path, "Retrieving resource");

    let normalized = ResourceResolver::normalize(path);

    let file = match resolver.open(normalized).await {
        Ok(file) => file,
        Err(e) => {
            if let Err(write_err) = ResponseWriter::new(&Response::not_found())
                .write_to_stream(stream)
                .await
            {
                warn!(error = %write_err, "Failed to send 404 response");
            }
            return Err(e);
        }
    };

    let head = Response::ok(content_type_for(normalized));
    ResponseWriter::new(&head).write_to_stream(stream).await?;

    let sent = copy_body(file, stream).await?;
    debug!(path = %path, bytes = sent, "Resource sent");

    Ok(())
}

/// Copies `source` to `sink` in fixed-size chunks until end of file.
///
/// Returns the number of body bytes written.
pub async fn copy_body<R, W>(mut source: R, sink: &mut W) -> Result<u64, ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = source
            .read(&mut buf)
            .await
            .map_err(ConnectionError::ReadResource)?;

        if n == 0 {
            break;
        }

        let mut written = 0;
        while written < n {
            let m = sink
                .write(&buf[written..n])
                .await
                .map_err(ConnectionError::WriteResponse)?;

            if m == 0 {
                return Err(ConnectionError::PeerClosed);
            }

            written += m;
        }

        total += n as u64;
    }

    sink.flush().await.map_err(ConnectionError::WriteResponse)?;
    Ok(total)
}
