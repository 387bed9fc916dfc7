//! HTTP/1.x request handling.
//!
//! Each connection carries exactly one request and receives exactly one
//! response. There is no keep-alive, no request body and no header handling
//! beyond the single `Content-type` the server sends.
//!
//! # Architecture
//!
//! - **`connection`**: reads the request, routes it and drives the response
//! - **`parser`**: splits the request line into method, path and protocol
//! - **`request`**: the parsed request line
//! - **`response`**: status codes and the four response templates
//! - **`writer`**: serializes and writes responses to the client
//! - **`resource`**: maps paths onto files and streams them back
//! - **`mime`**: content type from the file extension
//!
//! # Routing
//!
//! ```text
//! protocol not HTTP/1.0 or HTTP/1.1  → 400 Bad Request
//! method not GET                     → 501 Method Not Implemented
//! file cannot be opened              → 404 Not Found, connection dropped
//! otherwise                          → 200 OK + file contents
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lantern::http::connection::dispatch;
//! use lantern::http::resource::ResourceResolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = Arc::new(ResourceResolver::new("."));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = resolver.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = dispatch(socket, resolver).await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
pub mod resource;
