//! Lantern - minimal HTTP/1.x file server
//!
//! Serves files from a document root over GET, one request per connection.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod server;
