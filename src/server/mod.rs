//! Connection acceptor.

pub mod listener;

pub use listener::Server;
