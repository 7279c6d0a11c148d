//! HTTP server lifecycle.

mod http_server;
mod shutdown;

pub use http_server::serve;
pub use shutdown::spawn_signal_listener;
