//! Process-level pieces: the scan loop and the health server.

pub mod http;
pub mod runtime;

pub use http::*;
pub use runtime::*;
