//! Runtime for the client chat session
//!
//! Owns the session state, feeds events through the reducer and executes
//! the resulting effects against a [`ChatTransport`].

mod executor;
pub mod http;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{SessionHandle, SessionRuntime};
pub use http::HttpTransport;
pub use traits::*;
