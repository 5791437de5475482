#![forbid(unsafe_code)]

//! Client sessions: a connection bound to an input decoder and its listeners.

pub mod session;
pub mod transport;

pub use session::{ClientSession, SessionError, SessionState};
pub use transport::Transport;
