#![forbid(unsafe_code)]

//! Per-connection session.
//!
//! A [`ClientSession`] owns one connection, one [`InputDecoder`] and one
//! [`EventEmitter`]. Every chunk read from the connection goes through
//! [`ClientSession::on_data`]: the chunk is decoded, pending
//! [`wait_for_key_press`](ClientSession::wait_for_key_press) waiters are
//! resolved with the first key press, and then every event is published to
//! subscribers in order.
//!
//! # Lifecycle
//!
//! ```text
//!   Open ──end/destroy/destroy_soon──► Closed
//! ```
//!
//! Once closed, [`on_data`](ClientSession::on_data) and further lifecycle
//! calls fail with [`SessionError::Closed`]. Waiters still pending at close
//! observe a disconnected channel.
//!
//! # Usage
//!
//! ```no_run
//! use std::io::Read;
//! use std::net::TcpListener;
//!
//! use keywire_session::ClientSession;
//!
//! let listener = TcpListener::bind("127.0.0.1:2323")?;
//! let (stream, _) = listener.accept()?;
//! let mut reader = stream.try_clone()?;
//! let mut session = ClientSession::new(stream);
//! let events = session.subscribe();
//!
//! let mut buf = [0u8; 1024];
//! loop {
//!     let n = reader.read(&mut buf)?;
//!     if n == 0 {
//!         session.end()?;
//!         break;
//!     }
//!     session.on_data(&buf[..n])?;
//!     for event in events.try_iter() {
//!         println!("{event:?}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::mpsc;

use keywire_core::config::DecoderConfig;
use keywire_core::decoder::InputDecoder;
use keywire_core::emitter::EventEmitter;
use keywire_core::event::{InputEvent, KeyPress};

use crate::transport::Transport;

/// Whether the session still accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting input.
    Open,
    /// Ended or destroyed.
    Closed,
}

/// Session errors.
#[derive(Debug)]
pub enum SessionError {
    /// The session was already ended or destroyed.
    Closed,
    /// The transport reported an I/O error.
    Transport(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "session is closed"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Closed => None,
            Self::Transport(e) => Some(e),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Transport(e)
    }
}

/// One connected client.
pub struct ClientSession<T: Transport> {
    transport: T,
    decoder: InputDecoder,
    emitter: EventEmitter,
    /// One-shot waiters for the next key press.
    key_waiters: Vec<mpsc::Sender<KeyPress>>,
    state: SessionState,
}

impl<T: Transport> fmt::Debug for ClientSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("decoder", &self.decoder)
            .field("subscribers", &self.emitter.subscriber_count())
            .field("key_waiters", &self.key_waiters.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ClientSession<T> {
    /// Create a session with the default decoder configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DecoderConfig::default())
    }

    /// Create a session with a custom decoder configuration.
    pub fn with_config(transport: T, config: DecoderConfig) -> Self {
        Self {
            transport,
            decoder: InputDecoder::with_config(config),
            emitter: EventEmitter::new(),
            key_waiters: Vec::new(),
            state: SessionState::Open,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session still accepts input.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// The underlying connection.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the session, returning the connection.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Receive every event decoded from now on.
    pub fn subscribe(&mut self) -> mpsc::Receiver<InputEvent> {
        self.emitter.subscribe()
    }

    /// Receive the next key press only.
    ///
    /// The receiver gets at most one value. Cursor position reports do not
    /// resolve it.
    pub fn wait_for_key_press(&mut self) -> mpsc::Receiver<KeyPress> {
        let (tx, rx) = mpsc::channel();
        self.key_waiters.push(tx);
        rx
    }

    /// Decode one chunk read from the connection and publish its events.
    ///
    /// Returns the number of events published.
    pub fn on_data(&mut self, chunk: &[u8]) -> Result<usize, SessionError> {
        self.ensure_open()?;
        let events = self.decoder.decode(chunk);
        Ok(self.dispatch(events))
    }

    /// Flush any held input, then half-close the connection.
    pub fn end(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let events = self.decoder.flush();
        self.dispatch(events);
        self.close();
        self.transport.end()?;
        Ok(())
    }

    /// Drop any held input and tear the connection down now.
    pub fn destroy(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.decoder = InputDecoder::with_config(self.decoder.config().clone());
        self.close();
        self.transport.destroy()?;
        Ok(())
    }

    /// Flush any held input, then tear the connection down after pending
    /// output is written.
    pub fn destroy_soon(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let events = self.decoder.flush();
        self.dispatch(events);
        self.close();
        self.transport.destroy_soon()?;
        Ok(())
    }

    /// Remote address of the client.
    pub fn address(&self) -> Result<SocketAddr, SessionError> {
        Ok(self.transport.peer_addr()?)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Closed => Err(SessionError::Closed),
        }
    }

    fn close(&mut self) {
        self.state = SessionState::Closed;
        let abandoned = self.key_waiters.len();
        self.key_waiters.clear();
        if abandoned > 0 {
            keywire_core::debug!(abandoned, "closing session with pending key waiters");
        }
    }

    fn dispatch(&mut self, events: Vec<InputEvent>) -> usize {
        if let Some(press) = events.iter().find_map(InputEvent::as_key_press) {
            for waiter in self.key_waiters.drain(..) {
                let _ = waiter.send(press.clone());
            }
        }
        let count = events.len();
        self.emitter.publish_all(events);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keywire_core::event::KeyName;
    use std::net::{IpAddr, Ipv4Addr};

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Transport for Recorder {
        fn end(&mut self) -> io::Result<()> {
            self.calls.push("end");
            Ok(())
        }

        fn destroy(&mut self) -> io::Result<()> {
            self.calls.push("destroy");
            Ok(())
        }

        fn destroy_soon(&mut self) -> io::Result<()> {
            self.calls.push("destroy_soon");
            Ok(())
        }

        fn peer_addr(&self) -> io::Result<SocketAddr> {
            Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000))
        }
    }

    #[test]
    fn waiter_fires_once() {
        let mut session = ClientSession::new(Recorder::default());
        let rx = session.wait_for_key_press();

        session.on_data(b"\x1b[1;1R").expect("open");
        assert!(rx.try_recv().is_err());

        session.on_data(b"ab").expect("open");
        let press = rx.try_recv().expect("first key");
        assert_eq!(press.name(), Some(KeyName::Char('a')));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_session_rejects_input() {
        let mut session = ClientSession::new(Recorder::default());
        session.destroy().expect("destroy");
        assert!(matches!(session.on_data(b"x"), Err(SessionError::Closed)));
        assert!(matches!(session.end(), Err(SessionError::Closed)));
        assert_eq!(session.transport().calls, ["destroy"]);
    }

    #[test]
    fn pending_waiters_disconnect_on_close() {
        let mut session = ClientSession::new(Recorder::default());
        let rx = session.wait_for_key_press();
        session.end().expect("end");
        assert_eq!(rx.recv(), Err(mpsc::RecvError));
    }

    #[test]
    fn transport_error_is_wrapped() {
        let err = SessionError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.to_string().contains("gone"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&SessionError::Closed).is_none());
    }
}
