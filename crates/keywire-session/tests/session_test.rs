//! Session behavior against in-memory and loopback transports.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;

use keywire_core::event::{CursorPosition, InputEvent, KeyName};
use keywire_core::{DecoderConfig, decode_chunk};
use keywire_session::{ClientSession, SessionError, SessionState, Transport};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MockTransport {
    ended: bool,
    destroyed: bool,
    destroyed_soon: bool,
    fail_with: Option<io::ErrorKind>,
}

impl MockTransport {
    fn result(&self) -> io::Result<()> {
        match self.fail_with {
            Some(kind) => Err(io::Error::new(kind, "mock failure")),
            None => Ok(()),
        }
    }
}

impl Transport for MockTransport {
    fn end(&mut self) -> io::Result<()> {
        self.ended = true;
        self.result()
    }

    fn destroy(&mut self) -> io::Result<()> {
        self.destroyed = true;
        self.result()
    }

    fn destroy_soon(&mut self) -> io::Result<()> {
        self.destroyed_soon = true;
        self.result()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        Err(io::Error::new(io::ErrorKind::NotConnected, "no peer"))
    }
}

fn names(rx: &mpsc::Receiver<InputEvent>) -> Vec<KeyName> {
    rx.try_iter()
        .filter_map(|e| e.as_key_press().and_then(|p| p.name()))
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────

#[test]
fn subscribers_receive_decoded_events() {
    let mut session = ClientSession::new(MockTransport::default());
    let rx = session.subscribe();

    assert_eq!(session.on_data(b"j\x1b[B").expect("open"), 2);
    assert_eq!(names(&rx), vec![KeyName::Char('j'), KeyName::Down]);
}

#[test]
fn cursor_reports_are_published() {
    let mut session = ClientSession::new(MockTransport::default());
    let rx = session.subscribe();
    session.on_data(b"\x1b[3;7R").expect("open");
    assert_eq!(
        rx.try_recv(),
        Ok(InputEvent::CursorPositionReport(CursorPosition { row: 3, col: 7 }))
    );
}

#[test]
fn waiter_resolves_before_subscribers_see_event() {
    let mut session = ClientSession::new(MockTransport::default());
    let waiter = session.wait_for_key_press();
    let rx = session.subscribe();

    session.on_data(b"\r").expect("open");
    assert_eq!(waiter.try_recv().map(|p| p.name()), Ok(Some(KeyName::Return)));
    assert_eq!(names(&rx), vec![KeyName::Return]);
}

#[test]
fn mouse_chunk_resolves_nothing() {
    let mut session = ClientSession::new(MockTransport::default());
    let waiter = session.wait_for_key_press();
    assert_eq!(session.on_data(b"\x1b[<0;10;20Mx").expect("open"), 0);
    assert!(waiter.try_recv().is_err());
}

#[test]
fn end_flushes_carried_escape() {
    let config = DecoderConfig::default().with_carry_partial_escapes(true);
    let mut session = ClientSession::with_config(MockTransport::default(), config);
    let rx = session.subscribe();

    session.on_data(b"\x1bO").expect("open");
    assert!(names(&rx).is_empty());

    session.end().expect("end");
    assert_eq!(names(&rx), vec![KeyName::Char('o')]);
    assert!(session.transport().ended);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn destroy_discards_carried_escape() {
    let config = DecoderConfig::default().with_carry_partial_escapes(true);
    let mut session = ClientSession::with_config(MockTransport::default(), config);
    let rx = session.subscribe();

    session.on_data(b"\x1b[1").expect("open");
    session.destroy().expect("destroy");
    assert!(rx.try_iter().next().is_none());
    assert!(session.transport().destroyed);
}

#[test]
fn bare_escape_is_delivered_in_carry_mode() {
    let config = DecoderConfig::default().with_carry_partial_escapes(true);
    let mut session = ClientSession::with_config(MockTransport::default(), config);
    let waiter = session.wait_for_key_press();

    assert_eq!(session.on_data(b"\x1b").expect("open"), 1);
    assert_eq!(waiter.try_recv().map(|p| p.name()), Ok(Some(KeyName::Escape)));
}

#[test]
fn transport_is_returned_after_close() {
    let mut session = ClientSession::new(MockTransport::default());
    session.end().expect("end");
    let transport = session.into_transport();
    assert!(transport.ended);
    assert!(!transport.destroyed);
}

#[test]
fn destroy_soon_forwards() {
    let mut session = ClientSession::new(MockTransport::default());
    session.destroy_soon().expect("destroy soon");
    assert!(session.transport().destroyed_soon);
    assert!(!session.is_open());
}

#[test]
fn transport_failure_still_closes() {
    let transport = MockTransport {
        fail_with: Some(io::ErrorKind::BrokenPipe),
        ..MockTransport::default()
    };
    let mut session = ClientSession::new(transport);
    let err = session.end().expect_err("mock fails");
    assert!(matches!(err, SessionError::Transport(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(matches!(session.on_data(b"a"), Err(SessionError::Closed)));
}

#[test]
fn address_error_is_forwarded() {
    let session = ClientSession::new(MockTransport::default());
    assert!(matches!(session.address(), Err(SessionError::Transport(_))));
}

#[test]
fn tcp_stream_transport() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let client = TcpStream::connect(listener.local_addr()?)?;
    let (server_side, _) = listener.accept()?;

    let mut session = ClientSession::new(server_side);
    assert_eq!(session.address()?, client.local_addr()?);

    let rx = session.subscribe();
    session.on_data(b"\x1b[A")?;
    assert_eq!(names(&rx), vec![KeyName::Up]);

    session.end()?;
    Ok(())
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn session_publishes_what_decoder_produces(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..8)
    ) {
        let mut session = ClientSession::new(MockTransport::default());
        let rx = session.subscribe();
        let mut expected = Vec::new();
        for chunk in &chunks {
            expected.extend(decode_chunk(chunk));
            session.on_data(chunk).expect("open");
        }
        prop_assert_eq!(rx.try_iter().collect::<Vec<_>>(), expected);
    }
}
