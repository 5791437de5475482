#![forbid(unsafe_code)]

//! The connection a session reads from.
//!
//! Reading is driven from outside: whoever owns the socket hands each chunk
//! to [`ClientSession::on_data`](crate::session::ClientSession::on_data).
//! The session only needs the lifecycle half of the connection.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

/// Lifecycle operations a session forwards to its connection.
pub trait Transport {
    /// Half-close: stop sending, let the peer finish.
    fn end(&mut self) -> io::Result<()>;

    /// Tear the connection down immediately.
    fn destroy(&mut self) -> io::Result<()>;

    /// Tear the connection down once queued output has been written.
    fn destroy_soon(&mut self) -> io::Result<()>;

    /// Remote address of the peer.
    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

impl Transport for TcpStream {
    fn end(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Write)
    }

    fn destroy(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }

    fn destroy_soon(&mut self) -> io::Result<()> {
        self.flush()?;
        self.shutdown(Shutdown::Both)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn end(&mut self) -> io::Result<()> {
        (**self).end()
    }

    fn destroy(&mut self) -> io::Result<()> {
        (**self).destroy()
    }

    fn destroy_soon(&mut self) -> io::Result<()> {
        (**self).destroy_soon()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        (**self).peer_addr()
    }
}
