//! Opaque TLS stream construction. Per spec, the TLS implementation
//! itself is an external collaborator — this module's only job is to
//! hand back something that is `Read + Write` plus the raw `TcpStream`
//! the scheduler needs for its readability check.

use std::net::TcpStream;

use native_tls::TlsConnector;

use crate::error::{LoggerError, Result};

/// A connected, TLS-wrapped IRC socket.
pub struct IrcConnection {
    pub tls: native_tls::TlsStream<TcpStream>,
}

impl IrcConnection {
    /// Connect to `server` (`host:port`) over TCP and complete a TLS
    /// handshake using the host portion as the SNI / certificate name.
    pub fn connect(server: &str) -> Result<Self> {
        let host = server.split(':').next().unwrap_or(server).to_string();
        let tcp = TcpStream::connect(server)?;
        let connector = TlsConnector::new()?;
        let tls = connector.connect(&host, tcp)?;
        Ok(IrcConnection { tls })
    }

    /// The underlying TCP socket, used by the scheduling helper to wait
    /// for readability without going through the TLS record layer.
    pub fn raw_socket(&self) -> &TcpStream {
        self.tls.get_ref()
    }
}
