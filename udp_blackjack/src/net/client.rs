//! A low-level UDP blackjack client.
//!
//! Sends commands and parses whatever the server sends back. Used by the
//! terminal client and by the integration tests.

use anyhow::{Error, bail};
use std::{
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::net::{ToSocketAddrs, UdpSocket, lookup_host};

use super::{
    messages::{ClientCommand, ServerMessage},
    utils::{self, RECV_BUFFER_SIZE},
};

/// Default wait used by [`Client::recv_timeout`] callers.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Client {
    /// The server this client talks to.
    pub server: SocketAddr,
    socket: UdpSocket,
}

impl Client {
    /// Bind an ephemeral local port and point it at `server`. No datagram is
    /// sent; the server learns about the client on [`Client::join`].
    ///
    /// A name resolving to both families goes to its IPv4 address, which
    /// is where a default `0.0.0.0` server listens.
    ///
    /// # Errors
    ///
    /// Returns an error if the server address can't be resolved or the
    /// local socket can't be bound.
    pub async fn connect<A: ToSocketAddrs>(server: A) -> Result<Self, Error> {
        let Some(server) = pick_server(lookup_host(server).await?) else {
            bail!("server address did not resolve");
        };
        let local = match server {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(server).await?;
        Ok(Self { server, socket })
    }

    /// The address the server sees this client as, barring NAT.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket's address can't be read.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }

    /// # Errors
    ///
    /// Returns an error if the command can't be sent.
    pub async fn send(&self, command: &ClientCommand) -> Result<(), Error> {
        let payload = utils::encode_datagram(command)?;
        self.socket.send(&payload).await?;
        Ok(())
    }

    /// Ask to join the next round as `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command can't be sent.
    pub async fn join(&self, name: &str) -> Result<(), Error> {
        self.send(&ClientCommand::Join(name.to_string())).await
    }

    /// # Errors
    ///
    /// Returns an error if the command can't be sent.
    pub async fn hit(&self) -> Result<(), Error> {
        self.send(&ClientCommand::Hit).await
    }

    /// # Errors
    ///
    /// Returns an error if the command can't be sent.
    pub async fn stand(&self) -> Result<(), Error> {
        self.send(&ClientCommand::Stand).await
    }

    /// # Errors
    ///
    /// Returns an error if the command can't be sent.
    pub async fn status(&self) -> Result<(), Error> {
        self.send(&ClientCommand::Status).await
    }

    /// Wait for the next message from the server.
    ///
    /// # Errors
    ///
    /// Returns an error if receiving fails or the datagram isn't a message
    /// this client understands.
    pub async fn recv(&self) -> Result<ServerMessage, Error> {
        let mut buf = vec![0; RECV_BUFFER_SIZE];
        let len = self.socket.recv(&mut buf).await?;
        let text = utils::decode_datagram(&buf[..len])?;
        Ok(text.parse()?)
    }

    /// Like [`Client::recv`], giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout or for any reason [`Client::recv`] fails.
    pub async fn recv_timeout(&self, timeout: Duration) -> Result<ServerMessage, Error> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(message) => message,
            Err(_) => bail!("no message from {} within {timeout:?}", self.server),
        }
    }
}

/// The first IPv4 address, or the first address at all when there is none.
fn pick_server(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<SocketAddr> {
    let mut fallback = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }
    fallback
}
