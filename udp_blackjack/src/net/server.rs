//! The UDP round server.
//!
//! A single receiver task reads datagrams one at a time and hands each to
//! the [`Router`], which applies it to the shared [`RoundManager`] and then
//! delivers the resulting notifications. Delivery happens on spawned tasks,
//! one per destination address, so the receiver never waits on a send and
//! a failed send only affects its own address.

use async_trait::async_trait;
use log::{error, info, warn};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::{
    net::{ToSocketAddrs, UdpSocket},
    task::JoinHandle,
};

use super::{
    super::game::{
        Notification, Outbox, RoundManager, RoundSettings, UserError,
        entities::{PlayerId, RandomSource, SystemRng},
    },
    messages::{ClientCommand, ServerMessage},
    utils::{self, RECV_BUFFER_SIZE},
};

/// Outbound half of the transport.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send_to(&self, payload: &[u8], to: SocketAddr) -> io::Result<usize>;
}

#[async_trait]
impl Transport for UdpSocket {
    async fn send_to(&self, payload: &[u8], to: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, payload, to).await
    }
}

/// Turns datagrams into round commands and their outcomes into datagrams.
pub struct Router<T, R = SystemRng> {
    manager: Arc<RoundManager<R>>,
    transport: Arc<T>,
}

impl<T, R> Clone for Router<T, R> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport, R: RandomSource + Send + 'static> Router<T, R> {
    pub fn new(manager: Arc<RoundManager<R>>, transport: Arc<T>) -> Self {
        Self { manager, transport }
    }

    pub fn manager(&self) -> &Arc<RoundManager<R>> {
        &self.manager
    }

    /// Apply a parsed command. Nothing is sent.
    pub fn handle(&self, from: PlayerId, command: ClientCommand) -> Outbox {
        match command {
            ClientCommand::Join(name) => self.manager.join(from, &name),
            ClientCommand::Hit => self.manager.hit(from),
            ClientCommand::Stand => self.manager.stand(from),
            ClientCommand::Status => self.manager.status(from),
            ClientCommand::Unrecognized(raw) => {
                let mut out = Outbox::new();
                out.push(from, Notification::Rejected(UserError::UnknownCommand(raw)));
                out
            }
        }
    }

    /// Handle one raw datagram and start delivering whatever it produced.
    /// The returned handles finish once every send has been attempted.
    pub fn dispatch(&self, from: SocketAddr, datagram: &[u8]) -> Vec<JoinHandle<()>> {
        let id = PlayerId::from(from);
        let outbox = match utils::decode_datagram(datagram) {
            Ok(text) => {
                let Ok(command) = text.parse::<ClientCommand>();
                self.handle(id, command)
            }
            Err(error) => {
                warn!("Dropping datagram from {from}: {error}");
                let mut out = Outbox::new();
                out.push(id, Notification::Rejected(UserError::InvalidMessage));
                out
            }
        };
        self.deliver(outbox)
    }

    /// Send an outbox. Messages to the same address go out in order on a
    /// single task; different addresses don't wait on each other.
    pub fn deliver(&self, outbox: Outbox) -> Vec<JoinHandle<()>> {
        let mut batches: Vec<(SocketAddr, Vec<Vec<u8>>)> = Vec::new();
        for (to, notification) in outbox {
            if let Notification::Rejected(error) = &notification {
                warn!("Rejected command from {to}: {error}");
            }
            let message = ServerMessage::from(notification);
            let payload = match utils::encode_datagram(&message) {
                Ok(payload) => payload,
                Err(error) => {
                    error!("Not sending {message} to {to}: {error}");
                    continue;
                }
            };
            let addr = to.addr();
            match batches.iter_mut().find(|(a, _)| *a == addr) {
                Some((_, payloads)) => payloads.push(payload),
                None => batches.push((addr, vec![payload])),
            }
        }

        batches
            .into_iter()
            .map(|(addr, payloads)| {
                let transport = Arc::clone(&self.transport);
                tokio::spawn(async move {
                    for payload in payloads {
                        if let Err(error) = transport.send_to(&payload, addr).await {
                            warn!("Failed to send to {addr}: {error}");
                        }
                    }
                })
            })
            .collect()
    }
}

/// A round server bound to a UDP socket.
pub struct RoundServer<R = SystemRng> {
    socket: Arc<UdpSocket>,
    router: Router<UdpSocket, R>,
}

impl RoundServer {
    /// Bind to `addr` with a system-shuffled deck.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` are out of range or the socket can't
    /// be bound.
    pub async fn bind<A: ToSocketAddrs>(addr: A, settings: RoundSettings) -> io::Result<Self> {
        Self::with_rng(addr, settings, SystemRng).await
    }
}

impl<R: RandomSource + Send + 'static> RoundServer<R> {
    /// Bind to `addr`, shuffling with `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` are out of range or the socket can't
    /// be bound.
    pub async fn with_rng<A: ToSocketAddrs>(
        addr: A,
        settings: RoundSettings,
        rng: R,
    ) -> io::Result<Self> {
        let manager = RoundManager::with_rng(settings, rng)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
        let manager = Arc::new(manager);
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        let router = Router::new(manager, Arc::clone(&socket));
        Ok(Self { socket, router })
    }

    /// # Errors
    ///
    /// Returns an error if the socket's address can't be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn manager(&self) -> Arc<RoundManager<R>> {
        Arc::clone(self.router.manager())
    }

    /// Receive and handle datagrams forever. Receive errors are logged and
    /// the loop carries on.
    pub async fn run(self) {
        match self.socket.local_addr() {
            Ok(addr) => info!("Blackjack server listening on {addr}"),
            Err(error) => warn!("Blackjack server listening on unknown address: {error}"),
        }

        let mut buf = vec![0; RECV_BUFFER_SIZE];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, from)) => {
                    self.router.dispatch(from, &buf[..len]);
                }
                Err(error) => warn!("Failed to receive datagram: {error}"),
            }
        }
    }
}
