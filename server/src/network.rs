//! Server network layer handling UDP communications and the session loop

use crate::client_manager::ClientManager;
use crate::config::ServerConfig;
use crate::game::Outbound;
use crate::interrupt::WindowId;
use crate::session::Session;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{GameError, Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    MalformedPacket {
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: u32,
        name: String,
    },
    WindowExpired {
        window: WindowId,
    },
    Shutdown,
}

/// Messages sent from the main loop to the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<u32>,
    },
}

/// Main server coordinating networking and the game session
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: Session,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(config: &ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let session = Session::new(config.game_config(), config.players, config.seed)?;
        let socket = Arc::new(UdpSocket::bind(config.address()).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(
                config.max_clients,
                config.client_timeout(),
            ))),
            session,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Handle that stops [`Server::run`] by sending [`ServerMessage::Shutdown`]
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        let message = match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(packet) => ServerMessage::PacketReceived { packet, addr },
                            Err(e) => {
                                warn!("Failed to deserialize packet from {}: {}", addr, e);
                                ServerMessage::MalformedPacket { addr }
                            }
                        };
                        if let Err(e) = server_tx.send(message) {
                            error!("Failed to send packet to main loop: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addrs()
                        };

                        for (client_id, addr) in client_addrs {
                            if Some(client_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    async fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for client in timed_out {
                    let message = ServerMessage::ClientTimeout {
                        client_id: client.id,
                        name: client.name,
                    };
                    if let Err(e) = server_tx.send(message) {
                        error!("Failed to send timeout message: {}", e);
                        break;
                    }
                }
            }
        });
    }

    /// Feeds a window expiry back into the main loop once `deadline` passes
    fn schedule_expiry(&self, window: WindowId, deadline: Instant) {
        let server_tx = self.server_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline.into()).await;
            if server_tx.send(ServerMessage::WindowExpired { window }).is_err() {
                debug!("Server loop gone before window {:?} expired", window);
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    fn broadcast_packet(&self, packet: Packet, exclude: Option<u32>) {
        if let Err(e) = self
            .game_tx
            .send(GameMessage::BroadcastPacket { packet, exclude })
        {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    fn reject(&self, error: GameError, addr: SocketAddr) {
        debug!("Rejecting packet from {}: {}", addr, error);
        self.send_packet(Packet::Rejected { error }, addr);
    }

    /// Routes everything the session produced to the transport
    async fn flush_session(&mut self) {
        let outbound = self.session.drain_outbox();
        if outbound.is_empty() {
            return;
        }

        let clients = self.clients.read().await;
        for message in outbound {
            match message {
                Outbound::To { player, packet } => match clients.addr_of(&player) {
                    Some(addr) => self.send_packet(packet, addr),
                    None => debug!("Dropping packet for departed player {}", player),
                },
                Outbound::Broadcast { packet } => self.broadcast_packet(packet, None),
                Outbound::ScheduleExpiry { window, deadline } => {
                    self.schedule_expiry(window, deadline)
                }
            }
        }
    }

    /// Processes one incoming packet
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        let client_id = {
            let mut clients = self.clients.write().await;
            clients.touch(addr)
        };

        match packet {
            Packet::Connect {
                client_version,
                name,
            } => {
                info!(
                    "Client {} connecting from {} (version: {})",
                    name, addr, client_version
                );
                if client_version != PROTOCOL_VERSION {
                    self.send_packet(
                        Packet::Disconnected {
                            reason: format!(
                                "Protocol version mismatch, server speaks {}",
                                PROTOCOL_VERSION
                            ),
                        },
                        addr,
                    );
                    return;
                }

                let added = {
                    let mut clients = self.clients.write().await;
                    clients.add_client(addr, &name)
                };

                match added {
                    Ok(_) => {
                        self.send_packet(Packet::Connected { name: name.clone() }, addr);
                        self.session.player_joined(&name);
                        self.flush_session().await;
                    }
                    Err(refusal) => match refusal.error() {
                        Some(error) => self.reject(error, addr),
                        None => self.send_packet(
                            Packet::Disconnected {
                                reason: "Server full".to_string(),
                            },
                            addr,
                        ),
                    },
                }
            }

            Packet::Action(action) => {
                let Some(name) = self.name_of(client_id).await else {
                    self.reject(GameError::InvalidHandshake, addr);
                    return;
                };
                debug!("{} submitted {:?}", name, action);

                if let Err(error) = self.session.handle_action(&name, &action) {
                    info!("Rejected {:?} from {}: {}", action, name, error);
                    self.reject(error, addr);
                }
                self.flush_session().await;
            }

            Packet::Chat { text } => {
                let Some(name) = self.name_of(client_id).await else {
                    self.reject(GameError::InvalidHandshake, addr);
                    return;
                };
                self.broadcast_packet(Packet::ChatMessage { from: name, text }, client_id);
            }

            Packet::Heartbeat => {
                if client_id.is_none() {
                    debug!("Heartbeat from unknown address {}", addr);
                }
            }

            Packet::Disconnect => {
                let removed = match client_id {
                    Some(id) => {
                        let mut clients = self.clients.write().await;
                        clients.remove_client(&id)
                    }
                    None => None,
                };

                if let Some(client) = removed {
                    self.player_gone(&client.name).await;
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
                self.reject(GameError::ProtocolMalformed, addr);
            }
        }
    }

    async fn name_of(&self, client_id: Option<u32>) -> Option<String> {
        let clients = self.clients.read().await;
        client_id
            .and_then(|id| clients.get(id))
            .map(|client| client.name.clone())
    }

    async fn player_gone(&mut self, name: &str) {
        self.broadcast_packet(
            Packet::Notify {
                text: format!("{} disconnected", name),
            },
            None,
        );
        self.session.player_left(name);
        self.flush_session().await;
    }

    /// Main server loop; every game event is handled here, one at a time
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Initialize concurrent tasks
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;
        self.spawn_timeout_checker().await;

        info!("Server started successfully");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::PacketReceived { packet, addr } => {
                    self.handle_packet(packet, addr).await;
                }
                ServerMessage::MalformedPacket { addr } => {
                    self.reject(GameError::ProtocolMalformed, addr);
                }
                ServerMessage::ClientTimeout { client_id, name } => {
                    info!("Client {} ({}) timed out", client_id, name);
                    self.player_gone(&name).await;
                }
                ServerMessage::WindowExpired { window } => {
                    self.session.window_expired(window);
                    self.flush_session().await;
                }
                ServerMessage::Shutdown => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}
