//! Connected client bookkeeping for the game server
//!
//! A client exists once its handshake is accepted. It is known by the address
//! it sends from and by the unique name it registered with; game traffic is
//! routed by name, everything else by address.

use log::info;
use shared::{is_valid_name, GameError};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A registered client and its liveness
#[derive(Debug)]
pub struct Client {
    /// Unique client identifier assigned by the server
    pub id: u32,
    /// Network address for sending responses
    pub addr: SocketAddr,
    /// Registered player name
    pub name: String,
    /// Last time we received any packet from this client
    pub last_seen: Instant,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr, name: String) -> Self {
        Self {
            id,
            addr,
            name,
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// True if nothing arrived from this client within `timeout`
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum JoinRefusal {
    /// The address already completed a handshake
    AlreadyConnected,
    /// Name is malformed or taken
    Name,
    Full,
}

impl JoinRefusal {
    /// Error to reject the handshake with; `None` means the client is turned away
    pub fn error(&self) -> Option<GameError> {
        match self {
            JoinRefusal::AlreadyConnected => Some(GameError::InvalidHandshake),
            JoinRefusal::Name => Some(GameError::InvalidName),
            JoinRefusal::Full => None,
        }
    }
}

/// All connected clients, capped at `max_clients`
pub struct ClientManager {
    clients: HashMap<u32, Client>,
    next_client_id: u32,
    max_clients: usize,
    timeout: Duration,
}

impl ClientManager {
    pub fn new(max_clients: usize, timeout: Duration) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
            timeout,
        }
    }

    /// Registers `name` for `addr`, returning the new client id
    pub fn add_client(&mut self, addr: SocketAddr, name: &str) -> Result<u32, JoinRefusal> {
        if self.find_client_by_addr(addr).is_some() {
            return Err(JoinRefusal::AlreadyConnected);
        }
        if !is_valid_name(name) || self.find_client_by_name(name).is_some() {
            return Err(JoinRefusal::Name);
        }
        if self.clients.len() >= self.max_clients {
            return Err(JoinRefusal::Full);
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} registered as {} from {}", client_id, name, addr);
        self.clients
            .insert(client_id, Client::new(client_id, addr, name.to_string()));

        Ok(client_id)
    }

    pub fn remove_client(&mut self, client_id: &u32) -> Option<Client> {
        let client = self.clients.remove(client_id)?;
        info!("Client {} ({}) disconnected", client.id, client.name);
        Some(client)
    }

    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    pub fn find_client_by_name(&self, name: &str) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.name == name)
            .map(|(id, _)| *id)
    }

    pub fn get(&self, client_id: u32) -> Option<&Client> {
        self.clients.get(&client_id)
    }

    pub fn addr_of(&self, name: &str) -> Option<SocketAddr> {
        self.clients
            .values()
            .find(|client| client.name == name)
            .map(|client| client.addr)
    }

    /// Refreshes the liveness of the client sending from `addr`
    pub fn touch(&mut self, addr: SocketAddr) -> Option<u32> {
        let client = self.clients.values_mut().find(|c| c.addr == addr)?;
        client.touch();
        Some(client.id)
    }

    /// Removes and returns the clients that went silent
    pub fn check_timeouts(&mut self) -> Vec<Client> {
        let timeout = self.timeout;
        let timed_out: Vec<u32> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(timeout))
            .map(|(id, _)| *id)
            .collect();

        timed_out
            .iter()
            .filter_map(|client_id| self.remove_client(client_id))
            .collect()
    }

    pub fn get_client_addrs(&self) -> Vec<(u32, SocketAddr)> {
        self.clients
            .iter()
            .map(|(id, client)| (*id, client.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
