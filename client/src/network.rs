use crate::decision::{Decision, DecisionSource};
use crate::game::ClientGameState;
use crate::rendering::Renderer;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Answers to rejected moves in a row before the client stops retrying
const MAX_REJECTIONS: u32 = 3;

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    name: String,
    connected: bool,

    game_state: ClientGameState,
    renderer: Renderer,
    source: Box<dyn DecisionSource + Send>,
    input: Option<mpsc::Receiver<String>>,

    rejections: u32,
    leave_after_game: bool,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        name: &str,
        source: Box<dyn DecisionSource + Send>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            name: name.to_string(),
            connected: false,
            game_state: ClientGameState::new(),
            renderer: Renderer::new(),
            source,
            input: None,
            rejections: 0,
            leave_after_game: false,
        })
    }

    /// Typed lines arrive on `input`; without it the client only reacts to the server
    pub fn with_input(mut self, input: mpsc::Receiver<String>) -> Self {
        self.input = Some(input);
        self
    }

    /// Disconnect as soon as a game ends instead of waiting for the next one
    pub fn leave_after_game(mut self) -> Self {
        self.leave_after_game = true;
        self
    }

    pub fn game_state(&self) -> &ClientGameState {
        &self.game_state
    }

    async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to {} as {}...", self.server_addr, self.name);

        let packet = Packet::Connect {
            client_version: PROTOCOL_VERSION,
            name: self.name.clone(),
        };
        self.send_packet(&packet).await?;

        Ok(())
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Returns false once the session is over
    async fn handle_packet(&mut self, packet: Packet) -> bool {
        self.renderer.render(&packet, &self.game_state);

        match &packet {
            Packet::Connected { name } => {
                info!("Connected as {}", name);
                self.connected = true;
            }

            Packet::Disconnected { reason } => {
                warn!("Disconnected: {}", reason);
                self.connected = false;
                return false;
            }

            Packet::Rejected { error } => {
                if !self.connected {
                    error!("Server refused to let us in: {}", error);
                    return false;
                }
                self.rejections += 1;
                if self.rejections > MAX_REJECTIONS {
                    warn!("Giving up on the current question after {} refusals", MAX_REJECTIONS);
                    return true;
                }
                let prompt = self.game_state.rejected();
                let decision = self
                    .source
                    .on_rejected(*error, prompt.as_ref(), &self.game_state);
                return self.submit(decision).await;
            }

            _ => {}
        }

        self.rejections = 0;
        let prompt = self.game_state.apply(&packet);

        if self.leave_after_game && self.game_state.game_over {
            return self.submit(Some(Decision::Quit)).await;
        }
        if let Some(prompt) = prompt {
            let decision = self.source.on_prompt(&prompt, &self.game_state);
            return self.submit(decision).await;
        }
        true
    }

    async fn handle_line(&mut self, line: &str) -> bool {
        let decision = self.source.on_input(line, &self.game_state);
        self.submit(decision).await
    }

    /// Sends a decision to the server; returns false when it ends the session
    async fn submit(&mut self, decision: Option<Decision>) -> bool {
        let Some(decision) = decision else {
            return true;
        };
        debug!("Submitting {:?}", decision);

        let (packet, keep_running) = match decision {
            Decision::Act(action) => {
                self.game_state.submitted();
                (Packet::Action(action), true)
            }
            Decision::Chat(text) => (Packet::Chat { text }, true),
            Decision::Quit => (Packet::Disconnect, false),
        };

        if let Err(e) = self.send_packet(&packet).await {
            error!("Error sending packet: {}", e);
        }
        keep_running
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await?;

        let mut input = self.input.take();
        let mut heartbeat_interval = interval(Duration::from_secs(1));
        let mut buffer = [0u8; 2048];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(packet) => {
                                if !self.handle_packet(packet).await {
                                    break;
                                }
                            }
                            Err(e) => warn!("Dropping malformed packet: {}", e),
                        },
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                line = next_line(&mut input) => {
                    match line {
                        Some(line) => {
                            if !self.handle_line(&line).await {
                                break;
                            }
                        }
                        None => {
                            debug!("Input closed");
                            input = None;
                        }
                    }
                },

                _ = heartbeat_interval.tick() => {
                    if self.connected {
                        if let Err(e) = self.send_packet(&Packet::Heartbeat).await {
                            error!("Error sending heartbeat: {}", e);
                        }
                    }
                },
            }
        }

        Ok(())
    }
}

async fn next_line(input: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match input {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
