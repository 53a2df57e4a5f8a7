//! Peer link over TCP: length-prefixed bincode frames.
//!
//! The socket lives on a dedicated network thread running a small tokio
//! runtime; the frame-driven game loop talks to it through channels and
//! never blocks. Link loss surfaces as a [`NetEvent::Disconnected`] event,
//! matching the "ordered, reliable, or dead" channel contract.

use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::Packet;
use std::io;
use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Upper bound on a single frame; every real packet is far smaller.
const MAX_FRAME_BYTES: u32 = 64 * 1024;

/// Events delivered from the network thread to the game loop.
#[derive(Debug)]
pub enum NetEvent {
    /// Host only: the listener is bound and waiting for the peer.
    Listening(SocketAddr),
    /// The peer link is open.
    Connected,
    Packet(Packet),
    /// The link is gone; the payload is a human-readable reason.
    Disconnected(String),
}

enum Endpoint {
    Listen(u16),
    Connect(String),
}

/// Writes one length-prefixed bincode frame.
pub async fn write_packet<W: AsyncWrite + Unpin>(writer: &mut W, packet: &Packet) -> io::Result<()> {
    let payload =
        serialize(packet).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = payload.len() as u32;
    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await
}

/// Reads one length-prefixed bincode frame.
pub async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Packet> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_le_bytes(len_bytes);
    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds limit", len),
        ));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    deserialize(&payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Handle to the peer link held by the game loop.
pub struct Transport {
    outbound: mpsc::UnboundedSender<Packet>,
    inbound: std_mpsc::Receiver<NetEvent>,
}

impl Transport {
    /// Hosts a match: binds the port and waits for exactly one peer.
    pub fn host(port: u16) -> Transport {
        Transport::spawn(Endpoint::Listen(port))
    }

    /// Joins a hosted match at `addr` (e.g. `192.168.1.10:7777`).
    pub fn connect(addr: String) -> Transport {
        Transport::spawn(Endpoint::Connect(addr))
    }

    fn spawn(endpoint: Endpoint) -> Transport {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = std_mpsc::channel();

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start network runtime: {}", e);
                    let _ = inbound_tx.send(NetEvent::Disconnected(e.to_string()));
                    return;
                }
            };
            runtime.block_on(run_link(endpoint, outbound_rx, inbound_tx));
        });

        Transport {
            outbound: outbound_tx,
            inbound: inbound_rx,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        outbound: mpsc::UnboundedSender<Packet>,
        inbound: std_mpsc::Receiver<NetEvent>,
    ) -> Transport {
        Transport { outbound, inbound }
    }

    /// Queues a packet for the peer. Silently drops it once the link is
    /// dead: the `Disconnected` event is the signal that matters.
    pub fn send(&self, packet: Packet) {
        let _ = self.outbound.send(packet);
    }

    /// Returns the next pending event, if any. Never blocks.
    pub fn poll(&self) -> Option<NetEvent> {
        self.inbound.try_recv().ok()
    }
}

async fn run_link(
    endpoint: Endpoint,
    mut outbound_rx: mpsc::UnboundedReceiver<Packet>,
    inbound_tx: std_mpsc::Sender<NetEvent>,
) {
    let stream = match establish(endpoint, &inbound_tx).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Connection failed: {}", e);
            let _ = inbound_tx.send(NetEvent::Disconnected(e.to_string()));
            return;
        }
    };

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }
    let _ = inbound_tx.send(NetEvent::Connected);

    let (mut reader, mut writer) = stream.into_split();

    let writer_task = tokio::spawn(async move {
        while let Some(packet) = outbound_rx.recv().await {
            if let Err(e) = write_packet(&mut writer, &packet).await {
                warn!("Send failed: {}", e);
                break;
            }
        }
    });

    loop {
        match read_packet(&mut reader).await {
            Ok(packet) => {
                if inbound_tx.send(NetEvent::Packet(packet)).is_err() {
                    // Game loop dropped its handle; shut the link down.
                    break;
                }
            }
            Err(e) => {
                let reason = if e.kind() == io::ErrorKind::UnexpectedEof {
                    "peer closed the connection".to_string()
                } else {
                    e.to_string()
                };
                let _ = inbound_tx.send(NetEvent::Disconnected(reason));
                break;
            }
        }
    }

    writer_task.abort();
}

async fn establish(
    endpoint: Endpoint,
    inbound_tx: &std_mpsc::Sender<NetEvent>,
) -> io::Result<TcpStream> {
    match endpoint {
        Endpoint::Listen(port) => {
            let listener = TcpListener::bind(("0.0.0.0", port)).await?;
            let local = listener.local_addr()?;
            info!("Hosting on {}, waiting for peer...", local);
            let _ = inbound_tx.send(NetEvent::Listening(local));
            let (stream, peer) = listener.accept().await?;
            info!("Peer connected from {}", peer);
            Ok(stream)
        }
        Endpoint::Connect(addr) => {
            info!("Connecting to {}...", addr);
            let stream = TcpStream::connect(&addr).await?;
            info!("Connected to {}", addr);
            Ok(stream)
        }
    }
}
