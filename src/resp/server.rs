use std::future::Future;
use std::net::SocketAddr;

use bytes::{Buf, BytesMut};
use redis_protocol::resp2::decode::decode;
use redis_protocol::resp2::encode::encode;
use redis_protocol::resp2::types::{OwnedFrame as RespFrame, Resp2Frame};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::handler::handle_command;
use crate::broker::BrokerService;

#[derive(Debug, Clone)]
pub struct RespConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RespConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6380,
        }
    }
}

impl RespConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// RESP Server
///
/// Every connection runs on its own task, so a `GET` parked on an empty
/// queue only holds up the connection that sent it.
pub struct RespServer {
    listener: TcpListener,
    broker: BrokerService,
}

impl RespServer {
    pub async fn bind(config: &RespConfig, broker: BrokerService) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        Ok(Self { listener, broker })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves. Connections that are
    /// already open are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("qbroker RESP server listening on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            let (socket, peer_addr) = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted?,
            };
            tracing::debug!("new connection from {}", peer_addr);

            let broker = self.broker.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(socket, broker).await {
                    tracing::warn!(%peer_addr, "connection error: {} (kind: {:?})", e, e.kind());
                }
            });
        }
    }
}

async fn handle_connection(mut socket: TcpStream, broker: BrokerService) -> std::io::Result<()> {
    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        let n = socket.read_buf(&mut buffer).await?;
        if n == 0 {
            if !buffer.is_empty() {
                tracing::debug!("connection closed with {} unparsed bytes", buffer.len());
            }
            return Ok(());
        }

        loop {
            match decode(&buffer) {
                Ok(Some((frame, consumed))) => {
                    buffer.advance(consumed);
                    tracing::trace!("received frame: {:?}", frame);

                    // A client that hangs up while its GET is parked must not
                    // claim the next payload.
                    let response = tokio::select! {
                        biased;
                        response = handle_command(frame, &broker) => response,
                        closed = read_until_closed(&mut socket, &mut buffer) => {
                            closed?;
                            tracing::debug!("client closed while a command was pending");
                            return Ok(());
                        }
                    };
                    write_frame(&mut socket, &response).await?;
                }
                // Incomplete frame, read more.
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("protocol error: {:?}", e);
                    let reply = RespFrame::Error(format!("ERR protocol error: {e}"));
                    write_frame(&mut socket, &reply).await?;
                    buffer.clear();
                    break;
                }
            }
        }
    }
}

/// Keeps reading (pipelined requests land in `buffer`) until the peer
/// closes its side.
async fn read_until_closed(socket: &mut TcpStream, buffer: &mut BytesMut) -> std::io::Result<()> {
    loop {
        if socket.read_buf(buffer).await? == 0 {
            return Ok(());
        }
    }
}

async fn write_frame(socket: &mut TcpStream, frame: &RespFrame) -> std::io::Result<()> {
    let bytes = encode_frame(frame)?;
    socket.write_all(&bytes).await
}

fn encode_frame(frame: &RespFrame) -> std::io::Result<Vec<u8>> {
    let mut bytes = vec![0u8; frame.encode_len()];
    let written = encode(&mut bytes, frame).map_err(|e| {
        tracing::error!("encode error: {:?}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;
    bytes.truncate(written);
    Ok(bytes)
}
