use super::error::PeerError;
use super::message::{Handshake, Message};
use crate::constants::{
    CONNECTION_TIMEOUT, HANDSHAKE_LEN, MAX_MESSAGE_SIZE, PEER_READ_TIMEOUT, PEER_WRITE_TIMEOUT,
};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Sends and receives peer wire messages over a byte stream.
///
/// Frames are split out of an internal buffer with
/// [`Message::decode_frame`], so bytes that arrive together with a
/// handshake or a previous message are never lost.
pub struct PeerTransport<S> {
    stream: S,
    read_buf: BytesMut,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl PeerTransport<TcpStream> {
    /// Opens a TCP connection to a peer.
    pub async fn connect(addr: SocketAddr) -> Result<Self, PeerError> {
        let stream = timeout(CONNECTION_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| PeerError::Timeout)??;
        debug!("Connected to peer {}", addr);
        Ok(Self::new(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> PeerTransport<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(32 * 1024),
            read_timeout: PEER_READ_TIMEOUT,
            write_timeout: PEER_WRITE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    pub async fn send_handshake(&mut self, handshake: &Handshake) -> Result<(), PeerError> {
        self.write(&handshake.encode()).await
    }

    pub async fn receive_handshake(&mut self) -> Result<Handshake, PeerError> {
        while self.read_buf.len() < HANDSHAKE_LEN {
            self.fill().await?;
        }

        let data = self.read_buf.split_to(HANDSHAKE_LEN);
        Handshake::decode(&data)
    }

    /// Sends our handshake, then reads the peer's and checks it is for the same torrent.
    pub async fn handshake(&mut self, ours: &Handshake) -> Result<Handshake, PeerError> {
        self.send_handshake(ours).await?;
        let theirs = self.receive_handshake().await?;

        if theirs.info_hash != ours.info_hash {
            debug!(
                "Peer handshake for {} does not match {}",
                hex::encode(theirs.info_hash),
                hex::encode(ours.info_hash)
            );
            return Err(PeerError::InfoHashMismatch);
        }

        Ok(theirs)
    }

    /// Sends one message.
    ///
    /// Messages longer than [`MAX_MESSAGE_SIZE`] are rejected before anything
    /// is written, since the peer would drop them anyway.
    pub async fn send_message(&mut self, message: &Message) -> Result<(), PeerError> {
        let len = message.frame_len();
        if len > MAX_MESSAGE_SIZE {
            return Err(PeerError::malformed(format!("message too large: {}", len)));
        }
        self.write(&message.encode()).await
    }

    pub async fn receive_message(&mut self) -> Result<Message, PeerError> {
        loop {
            if let Some(message) = Message::decode_frame(&mut self.read_buf)? {
                return Ok(message);
            }
            self.fill().await?;
        }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), PeerError> {
        timeout(self.write_timeout, self.stream.write_all(data))
            .await
            .map_err(|_| PeerError::Timeout)??;
        Ok(())
    }

    async fn fill(&mut self) -> Result<(), PeerError> {
        let n = timeout(self.read_timeout, self.stream.read_buf(&mut self.read_buf))
            .await
            .map_err(|_| PeerError::Timeout)??;

        if n == 0 {
            return Err(PeerError::ConnectionClosed);
        }
        Ok(())
    }
}
