//! Line-oriented request/response transport to the game server.
//!
//! Every request is a single line; the server answers with one line, or
//! with a multi-line block when the leading line is the `OK LONG`
//! acknowledgement. Long responses are closed by a terminator control line
//! which is returned to the caller (the snapshot decoder strips framing
//! itself).
//!
//! Every read carries an explicit deadline. The protocol has no timeout of
//! its own, and a request that never answers would otherwise block the
//! primary loop forever; here it becomes a fatal [`TransportError::Timeout`]
//! that tears the match down in an orderly way.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use agent_core::protocol::tokens;

/// Control line closing a long response block.
pub const LONG_TERMINATOR: &str = "ENDOFLONG";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection to the game server failed")]
    Connect(#[source] std::io::Error),

    #[error("i/o failure on the server socket")]
    Io(#[from] std::io::Error),

    #[error("server closed the connection")]
    ConnectionClosed,

    #[error("no response within {timeout:?}")]
    Timeout { timeout: Duration },
}

/// One blocking request/response exchange with the server.
#[async_trait]
pub trait Transport: Send {
    /// Sends a request line and returns the complete response, one entry
    /// per line, framing included.
    async fn exchange(&mut self, request: &str) -> Result<Vec<String>, TransportError>;
}

/// TCP transport speaking the newline-framed protocol.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    timeout: Duration,
}

impl TcpTransport {
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(TransportError::Connect)?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            timeout,
        })
    }

    async fn read_line(&mut self) -> Result<String, TransportError> {
        let mut line = String::new();
        let read = tokio::time::timeout(self.timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| TransportError::Timeout {
                timeout: self.timeout,
            })??;
        if read == 0 {
            return Err(TransportError::ConnectionClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exchange(&mut self, request: &str) -> Result<Vec<String>, TransportError> {
        self.writer.write_all(request.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        let first = self.read_line().await?;
        let mut lines = vec![first];

        if lines[0] == tokens::LONG {
            loop {
                let line = self.read_line().await?;
                let done = line == LONG_TERMINATOR;
                lines.push(line);
                if done {
                    break;
                }
            }
        }

        Ok(lines)
    }
}
