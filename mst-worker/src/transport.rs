//! Length-delimited JSON framing over loopback TCP.
//!
//! Workers exchange exactly one request/response pair per call; there is
//! no multiplexing and no persistent connection reuse, so a plain
//! `LengthDelimitedCodec` frame per message is all the protocol needs.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::error::WorkerError;
use crate::proto::{PropagateUpRequest, PropagateUpResponse};

/// Binds a listener on loopback, retrying on a fresh random high port
/// whenever the chosen one is already taken.
pub async fn bind_retrying(attempts: u32) -> Result<TcpListener, WorkerError> {
    for _ in 0..attempts {
        let port = rand::thread_rng().gen_range(1024..=u16::MAX);
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        if let Ok(listener) = TcpListener::bind(addr).await {
            return Ok(listener);
        }
    }
    Err(WorkerError::BindExhausted { attempts })
}

/// Sends `request` to `addr` and waits for the matching response, bounded
/// by `deadline`.
pub async fn call_propagate_up(
    addr: SocketAddr,
    request: &PropagateUpRequest,
    deadline: Duration,
) -> Result<PropagateUpResponse, WorkerError> {
    timeout(deadline, call_propagate_up_inner(addr, request))
        .await
        .map_err(|_| WorkerError::Timeout { addr, timeout: deadline })?
}

async fn call_propagate_up_inner(
    addr: SocketAddr,
    request: &PropagateUpRequest,
) -> Result<PropagateUpResponse, WorkerError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| WorkerError::Transport { addr, source })?;
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    let payload = serde_json::to_vec(request)?;
    framed
        .send(Bytes::from(payload))
        .await
        .map_err(|source| WorkerError::Transport { addr, source })?;

    let frame = framed
        .next()
        .await
        .ok_or(WorkerError::ConnectionClosed { addr })?
        .map_err(|source| WorkerError::Transport { addr, source })?;

    Ok(serde_json::from_slice(&frame)?)
}

/// Wraps an accepted (or connecting) stream in the shared framing.
pub fn frame(stream: TcpStream) -> Framed<TcpStream, LengthDelimitedCodec> {
    Framed::new(stream, LengthDelimitedCodec::new())
}

/// Reads one framed request off an accepted connection.
pub async fn read_request(
    framed: &mut Framed<TcpStream, LengthDelimitedCodec>,
    peer: SocketAddr,
) -> Result<PropagateUpRequest, WorkerError> {
    let frame = framed
        .next()
        .await
        .ok_or(WorkerError::ConnectionClosed { addr: peer })?
        .map_err(|source| WorkerError::Transport { addr: peer, source })?;
    Ok(serde_json::from_slice(&frame)?)
}

/// Writes one framed response back to an accepted connection.
pub async fn write_response(
    framed: &mut Framed<TcpStream, LengthDelimitedCodec>,
    peer: SocketAddr,
    response: &PropagateUpResponse,
) -> Result<(), WorkerError> {
    let payload = serde_json::to_vec(response)?;
    framed
        .send(Bytes::from(payload))
        .await
        .map_err(|source| WorkerError::Transport { addr: peer, source })
}
