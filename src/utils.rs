// src/utils.rs
use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame body.
pub const MAX_PACKET_LEN: usize = 1024 * 1024;

/// Serializes a message into a frame body without enforcing the size cap.
pub fn encode_packet<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

/// Writes one frame: a 4-byte big-endian length followed by the body.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_PACKET_LEN {
        bail!("outgoing packet of {} bytes exceeds limit", body.len());
    }
    writer.write_all(&(body.len() as u32).to_be_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    tracing::trace!(len = body.len(), "packet written");
    Ok(())
}

/// Reads the raw body of one frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut length_buf = [0u8; 4];
    reader.read_exact(&mut length_buf).await?;
    let length = u32::from_be_bytes(length_buf) as usize;
    if length > MAX_PACKET_LEN {
        bail!("incoming packet of {length} bytes exceeds limit");
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;
    tracing::trace!(len = length, "packet read");
    Ok(body)
}

pub async fn write_packet<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    write_frame(writer, &encode_packet(msg)?).await
}

pub async fn read_packet<R, T>(reader: &mut R) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let body = read_frame(reader).await?;
    Ok(serde_json::from_slice(&body)?)
}
