//! Native messaging frame codec.
//!
//! Each message on the channel is a 4-byte little-endian unsigned length
//! followed by that many bytes of UTF-8 JSON. A clean end-of-stream at a
//! frame boundary is a normal disconnect; EOF inside a frame is a framing
//! error.
//!
//! Inbound messages are capped at 1 MiB, the limit browsers place on
//! host-to-browser native messages.

// ============================================================================
// Imports
// ============================================================================

use std::io::ErrorKind;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Maximum accepted inbound message size (1 MiB).
pub const MAX_INBOUND_MESSAGE: usize = 1024 * 1024;

// ============================================================================
// Read
// ============================================================================

/// Reads one framed message.
///
/// Returns `Ok(None)` on a clean end-of-stream at a frame boundary.
///
/// # Errors
///
/// - [`Error::Frame`] on EOF inside a frame or an oversized length prefix
/// - [`Error::Json`] if the payload is not valid JSON
/// - [`Error::Io`] on any other read failure
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Value>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(Error::frame("channel closed inside a length prefix"));
        }
        filled += n;
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_INBOUND_MESSAGE {
        return Err(Error::frame(format!(
            "inbound message of {len} bytes exceeds the {MAX_INBOUND_MESSAGE}-byte limit"
        )));
    }

    let mut payload = vec![0u8; len];
    if let Err(e) = reader.read_exact(&mut payload).await {
        return Err(if e.kind() == ErrorKind::UnexpectedEof {
            Error::frame("channel closed inside a payload")
        } else {
            Error::Io(e)
        });
    }

    Ok(Some(serde_json::from_slice(&payload)?))
}

// ============================================================================
// Write
// ============================================================================

/// Writes one framed message and flushes.
///
/// # Errors
///
/// - [`Error::Json`] if the message fails to serialize
/// - [`Error::Frame`] if the payload exceeds the `u32` length prefix
/// - [`Error::Io`] on write failure
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(message)?;
    let len = u32::try_from(payload.len())
        .map_err(|_| Error::frame("outbound message exceeds the u32 length prefix"))?;

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_roundtrip() {
        let (mut client, mut server) = tokio::io::duplex(4096);

        let message = json!({ "action": "get_page_data" });
        write_message(&mut client, &message).await.expect("write");

        let back = read_message(&mut server)
            .await
            .expect("read")
            .expect("one frame");
        assert_eq!(back, message);
    }

    #[tokio::test]
    async fn test_multiple_frames_in_order() {
        let (mut client, mut server) = tokio::io::duplex(4096);

        write_message(&mut client, &json!(1)).await.expect("write");
        write_message(&mut client, &json!(2)).await.expect("write");

        assert_eq!(read_message(&mut server).await.unwrap(), Some(json!(1)));
        assert_eq!(read_message(&mut server).await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_clean_eof_is_none() {
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);

        assert!(read_message(&mut server).await.expect("clean eof").is_none());
    }

    #[tokio::test]
    async fn test_eof_inside_length_prefix() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(&[42u8, 0]).await.expect("partial prefix");
        drop(client);

        let err = read_message(&mut server).await.expect_err("truncated");
        assert!(matches!(err, Error::Frame { .. }));
    }

    #[tokio::test]
    async fn test_eof_inside_payload() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client
            .write_all(&8u32.to_le_bytes())
            .await
            .expect("prefix");
        client.write_all(b"tru").await.expect("partial payload");
        drop(client);

        let err = read_message(&mut server).await.expect_err("truncated");
        assert!(matches!(err, Error::Frame { .. }));
    }

    #[tokio::test]
    async fn test_oversized_inbound_rejected() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let len = (MAX_INBOUND_MESSAGE as u32) + 1;
        client.write_all(&len.to_le_bytes()).await.expect("prefix");

        let err = read_message(&mut server).await.expect_err("oversized");
        assert!(matches!(err, Error::Frame { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_payload() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(&3u32.to_le_bytes()).await.expect("prefix");
        client.write_all(b"{{{").await.expect("payload");

        let err = read_message(&mut server).await.expect_err("bad json");
        assert!(matches!(err, Error::Json(_)));
    }
}
