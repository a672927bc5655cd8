// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON framing.
//!
//! Each [`IpcMessage`] occupies exactly one line: UTF-8 JSON followed by
//! `\n`. There is no length prefix; the reader scans for the delimiter,
//! enforcing [`MAX_MESSAGE_BYTES`] as it goes so a misbehaving peer can't
//! force an unbounded read-ahead buffer.

use ob_core::{IpcMessage, MAX_MESSAGE_BYTES};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::WireError;

/// Read one newline-delimited [`IpcMessage`] from `reader`.
///
/// Returns [`WireError::ConnectionClosed`] if EOF arrives with no bytes
/// read yet (the normal way a peer signals "no more requests"), and
/// [`WireError::TooLarge`] if the line grows past the cap without a
/// newline.
pub async fn read_message<R>(reader: &mut R) -> Result<IpcMessage, WireError>
where
    R: AsyncRead + Unpin,
{
    let line = read_line_capped(reader).await?;
    Ok(IpcMessage::from_line(line.trim_end_matches('\n'))?)
}

/// Write one [`IpcMessage`] as a newline-terminated JSON line.
pub async fn write_message<W>(writer: &mut W, message: &IpcMessage) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    let line = message.to_line()?;
    if line.len() > MAX_MESSAGE_BYTES {
        return Err(WireError::TooLarge { limit: MAX_MESSAGE_BYTES });
    }
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_line_capped<R>(reader: &mut R) -> Result<String, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 {
            if buf.is_empty() {
                return Err(WireError::ConnectionClosed);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        buf.push(byte[0]);
        if buf.len() > MAX_MESSAGE_BYTES {
            return Err(WireError::TooLarge { limit: MAX_MESSAGE_BYTES });
        }
    }
    String::from_utf8(buf).map_err(|_| WireError::InvalidUtf8)
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
