//! Agent wire protocol codec
//!
//! Messages use HTTP-style headers followed by a JSON body:
//! ```text
//! Content-Length: <byte-length>\r\n
//! \r\n
//! <JSON body>
//! ```

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::Error;

/// Upper bound on a single message body
const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

/// Read one framed message
///
/// Returns `Ok(None)` on a clean end of stream before any header byte.
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Option<String>, Error> {
    let mut content_length: Option<usize> = None;
    let mut first_line = true;

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await.map_err(eof_as_crash)?;

        if bytes_read == 0 {
            if first_line {
                return Ok(None);
            }
            return Err(Error::AgentCrashed);
        }
        first_line = false;

        // Empty line ends the headers
        if line == "\r\n" || line == "\n" {
            break;
        }

        let line = line.trim();
        if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = Some(value.trim().parse().map_err(|_| {
                Error::AgentProtocol(format!("Invalid Content-Length: {}", value.trim()))
            })?);
        }
    }

    let len = content_length
        .ok_or_else(|| Error::AgentProtocol("Missing Content-Length header".to_string()))?;

    if len > MAX_MESSAGE_BYTES {
        return Err(Error::AgentProtocol(format!(
            "Content-Length too large: {} bytes",
            len
        )));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(eof_as_crash)?;

    String::from_utf8(body)
        .map(Some)
        .map_err(|e| Error::AgentProtocol(format!("Invalid UTF-8: {}", e)))
}

fn eof_as_crash(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::AgentCrashed
    } else {
        Error::Io(e)
    }
}

/// Write one framed message
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<(), Error> {
    let header = format!("Content-Length: {}\r\n\r\n", json.len());

    writer.write_all(header.as_bytes()).await?;
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}
