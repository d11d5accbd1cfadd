use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and header block, including the blank line
/// that separates it from the body.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    format!(
        "{} {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        resp.content_type,
        resp.content_length(),
    )
    .into_bytes()
}

/// Writes one framed response: the header block first, then the body.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            head: serialize_head(response),
            body: response.body.clone(),
        }
    }

    /// Sends the head and then the body, and flushes.
    ///
    /// Nothing is retried; the first failed write ends the response and
    /// the caller drops the connection.
    pub async fn write_to_stream<W>(&self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;
        stream.write_all(&self.body).await?;
        stream.flush().await
    }
}
