use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::http::parser::{self, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::static_files::FileResolver;

const READ_CHUNK: usize = 1024;

/// Bounds on draining unread input after shutdown, before the stream drops.
const LINGER: Duration = Duration::from_millis(100);
const LINGER_MAX_BYTES: usize = 64 * 1024;

/// Per-connection bounds taken from the server configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub max_request_line: usize,
    pub read_timeout: Option<Duration>,
}

impl ConnectionLimits {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self {
            max_request_line: cfg.max_request_line,
            read_timeout: cfg.read_timeout(),
        }
    }
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

/// One accepted connection, driven through a single request and response.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    resolver: Arc<FileResolver>,
    limits: ConnectionLimits,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

/// What came out of reading the request line.
#[derive(Debug)]
pub enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    /// Peer closed without sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Arc<FileResolver>, limits: ConnectionLimits) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            resolver,
            limits,
        }
    }

    /// Reads one request, answers it, and shuts the stream down.
    ///
    /// Parse failures, unknown methods and missing files all become error
    /// pages. Only I/O failures come back as `Err`; the stream is dropped
    /// with the connection either way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            info!(error = %e, status = 400, "Malformed request");
                            ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = handle_request(&req, &self.resolver).await;
                    info!(
                        method = %req.method,
                        path = %req.path_lossy(),
                        status = response.status.as_u16(),
                        bytes = response.content_length(),
                        "Request served"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                }

                ConnectionState::Closed => {
                    // peer may already be gone
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown after response failed");
                    }
                    self.linger().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Buffers input until a whole request line is available.
    ///
    /// Blank lines ahead of the request line are skipped but still count
    /// toward `max_request_line`; going over it is reported as too long.
    /// The read timeout covers the whole line, not each read. If the peer
    /// closes mid-line, whatever arrived is parsed as the line.
    pub async fn read_request(&mut self) -> io::Result<ReadOutcome> {
        let limit = self.limits.max_request_line;
        let deadline = self.limits.read_timeout.map(|t| Instant::now() + t);
        let mut skipped = 0;

        loop {
            if let Some(end) = parser::find_line_end(&self.buffer) {
                if skipped + end >= limit {
                    return Ok(ReadOutcome::Malformed(ParseError::TooLong { limit }));
                }
                let line = self.buffer.split_to(end + 1);
                if parser::is_blank_line(&line) {
                    skipped += line.len();
                    continue;
                }
                return Ok(parse_outcome(&line));
            }

            if skipped + self.buffer.len() >= limit {
                return Ok(ReadOutcome::Malformed(ParseError::TooLong { limit }));
            }

            if self.read_more(deadline).await? == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                let line = self.buffer.split();
                return Ok(parse_outcome(&line));
            }
        }
    }

    async fn linger(&mut self) {
        let mut scratch = [0u8; READ_CHUNK];
        let mut discarded = 0;

        let drain = async {
            while discarded < LINGER_MAX_BYTES {
                match self.stream.read(&mut scratch).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => discarded += n,
                }
            }
        };
        let _ = tokio::time::timeout(LINGER, drain).await;
    }

    async fn read_more(&mut self, deadline: Option<Instant>) -> io::Result<usize> {
        self.buffer.reserve(READ_CHUNK);
        let read = self.stream.read_buf(&mut self.buffer);

        match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, read).await.map_err(|_| {
                io::Error::new(io::ErrorKind::TimedOut, "timed out waiting for request line")
            })?,
            None => read.await,
        }
    }
}

fn parse_outcome(line: &[u8]) -> ReadOutcome {
    match parser::parse_request_line(line) {
        Ok(req) => ReadOutcome::Request(req),
        Err(e) => ReadOutcome::Malformed(e),
    }
}

/// Builds the response for a parsed request.
///
/// GET is looked up under the web root; every other method is refused
/// without touching the filesystem.
pub async fn handle_request(req: &Request, resolver: &FileResolver) -> Response {
    if !req.is_get() {
        return Response::method_not_allowed();
    }

    match resolver.resolve(&req.path).await {
        Ok(file) => Response::ok(file.content_type, file.body),
        Err(_) => Response::not_found(),
    }
}
