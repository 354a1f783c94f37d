//! Per-connection read/handle/write loop.
//!
//! Each connection is served strictly in order: a line is read, processed,
//! and its response fully written and flushed before the next line is read.
//! Fatal protocol errors end the loop after their envelope is sent; transport
//! failures end it without one. The stream is shut down on every exit path.

use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt,
    BufReader,
};
use tracing::{debug, info, warn};

use crate::error::transport::TransportError;
use crate::protocol::jsonrpc::{ErrorKind, RequestProcessor, RpcError};

/// Why a connection loop ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The peer closed its side of the stream
    EndOfStream,

    /// A fatal protocol error was reported and the connection dropped
    Fatal(ErrorKind),
}

/// One line read from the stream.
enum Line {
    Eof,
    Text(String),
    TooLong,
}

/// Serves JSON-RPC lines on a single stream.
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    processor: RequestProcessor,
    max_message_size: usize,
}

impl ConnectionHandler {
    /// Creates a handler dispatching through `processor`.
    ///
    /// Lines longer than `max_message_size` bytes, not counting the newline,
    /// are answered with a parse error and end the connection.
    pub fn new(processor: RequestProcessor, max_message_size: usize) -> Self {
        Self {
            processor,
            max_message_size,
        }
    }

    /// Runs the loop until end of stream, a fatal error or a transport failure.
    ///
    /// Both directions of the stream are closed before this returns.
    pub async fn run<S>(&self, stream: S) -> Result<Termination, TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read_half, mut write_half) = io::split(stream);
        let mut reader = BufReader::new(read_half);

        let outcome = self.serve_lines(&mut reader, &mut write_half).await;

        if let Err(e) = write_half.shutdown().await {
            debug!(error = %e, "Failed to shut down write side");
        }
        drop(reader);
        drop(write_half);

        match &outcome {
            Ok(Termination::EndOfStream) => info!("Connection closed by peer"),
            Ok(Termination::Fatal(kind)) => info!(error = %kind, "Connection closed after fatal error"),
            Err(e) => warn!(error = %e, "Connection aborted"),
        }
        outcome
    }

    async fn serve_lines<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<Termination, TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            let line = match read_line(reader, &mut buf, self.max_message_size).await? {
                Line::Eof => return Ok(Termination::EndOfStream),
                Line::TooLong => {
                    let error = RpcError::parse_error().with_data(format!(
                        "Message exceeds maximum size of {} bytes",
                        self.max_message_size
                    ));
                    write_line(writer, &error.render()).await?;
                    return Ok(Termination::Fatal(error.kind));
                }
                Line::Text(text) => text,
            };

            let request = line.trim_end();
            debug!("<-- {request}");

            match self.processor.process(request).await {
                Ok(Some(response)) => write_line(writer, &response).await?,
                Ok(None) => {}
                Err(error) => {
                    write_line(writer, &error.render()).await?;
                    if error.is_fatal() {
                        return Ok(Termination::Fatal(error.kind));
                    }
                }
            }
        }
    }
}

/// Reads up to and including the next `\n`, never buffering more than
/// `max + 1` bytes.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, max: usize) -> Result<Line, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    let read = (&mut *reader)
        .take(limit)
        .read_until(b'\n', buf)
        .await
        .map_err(TransportError::Read)?;

    if read == 0 {
        return Ok(Line::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > max {
        return Ok(Line::TooLong);
    }

    String::from_utf8(std::mem::take(buf))
        .map(Line::Text)
        .map_err(|_| TransportError::InvalidUtf8)
}

async fn write_line<W>(writer: &mut W, text: &str) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(TransportError::Write)?;
    writer.write_all(b"\n").await.map_err(TransportError::Write)?;
    writer.flush().await.map_err(TransportError::Write)?;
    debug!("--> {text}");
    Ok(())
}
