//! Tracker Connection
//!
//! One short-lived socket to one tracker.

use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::TrackerEndpoint;
use crate::error::{Result, TrackerError};
use crate::protocol::{read_frame, write_frame, FramedResponse, TrackerCommand};

/// Buffered halves of one TCP stream
#[derive(Debug)]
struct StreamPair {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

/// A connection to a single tracker server
///
/// Closed explicitly with [`close`](Self::close) or when dropped. Closing
/// sends QUIT so the tracker can release the socket right away.
#[derive(Debug)]
pub struct TrackerConnection {
    /// `None` once closed
    io: Option<StreamPair>,

    /// Tracker this connection talks to
    endpoint: TrackerEndpoint,
}

impl TrackerConnection {
    /// Connect to `endpoint`, bounded by `connect_timeout`
    ///
    /// Every resolved address is tried in turn. `network_timeout` applies to
    /// each read and write afterwards; zero disables it.
    pub fn open(
        endpoint: &TrackerEndpoint,
        connect_timeout: Duration,
        network_timeout: Duration,
    ) -> Result<Self> {
        let addrs = (endpoint.address.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|source| TrackerError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    tracing::debug!("Connected to tracker {} ({})", endpoint, addr);
                    return Self::from_stream(stream, endpoint.clone(), network_timeout);
                }
                Err(e) => {
                    tracing::debug!("Connect to tracker {} ({}) failed: {}", endpoint, addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(TrackerError::Connect {
            endpoint: endpoint.to_string(),
            source: last_error.unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing")
            }),
        })
    }

    /// Wrap an already connected stream
    pub fn from_stream(
        stream: TcpStream,
        endpoint: TrackerEndpoint,
        network_timeout: Duration,
    ) -> Result<Self> {
        // Requests are tiny; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let timeout = if network_timeout.is_zero() {
            None
        } else {
            Some(network_timeout)
        };
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            io: Some(StreamPair {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(stream),
            }),
            endpoint,
        })
    }

    /// Tracker this connection talks to
    pub fn endpoint(&self) -> &TrackerEndpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.io.is_some()
    }

    /// Send one request frame
    pub fn send(&mut self, command: TrackerCommand, body: &[&[u8]]) -> Result<()> {
        let endpoint = &self.endpoint;
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| TrackerError::ConnectionClosed(endpoint.to_string()))?;

        tracing::trace!(
            "-> {} cmd={} body={} bytes",
            endpoint,
            command.code(),
            body.iter().map(|part| part.len()).sum::<usize>()
        );
        write_frame(&mut io.writer, command, body).map_err(|e| map_timeout(e, endpoint))
    }

    /// Read one response frame
    pub fn recv(&mut self, expected_body_len: Option<usize>) -> Result<FramedResponse> {
        let endpoint = &self.endpoint;
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| TrackerError::ConnectionClosed(endpoint.to_string()))?;

        let response = read_frame(&mut io.reader, TrackerCommand::Response, expected_body_len)
            .map_err(|e| map_timeout(e, endpoint))?;

        tracing::trace!(
            "<- {} status={} body={} bytes",
            endpoint,
            response.status,
            response.body.len()
        );
        Ok(response)
    }

    /// Send a request and read its response
    pub fn request(
        &mut self,
        command: TrackerCommand,
        body: &[&[u8]],
        expected_body_len: Option<usize>,
    ) -> Result<FramedResponse> {
        self.send(command, body)?;
        self.recv(expected_body_len)
    }

    /// Send QUIT and shut the socket down. Errors are ignored; calling this
    /// on a closed connection does nothing.
    pub fn close(&mut self) {
        if let Some(mut io) = self.io.take() {
            if let Err(e) = write_frame(&mut io.writer, TrackerCommand::Quit, &[]) {
                tracing::trace!("QUIT to {} not delivered: {}", self.endpoint, e);
            }
            let _ = io.writer.get_ref().shutdown(Shutdown::Both);
            tracing::debug!("Closed connection to tracker {}", self.endpoint);
        }
    }
}

impl Drop for TrackerConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Turn a read/write timeout into [`TrackerError::Timeout`]
fn map_timeout(error: TrackerError, endpoint: &TrackerEndpoint) -> TrackerError {
    match error {
        // Unix reports WouldBlock for an expired socket timeout, Windows TimedOut
        TrackerError::Io(ref e)
            if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
        {
            TrackerError::Timeout {
                endpoint: endpoint.to_string(),
            }
        }
        other => other,
    }
}
