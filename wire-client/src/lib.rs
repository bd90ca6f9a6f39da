//! Private register client for Luxtronik controller communication
//!
//! This crate provides a minimal client for the controller's binary TCP
//! protocol: a request frame is written, the matching response frame is read,
//! and the connection is closed again. Every exchange uses a fresh connection.

pub mod codec;
mod error;

pub use codec::{decode_response, encode_request, RegisterFrame, Request, ResponseShape, MAX_REGISTERS};
pub use error::WireError;

use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

/// A minimal client for register exchanges with a single controller
#[derive(Debug, Clone)]
pub struct WireClient {
    host: String,
    port: u16,
    io_timeout: Option<Duration>,
}

impl WireClient {
    /// Create a client for the controller at `host:port`
    ///
    /// No connection is opened until [`WireClient::exchange`] is called.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            io_timeout: None,
        }
    }

    /// Bound connect, read and write operations by `timeout`
    ///
    /// Without a timeout the operating system defaults apply, which means a
    /// wedged controller can block an exchange indefinitely.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Perform one full exchange: connect, send, receive, close
    ///
    /// The connection is closed whether the exchange succeeds or fails. If
    /// connecting fails no bytes are sent.
    pub fn exchange(&self, request: &Request) -> Result<RegisterFrame, WireError> {
        let mut stream = self.connect()?;

        let result = self.exchange_on(&mut stream, request);

        // The peer may already have gone away; closing is best effort.
        let _ = stream.shutdown(Shutdown::Both);

        result
    }

    fn exchange_on(&self, stream: &mut TcpStream, request: &Request) -> Result<RegisterFrame, WireError> {
        debug!(
            command = request.command,
            address = ?request.address,
            value = ?request.value,
            "sending request"
        );

        stream.write_all(&encode_request(request))?;
        stream.flush()?;

        let frame = decode_response(request, &mut *stream)?;
        debug!(
            command = frame.command,
            status = ?frame.status,
            registers = frame.length(),
            "received response"
        );
        Ok(frame)
    }

    fn connect(&self) -> Result<TcpStream, WireError> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| WireError::Connection(format!("Failed to resolve {}:{}: {}", self.host, self.port, e)))?
            .collect();

        let mut last_error = None;
        for addr in addrs {
            let attempt = match self.io_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream.set_read_timeout(self.io_timeout)?;
                    stream.set_write_timeout(self.io_timeout)?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(WireError::Connection(match last_error {
            Some(e) => format!("Failed to connect to {}:{}: {}", self.host, self.port, e),
            None => format!("No address found for {}:{}", self.host, self.port),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_client_creation() {
        let client = WireClient::new("127.0.0.1", 8889);
        assert_eq!(client.host(), "127.0.0.1");
        assert_eq!(client.port(), 8889);
    }

    #[test]
    fn test_exchange_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut request = [0u8; 8];
            socket.read_exact(&mut request).unwrap();
            socket.write_all(&words(&[3003, 2, 215, 450])).unwrap();

            // The client must close its side once the frame is read
            let mut rest = Vec::new();
            socket.read_to_end(&mut rest).unwrap();
            (request, rest)
        });

        let client = WireClient::new("127.0.0.1", port);
        let frame = client
            .exchange(&Request::read(3003, 0, ResponseShape::Registers))
            .unwrap();

        assert_eq!(frame.registers, vec![215, 450]);

        let (request, rest) = server.join().unwrap();
        assert_eq!(request.to_vec(), words(&[3003, 0]));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_connect_failure_is_connection_error() {
        // Bind and drop to obtain a port with nothing listening on it
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = WireClient::new("127.0.0.1", port);
        let result = client.exchange(&Request::bare(3005));

        assert!(matches!(result, Err(WireError::Connection(_))));
    }

    #[test]
    fn test_peer_closing_mid_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut request = [0u8; 8];
            socket.read_exact(&mut request).unwrap();
            socket.write_all(&words(&[3003, 5, 1])).unwrap();
        });

        let client = WireClient::new("127.0.0.1", port);
        let result = client.exchange(&Request::read(3003, 0, ResponseShape::Registers));
        server.join().unwrap();

        assert!(matches!(result, Err(WireError::Connection(_))));
    }
}
