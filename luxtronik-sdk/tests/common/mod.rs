//! Scripted controller shared by the engine and driver tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::thread::{self, JoinHandle};

use luxtronik_api::LuxClient;

/// Registers in a calculated block covering every mapped index
pub const CALCULATED_LEN: usize = 269;
/// Registers in a parameter block covering every mapped index
pub const PARAMETERS_LEN: usize = 109;

/// What the scripted controller does with one accepted connection
pub enum Reply {
    /// Read the request, answer with these words
    Words(Vec<i32>),
    /// Read the request, then close without answering
    Hangup,
}

/// Scripted controller serving one connection per reply
pub struct MockController {
    port: u16,
    handle: JoinHandle<Vec<Vec<i32>>>,
}

impl MockController {
    /// Each entry pairs the request size in words with the reply to send
    pub fn start(script: Vec<(usize, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (request_words, reply) in script {
                let (mut socket, _) = listener.accept().unwrap();
                let mut raw = vec![0u8; request_words * 4];
                socket.read_exact(&mut raw).unwrap();
                seen.push(
                    raw.chunks_exact(4)
                        .map(|w| i32::from_be_bytes([w[0], w[1], w[2], w[3]]))
                        .collect(),
                );
                match reply {
                    Reply::Words(words) => {
                        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
                        socket.write_all(&bytes).unwrap();
                    }
                    Reply::Hangup => {
                        let _ = socket.shutdown(Shutdown::Both);
                    }
                }
            }
            seen
        });

        Self { port, handle }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn client(&self) -> LuxClient {
        LuxClient::new("127.0.0.1", self.port)
    }

    /// Wait for the script to finish and return every request seen
    pub fn requests(self) -> Vec<Vec<i32>> {
        self.handle.join().unwrap()
    }
}

/// Register block of `len` zeros with the given registers set
pub fn registers(len: usize, set: &[(usize, i32)]) -> Vec<i32> {
    let mut registers = vec![0; len];
    for (index, value) in set {
        registers[*index] = *value;
    }
    registers
}

/// Read-calculated response carrying `registers`
pub fn calculated_reply(registers: Vec<i32>) -> (usize, Reply) {
    let mut words = vec![3004, 0, registers.len() as i32];
    words.extend(registers);
    (2, Reply::Words(words))
}

/// Read-parameters response carrying `registers`
pub fn parameters_reply(registers: Vec<i32>) -> (usize, Reply) {
    let mut words = vec![3003, registers.len() as i32];
    words.extend(registers);
    (2, Reply::Words(words))
}

/// Write response echoing the command
pub fn write_reply() -> (usize, Reply) {
    (3, Reply::Words(vec![3002]))
}
