//! Shared test utilities for the forwarding tests.
//!
//! - `SharedSink`: an output stream whose contents the test can inspect
//! - `BrokenSink`: an output stream that always fails
//! - `ChunkedInput`: an input stream fed one chunk at a time, blocking in between

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io::{self, Read, Write};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Output stream backed by a shared buffer.
#[derive(Clone, Default)]
pub struct SharedSink {
    buffer: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<Mutex<usize>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn flushes(&self) -> usize {
        *self.flushes.lock()
    }

    /// Poll until at least `len` bytes arrived or `timeout` elapsed.
    pub async fn wait_for(&self, len: usize, timeout: Duration) -> Vec<u8> {
        let deadline = Instant::now() + timeout;
        loop {
            let contents = self.contents();
            if contents.len() >= len || Instant::now() >= deadline {
                return contents;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        *self.flushes.lock() += 1;
        Ok(())
    }
}

/// Output stream that always fails, like stdout piped into a closed reader.
pub struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Input stream that delivers the chunks sent through its `Sender` and blocks
/// in between, like an interactive terminal.
///
/// While any `Sender` is alive and silent, a read never returns; dropping
/// every `Sender` ends the stream.
pub struct ChunkedInput {
    chunks: Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl ChunkedInput {
    pub fn new() -> (Sender<Vec<u8>>, Self) {
        let (tx, rx) = channel();
        let input = Self {
            chunks: rx,
            pending: Vec::new(),
        };
        (tx, input)
    }
}

impl Read for ChunkedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.chunks.recv() {
                Ok(chunk) => self.pending = chunk,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}
