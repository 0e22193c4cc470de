//! Mock port implementation for testing.
//!
//! Provides a `MockPort` that behaves like a serial device without requiring
//! hardware: reads block until data is fed in or the port is closed, writes
//! are logged, and faults can be injected.

use super::error::PortError;
use super::traits::PortHandle;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Inner state of the mock port, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Every successful write, in call order.
    write_log: Vec<Vec<u8>>,
    /// Device end of stream: reads return `Ok(0)` once the queue drains.
    eof: bool,
    /// Error to return from the next read.
    read_fault: Option<std::io::ErrorKind>,
    closed: bool,
    close_calls: usize,
}

/// Mock serial port for testing.
///
/// Clones share state, so a test can keep one clone to feed and inspect the
/// port while the forwarder drives another.
///
/// # Example
/// ```
/// use sercat::port::{MockPort, PortHandle};
///
/// let port = MockPort::new("MOCK0");
/// port.feed(b"Hello, World!");
///
/// let mut buffer = [0u8; 13];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"Hello, World!");
///
/// port.write_bytes(b"Response").unwrap();
/// assert_eq!(port.written(), b"Response");
/// ```
#[derive(Clone)]
pub struct MockPort {
    name: String,
    state: Arc<(Mutex<MockPortState>, Condvar)>,
}

impl MockPort {
    /// Create a new mock port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new((Mutex::new(MockPortState::default()), Condvar::new())),
        }
    }

    /// Queue bytes for subsequent reads and wake a blocked reader.
    pub fn feed(&self, data: &[u8]) {
        let (lock, cvar) = &*self.state;
        lock.lock().read_queue.extend(data);
        cvar.notify_all();
    }

    /// Signal end of stream once the queued bytes are consumed.
    pub fn finish(&self) {
        let (lock, cvar) = &*self.state;
        lock.lock().eof = true;
        cvar.notify_all();
    }

    /// Make the next read fail with an I/O error of this kind.
    pub fn inject_read_fault(&self, kind: std::io::ErrorKind) {
        let (lock, cvar) = &*self.state;
        lock.lock().read_fault = Some(kind);
        cvar.notify_all();
    }

    /// All bytes written so far, concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.state.0.lock().write_log.concat()
    }

    /// Get a copy of every write call's payload.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        self.state.0.lock().write_log.clone()
    }

    /// Number of times `close` was invoked, including no-op repeats.
    pub fn close_calls(&self) -> usize {
        self.state.0.lock().close_calls
    }

    /// Get the number of bytes waiting to be read.
    pub fn available_bytes(&self) -> usize {
        self.state.0.lock().read_queue.len()
    }

    /// Block until at least `len` bytes have been written or `timeout` elapses.
    pub fn wait_for_written(&self, len: usize, timeout: Duration) -> Vec<u8> {
        let deadline = Instant::now() + timeout;
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock();
        loop {
            let total: usize = state.write_log.iter().map(Vec::len).sum();
            if total >= len || cvar.wait_until(&mut state, deadline).timed_out() {
                return state.write_log.concat();
            }
        }
    }
}

impl PortHandle for MockPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock();
        loop {
            if state.closed {
                return Err(PortError::Closed);
            }
            if let Some(kind) = state.read_fault.take() {
                return Err(PortError::Io(std::io::Error::new(kind, "injected fault")));
            }
            if !state.read_queue.is_empty() {
                let n = buffer.len().min(state.read_queue.len());
                for (slot, byte) in buffer.iter_mut().zip(state.read_queue.drain(..n)) {
                    *slot = byte;
                }
                return Ok(n);
            }
            if state.eof {
                return Ok(0);
            }
            cvar.wait(&mut state);
        }
    }

    fn write_bytes(&self, data: &[u8]) -> Result<usize, PortError> {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock();
        if state.closed {
            return Err(PortError::Closed);
        }
        state.write_log.push(data.to_vec());
        cvar.notify_all();
        Ok(data.len())
    }

    fn close(&self) -> Result<(), PortError> {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock();
        state.close_calls += 1;
        state.closed = true;
        cvar.notify_all();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.0.lock().closed
    }
}

impl std::fmt::Debug for MockPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_feed_and_read() {
        let port = MockPort::new("MOCK0");
        port.feed(b"Hello");

        let mut buffer = [0u8; 10];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buffer[..n], b"Hello");
    }

    #[test]
    fn test_partial_read() {
        let port = MockPort::new("MOCK0");
        port.feed(b"Hello, World!");

        let mut buffer = [0u8; 5];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"Hello");
        assert_eq!(port.available_bytes(), 8);
    }

    #[test]
    fn test_write_logging() {
        let port = MockPort::new("MOCK0");
        port.write_bytes(b"Test1").unwrap();
        port.write_bytes(b"Test2").unwrap();

        let log = port.write_log();
        assert_eq!(log, vec![b"Test1".to_vec(), b"Test2".to_vec()]);
        assert_eq!(port.written(), b"Test1Test2");
    }

    #[test]
    fn test_close_releases_blocked_read() {
        let port = MockPort::new("MOCK0");
        let reader = port.clone();
        let handle = thread::spawn(move || {
            let mut buffer = [0u8; 4];
            reader.read_bytes(&mut buffer)
        });

        thread::sleep(Duration::from_millis(50));
        port.close().unwrap();

        let result = handle.join().unwrap();
        assert!(matches!(result, Err(PortError::Closed)));
    }

    #[test]
    fn test_io_after_close() {
        let port = MockPort::new("MOCK0");
        port.close().unwrap();
        port.close().unwrap();

        assert!(port.is_closed());
        assert_eq!(port.close_calls(), 2);
        assert!(matches!(port.write_bytes(b"x"), Err(PortError::Closed)));
        let mut buffer = [0u8; 1];
        assert!(matches!(port.read_bytes(&mut buffer), Err(PortError::Closed)));
    }

    #[test]
    fn test_end_of_stream() {
        let port = MockPort::new("MOCK0");
        port.feed(b"ab");
        port.finish();

        let mut buffer = [0u8; 8];
        assert_eq!(port.read_bytes(&mut buffer).unwrap(), 2);
        assert_eq!(port.read_bytes(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_injected_fault() {
        let port = MockPort::new("MOCK0");
        port.inject_read_fault(std::io::ErrorKind::BrokenPipe);

        let mut buffer = [0u8; 1];
        match port.read_bytes(&mut buffer) {
            Err(PortError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("Expected injected fault, got: {:?}", other),
        }
    }

    #[test]
    fn test_wait_for_written() {
        let port = MockPort::new("MOCK0");
        let writer = port.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.write_all_bytes(b"late").unwrap();
        });

        let written = port.wait_for_written(4, Duration::from_secs(2));
        assert_eq!(written, b"late");
    }
}
