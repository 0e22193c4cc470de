//! Duplex forwarding between an open port and a pair of byte streams.
//!
//! Two loops run in parallel:
//!
//! - **port → output**: a blocking task that reads the port and writes every
//!   chunk to the output, flushing as it goes.
//! - **input → port**: a detached OS thread that reads the input and writes it
//!   to the port.
//!
//! On interrupt the port is closed, which ends the port → output loop. That
//! loop is then joined and `run` returns. The input loop is never joined: a
//! read on an interactive stdin has no way to be cancelled, so the thread is
//! left blocked and is torn down with the process.

use crate::error::AppResult;
use crate::port::{PortError, PortHandle};
use std::future::Future;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Size of the copy buffer used by each direction.
pub const BUFFER_SIZE: usize = 8 * 1024;

/// Why a copy loop stopped.
#[derive(Debug)]
pub enum LoopExit {
    /// The port was closed, normally by the interrupt handler.
    Closed,
    /// The source reached end of stream.
    EndOfStream,
    /// The port reported an error while it was still open.
    Port(PortError),
    /// The input or output stream failed.
    Stream(io::Error),
}

impl LoopExit {
    /// Whether this exit is part of an ordinary shutdown.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Closed | Self::EndOfStream)
    }

    fn from_port_error(port: &dyn PortHandle, err: PortError) -> Self {
        if err.is_closed() || port.is_closed() {
            Self::Closed
        } else {
            Self::Port(err)
        }
    }

    fn log(&self, direction: &'static str) {
        match self {
            Self::Closed => tracing::debug!(direction, "copy loop stopped: port closed"),
            Self::EndOfStream => tracing::debug!(direction, "copy loop stopped: end of stream"),
            Self::Port(e) => tracing::warn!(direction, error = %e, "copy loop stopped: port fault"),
            Self::Stream(e) => {
                tracing::warn!(direction, error = %e, "copy loop stopped: stream fault")
            }
        }
    }
}

/// Bridges a port to an input and an output stream until interrupted.
#[derive(Debug)]
pub struct Forwarder {
    port: Arc<dyn PortHandle>,
}

impl Forwarder {
    pub fn new(port: Arc<dyn PortHandle>) -> Self {
        Self { port }
    }

    /// Forward between the port and the process's stdin/stdout.
    pub async fn run<F>(self, interrupt: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        self.run_with(io::stdin(), io::stdout(), interrupt).await
    }

    /// Forward between the port and the given streams.
    ///
    /// Returns `Ok(())` once `interrupt` has resolved, the port has been
    /// closed, and the port → output loop has finished. Faults in either
    /// direction are logged, not returned. Only a failure to start the input
    /// thread is reported as an error.
    pub async fn run_with<R, W, F>(self, input: R, output: W, interrupt: F) -> AppResult<()>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
        F: Future<Output = ()>,
    {
        let port = self.port;
        tracing::info!(port = port.name(), "forwarding started");

        let reader = Arc::clone(&port);
        let output_loop =
            tokio::task::spawn_blocking(move || copy_port_to_output(&*reader, output));

        // Not joined: it may stay blocked on input until the process exits.
        let writer = Arc::clone(&port);
        let spawned = std::thread::Builder::new()
            .name("sercat-input".to_string())
            .spawn(move || {
                copy_input_to_port(input, &*writer).log("input->port");
            });
        if let Err(e) = spawned {
            close(&*port);
            let _ = output_loop.await;
            return Err(e.into());
        }

        interrupt.await;
        tracing::info!(port = port.name(), "interrupt received, shutting down");
        close(&*port);

        match output_loop.await {
            Ok(exit) => exit.log("port->output"),
            Err(e) => tracing::warn!(error = %e, "port->output loop did not complete"),
        }
        Ok(())
    }
}

fn close(port: &dyn PortHandle) {
    if let Err(e) = port.close() {
        tracing::warn!(port = port.name(), error = %e, "failed to close port");
    }
}

/// Copy port bytes to `output` until the port closes, ends, or fails.
pub fn copy_port_to_output<W: Write>(port: &dyn PortHandle, mut output: W) -> LoopExit {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let n = match port.read_bytes(&mut buffer) {
            Ok(0) => return LoopExit::EndOfStream,
            Ok(n) => n,
            Err(e) => return LoopExit::from_port_error(port, e),
        };
        if let Err(e) = output.write_all(&buffer[..n]).and_then(|()| output.flush()) {
            return LoopExit::Stream(e);
        }
    }
}

/// Copy `input` bytes to the port until the input ends or either side fails.
pub fn copy_input_to_port<R: Read>(mut input: R, port: &dyn PortHandle) -> LoopExit {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => return LoopExit::EndOfStream,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return LoopExit::Stream(e),
        };
        if let Err(e) = port.write_all_bytes(&buffer[..n]) {
            return LoopExit::from_port_error(port, e);
        }
    }
}
