//! Bounded capture of a renderer's stderr.
//!
//! The pipe is drained on a background thread so a chatty renderer never
//! blocks on a full pipe buffer. Only the first [`STDERR_LIMIT`] bytes are
//! kept; the rest is read and discarded.

use std::io::Read;
use std::process::ChildStderr;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Maximum number of bytes kept from stderr (64 KiB).
const STDERR_LIMIT: usize = 65_536;

const CHUNK_SIZE: usize = 4_096;

pub(super) struct StderrCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
}

impl StderrCapture {
    pub(super) fn spawn(stderr: Option<ChildStderr>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let reader = stderr.map(|pipe| {
            let shared = Arc::clone(&buffer);
            std::thread::spawn(move || drain(pipe, &shared))
        });
        Self { buffer, reader }
    }

    /// Joins the reader and returns everything captured.
    ///
    /// Blocks until every holder of the pipe has closed it, so only call
    /// this once the child has exited on its own.
    pub(super) fn finish(mut self) -> String {
        if let Some(reader) = self.reader.take()
            && reader.join().is_err()
        {
            tracing::trace!("renderer stderr reader panicked");
        }
        self.snapshot()
    }

    /// Returns what has been captured so far and detaches the reader.
    ///
    /// Used after killing a child whose descendants may still hold the
    /// pipe open.
    pub(super) fn abandon(self) -> String {
        self.snapshot()
    }

    fn snapshot(&self) -> String {
        self.buffer
            .lock()
            .map(|captured| String::from_utf8_lossy(&captured).into_owned())
            .unwrap_or_default()
    }
}

fn drain(mut pipe: ChildStderr, buffer: &Mutex<Vec<u8>>) {
    let mut chunk = [0_u8; CHUNK_SIZE];
    loop {
        let read = match pipe.read(&mut chunk) {
            Ok(0) => return,
            Ok(count) => count,
            Err(error) => {
                tracing::trace!("failed to read renderer stderr: {error}");
                return;
            }
        };
        let Ok(mut captured) = buffer.lock() else {
            return;
        };
        let room = STDERR_LIMIT.saturating_sub(captured.len());
        captured.extend(chunk.iter().take(read.min(room)));
    }
}
