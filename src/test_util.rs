use std::{
    io,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::io::AsyncWrite;

use crate::event::{Container, ContainerConfig, LogMessage};

pub fn container(name: &str, id: &str, image: &str, hostname: &str) -> Container {
    Container {
        id: id.to_owned(),
        name: name.to_owned(),
        config: ContainerConfig {
            image: image.to_owned(),
            hostname: hostname.to_owned(),
            labels: Default::default(),
        },
    }
}

/// A message from the `web` container with a fixed timestamp.
pub fn message(data: &str, source: &str) -> LogMessage {
    LogMessage::new(
        Arc::new(container("web", "abc123", "nginx", "host1")),
        source,
        data,
        Utc.timestamp_nanos(1_600_000_000_000_000_000),
    )
}

/// Splits newline-delimited output into decoded JSON frames.
pub fn decode_frames(bytes: &[u8]) -> Vec<Value> {
    bytes
        .split(|byte| *byte == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_slice(line).expect("frame is not valid JSON"))
        .collect()
}

/// A writer that records what it is given and fails every write after the first `fail_after`.
#[derive(Debug)]
pub struct FailingWriter {
    fail_after: usize,
    attempts: Arc<AtomicUsize>,
    written: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FailingWriter {
    pub fn new(fail_after: usize) -> Self {
        Self {
            fail_after,
            attempts: Arc::default(),
            written: Arc::default(),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }

    pub fn written(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.written)
    }
}

impl AsyncWrite for FailingWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.fail_after {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection closed by peer",
            )));
        }

        self.written.lock().expect("poisoned").push(buf.to_vec());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
