//! Bridge between the blocking PDF writer and an async response body.

use bytes::Bytes;
use futures::Stream;
use std::io::{self, Write};
use std::pin::Pin;
use tokio::sync::mpsc;

/// Bytes handed to the channel at a time.
pub const CHUNK_SIZE: usize = 64 * 1024;
/// Chunks allowed in flight before the writer blocks.
pub const CHANNEL_CAPACITY: usize = 4;

pub type ChunkResult = Result<Bytes, io::Error>;

/// Report bytes as they are produced.
pub type ReportStream = Pin<Box<dyn Stream<Item = ChunkResult> + Send>>;

/// `io::Write` adapter that forwards fixed-size chunks to an async receiver.
///
/// Must be used from a blocking context (e.g. `spawn_blocking`): a full
/// channel blocks the writing thread until the consumer catches up.
pub struct ChunkSink {
    tx: mpsc::Sender<ChunkResult>,
    buf: Vec<u8>,
    written: usize,
}

impl ChunkSink {
    pub fn new(tx: mpsc::Sender<ChunkResult>) -> Self {
        Self {
            tx,
            buf: Vec::with_capacity(CHUNK_SIZE),
            written: 0,
        }
    }

    /// Total bytes accepted so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// True once the consumer has dropped its end.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Pass a failure on to the consumer. Ignored if it has gone away.
    pub fn fail(&self, err: io::Error) {
        let _ = self.tx.blocking_send(Err(err));
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let chunk = Bytes::from(std::mem::replace(
            &mut self.buf,
            Vec::with_capacity(CHUNK_SIZE),
        ));
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "report consumer went away"))
    }
}

impl Write for ChunkSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let room = CHUNK_SIZE - self.buf.len();
        let take = room.min(data.len());
        self.buf.extend_from_slice(&data[..take]);
        self.written += take;
        if self.buf.len() >= CHUNK_SIZE {
            self.send_buffered()?;
        }
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}

/// Channel pair for one report: the sink for the writer, the stream for the body.
pub fn channel() -> (ChunkSink, ReportStream) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    (ChunkSink::new(tx), Box::pin(stream))
}
