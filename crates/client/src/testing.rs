//! In-memory transport for unit tests.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{DeviceError, Transport, TransportKind};

/// Records every write; inbound chunks are fed through [`MockPeer::reply`].
pub(crate) struct MockTransport {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    inbound: Receiver<Vec<u8>>,
    closed: Arc<AtomicBool>,
    fail_writes: bool,
}

/// The test's side of a [`MockTransport`].
pub(crate) struct MockPeer {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    inbound: Sender<Vec<u8>>,
    closed: Arc<AtomicBool>,
}

pub(crate) fn mock() -> (MockTransport, MockPeer) {
    let writes = Arc::new(Mutex::new(Vec::new()));
    let closed = Arc::new(AtomicBool::new(false));
    let (tx, rx) = crossbeam_channel::unbounded();
    (
        MockTransport {
            writes: Arc::clone(&writes),
            inbound: rx,
            closed: Arc::clone(&closed),
            fail_writes: false,
        },
        MockPeer {
            writes,
            inbound: tx,
            closed,
        },
    )
}

impl MockTransport {
    /// Every write fails with a broken pipe.
    pub(crate) fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl MockPeer {
    /// Each write call as it arrived.
    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    /// All written bytes, concatenated.
    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.writes().concat()
    }

    /// Writes after the init command.
    pub(crate) fn after_init(&self) -> Vec<Vec<u8>> {
        self.writes().into_iter().skip(1).collect()
    }

    /// Deliver one inbound chunk.
    pub(crate) fn reply(&self, chunk: &[u8]) {
        self.inbound.send(chunk.to_vec()).unwrap();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Tcp
    }

    fn peer(&self) -> String {
        "mock".into()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DeviceError::ConnectionClosed);
        }
        if self.fail_writes {
            return Err(DeviceError::WriteFailed(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock write failure",
            )));
        }
        self.writes.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn reader(&mut self) -> Result<Box<dyn Read + Send>, DeviceError> {
        Ok(Box::new(ChannelReader {
            rx: self.inbound.clone(),
            poll: Duration::from_millis(10),
        }))
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Each queued chunk is returned by exactly one `read`.
struct ChannelReader {
    rx: Receiver<Vec<u8>>,
    poll: Duration,
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.rx.recv_timeout(self.poll) {
            Ok(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                Ok(n)
            }
            Err(RecvTimeoutError::Timeout) => Err(io::ErrorKind::TimedOut.into()),
            Err(RecvTimeoutError::Disconnected) => Ok(0),
        }
    }
}
