//! Inbound data: listener registry and the reader thread that feeds it.
//!
//! The device stream has no framing, so every chunk returned by one `read`
//! is one data event, delivered to every registered listener in
//! registration order. One-shot listeners are detached before they run,
//! so a chunk can never fire them twice.

use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

type Callback = Box<dyn FnMut(&[u8]) + Send>;

/// Identifies a registered inbound listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    once: bool,
    callback: Arc<Mutex<Callback>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shared broadcast point for inbound chunks.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct InboundHub {
    registry: Arc<Mutex<Registry>>,
}

impl InboundHub {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener that receives every chunk until removed.
    pub fn on_data<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        self.insert(false, Box::new(callback))
    }

    /// Register a listener that receives the next chunk only.
    pub fn once_data<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        self.insert(true, Box::new(callback))
    }

    /// Remove a listener. Returns `false` if it was not registered
    /// (already fired, removed, or cleared).
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut reg = self.lock();
        let before = reg.entries.len();
        reg.entries.retain(|e| e.id != id);
        reg.entries.len() != before
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.lock().entries.iter().any(|e| e.id == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener.
    pub fn clear(&self) {
        // Take the entries out first so callbacks drop outside the lock.
        let entries = std::mem::take(&mut self.lock().entries);
        drop(entries);
    }

    /// Deliver `chunk` to every listener registered at the time of the call.
    ///
    /// One-shot listeners are detached before any callback runs. Callbacks
    /// run without the registry lock held, so they may register or remove
    /// listeners; a listener added during dispatch first sees the next
    /// chunk. Returns the number of listeners notified.
    pub fn dispatch(&self, chunk: &[u8]) -> usize {
        let snapshot: Vec<Arc<Mutex<Callback>>> = {
            let mut reg = self.lock();
            let snapshot = reg
                .entries
                .iter()
                .map(|e| Arc::clone(&e.callback))
                .collect();
            reg.entries.retain(|e| !e.once);
            snapshot
        };

        for callback in &snapshot {
            let mut f = callback.lock().unwrap_or_else(PoisonError::into_inner);
            (*f)(chunk);
        }
        snapshot.len()
    }

    fn insert(&self, once: bool, callback: Callback) -> ListenerId {
        let mut reg = self.lock();
        let id = ListenerId(reg.next_id);
        reg.next_id += 1;
        reg.entries.push(Entry {
            id,
            once,
            callback: Arc::new(Mutex::new(callback)),
        });
        id
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for InboundHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundHub")
            .field("listeners", &self.len())
            .finish()
    }
}

// ── Reader thread ──────────────────────────────────────────────────────

/// Everything the reader thread needs, moved into it at spawn time.
pub(crate) struct Pump {
    pub(crate) reader: Box<dyn Read + Send>,
    pub(crate) hub: InboundHub,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) error: Arc<Mutex<Option<String>>>,
    pub(crate) chunk_size: usize,
    pub(crate) trace_io: bool,
    pub(crate) peer: String,
}

impl Pump {
    /// Start the reader thread.
    pub(crate) fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("escpos-inbound".into())
            .spawn(move || self.run())
    }

    fn run(mut self) {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            if self.stop.load(Ordering::Acquire) {
                break;
            }
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    log::debug!("{}: inbound stream closed", self.peer);
                    break;
                }
                Ok(n) => {
                    if self.stop.load(Ordering::Acquire) {
                        break;
                    }
                    let chunk = &buf[..n];
                    if self.trace_io {
                        log::trace!("{} <- {}", self.peer, hex::encode(chunk));
                    }
                    self.hub.dispatch(chunk);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    if !self.stop.load(Ordering::Acquire) {
                        log::warn!("{}: inbound read failed: {e}", self.peer);
                        *self.error.lock().unwrap_or_else(PoisonError::into_inner) =
                            Some(e.to_string());
                    }
                    break;
                }
            }
        }
        // Nothing more will arrive; release every listener.
        self.hub.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<Vec<u8>>>>, impl FnMut(&[u8]) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |chunk: &[u8]| sink.lock().unwrap().push(chunk.to_vec()))
    }

    #[test]
    fn persistent_listener_sees_every_chunk() {
        let hub = InboundHub::new();
        let (seen, cb) = recorder();
        hub.on_data(cb);
        hub.dispatch(b"a");
        hub.dispatch(b"b");
        assert_eq!(*seen.lock().unwrap(), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn once_listener_fires_exactly_once() {
        let hub = InboundHub::new();
        let (seen, cb) = recorder();
        let id = hub.once_data(cb);
        assert!(hub.contains(id));
        assert_eq!(hub.dispatch(b"\x12"), 1);
        assert!(!hub.contains(id));
        assert_eq!(hub.dispatch(b"\x1e"), 0);
        assert_eq!(*seen.lock().unwrap(), vec![vec![0x12]]);
    }

    #[test]
    fn two_once_listeners_both_take_the_first_chunk() {
        // No framing: both outstanding one-shot listeners see the same chunk,
        // and the chunk meant for the second request arrives to nobody.
        let hub = InboundHub::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            hub.once_data(move |chunk| order.lock().unwrap().push((tag, chunk.to_vec())));
        }
        hub.dispatch(b"\x12");
        hub.dispatch(b"\x1e");
        assert_eq!(
            *order.lock().unwrap(),
            vec![("first", vec![0x12]), ("second", vec![0x12])]
        );
        assert!(hub.is_empty());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let hub = InboundHub::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..4 {
            let order = Arc::clone(&order);
            hub.on_data(move |_| order.lock().unwrap().push(n));
        }
        hub.dispatch(b"x");
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn remove_detaches_listener() {
        let hub = InboundHub::new();
        let (seen, cb) = recorder();
        let id = hub.on_data(cb);
        assert!(hub.remove(id));
        assert!(!hub.remove(id));
        hub.dispatch(b"x");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn callback_may_register_listener_during_dispatch() {
        let hub = InboundHub::new();
        let inner_hits = Arc::new(AtomicUsize::new(0));
        let hub2 = hub.clone();
        let hits = Arc::clone(&inner_hits);
        hub.once_data(move |_| {
            let hits = Arc::clone(&hits);
            hub2.on_data(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        });
        hub.dispatch(b"1");
        assert_eq!(inner_hits.load(Ordering::SeqCst), 0);
        hub.dispatch(b"2");
        assert_eq!(inner_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_drops_all_listeners() {
        let hub = InboundHub::new();
        hub.on_data(|_| {});
        hub.once_data(|_| {});
        hub.clear();
        assert!(hub.is_empty());
        assert_eq!(hub.dispatch(b"x"), 0);
    }

    #[test]
    fn pump_dispatches_reads_and_clears_on_eof() {
        let hub = InboundHub::new();
        let (seen, cb) = recorder();
        hub.on_data(cb);
        let pump = Pump {
            reader: Box::new(std::io::Cursor::new(b"\x12\x1e".to_vec())),
            hub: hub.clone(),
            stop: Arc::new(AtomicBool::new(false)),
            error: Arc::new(Mutex::new(None)),
            chunk_size: 1,
            trace_io: true,
            peer: "test".into(),
        };
        pump.spawn().unwrap().join().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![vec![0x12], vec![0x1e]]);
        assert!(hub.is_empty());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn pump_records_read_failure() {
        let error = Arc::new(Mutex::new(None));
        let pump = Pump {
            reader: Box::new(FailingReader),
            hub: InboundHub::new(),
            stop: Arc::new(AtomicBool::new(false)),
            error: Arc::clone(&error),
            chunk_size: 8,
            trace_io: false,
            peer: "test".into(),
        };
        pump.spawn().unwrap().join().unwrap();
        assert_eq!(error.lock().unwrap().as_deref(), Some("reset"));
    }
}
