//! The device handle: one transport, one init handshake, one inbound thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use escpos_link_codes::{Cp437, TextEncoder, printer};

use crate::inbound::Pump;
use crate::{
    DeviceConfig, DeviceError, InboundHub, ListenerId, Target, Transport, TransportKind,
    open_transport,
};

/// Lifecycle of a [`Device`].
///
/// There is no not-ready state: a handle only exists once `ESC @` has been
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReadyState {
    /// Initialized; commands may be sent.
    Ready,
    /// Closed by [`Device::close`] or drop.
    Closed,
}

/// A connected ESC/POS device.
///
/// Construction opens the transport and writes `ESC @` before anything else;
/// a handle you hold is therefore always past the init handshake until it is
/// closed. Writes go out synchronously, in call order, on the caller's
/// thread. Inbound chunks are read on a background thread and broadcast to
/// the listeners registered with [`on_data`](Device::on_data) and
/// [`once_data`](Device::once_data); callbacks run on that thread.
pub struct Device {
    transport: Box<dyn Transport>,
    kind: TransportKind,
    peer: String,
    encoder: Box<dyn TextEncoder>,
    hub: InboundHub,
    state: ReadyState,
    config: DeviceConfig,
    stop: Arc<AtomicBool>,
    pump: Option<JoinHandle<()>>,
    inbound_error: Arc<Mutex<Option<String>>>,
    pub(crate) status_pending: Arc<AtomicBool>,
}

impl Device {
    /// Open `target` and initialize the device.
    ///
    /// # Errors
    ///
    /// Connection and serial-open failures are returned as-is, as is a
    /// failure to write the init command. Nothing is retried.
    pub fn open(target: &Target, config: DeviceConfig) -> Result<Self, DeviceError> {
        let transport = open_transport(target, &config)?;
        Self::with_transport(transport, config)
    }

    /// Initialize a device over an already-open transport.
    pub fn with_transport(
        mut transport: Box<dyn Transport>,
        config: DeviceConfig,
    ) -> Result<Self, DeviceError> {
        config.validate()?;
        let kind = transport.kind();
        let peer = transport.peer();

        log::debug!("{peer}: sending init");
        if let Err(e) = write_traced(transport.as_mut(), &peer, config.trace_io, printer::HW_INIT)
        {
            let _ = transport.close();
            return Err(e);
        }

        let reader = match transport.reader() {
            Ok(reader) => reader,
            Err(e) => {
                let _ = transport.close();
                return Err(e);
            }
        };

        let hub = InboundHub::new();
        let stop = Arc::new(AtomicBool::new(false));
        let inbound_error = Arc::new(Mutex::new(None));
        let pump = Pump {
            reader,
            hub: hub.clone(),
            stop: Arc::clone(&stop),
            error: Arc::clone(&inbound_error),
            chunk_size: config.read_chunk_size,
            trace_io: config.trace_io,
            peer: peer.clone(),
        }
        .spawn();
        let pump = match pump {
            Ok(handle) => handle,
            Err(e) => {
                let _ = transport.close();
                return Err(DeviceError::InboundPump(e));
            }
        };

        log::debug!("{peer}: {kind} device ready");

        Ok(Self {
            transport,
            kind,
            peer,
            encoder: Box::new(Cp437),
            hub,
            state: ReadyState::Ready,
            config,
            stop,
            pump: Some(pump),
            inbound_error,
            status_pending: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replace the text encoder used by [`send_text`](Device::send_text).
    pub fn set_encoder(&mut self, encoder: impl TextEncoder + 'static) {
        self.encoder = Box::new(encoder);
    }

    /// Write bytes to the device unmodified.
    ///
    /// After [`close`](Device::close) this returns the transport's
    /// closed-connection error.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        write_traced(
            self.transport.as_mut(),
            &self.peer,
            self.config.trace_io,
            bytes,
        )
    }

    /// Encode `text` to the device code page and write it.
    ///
    /// Characters the encoder cannot represent are substituted or dropped;
    /// encoding never fails.
    pub fn send_text(&mut self, text: &str) -> Result<(), DeviceError> {
        let bytes = self.encoder.encode(text);
        self.send_raw(&bytes)
    }

    /// Register a listener for every inbound chunk.
    pub fn on_data<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        self.hub.on_data(callback)
    }

    /// Register a listener for the next inbound chunk only.
    pub fn once_data<F>(&self, callback: F) -> ListenerId
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        self.hub.once_data(callback)
    }

    /// Remove a listener. Returns `false` if it already fired or was removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.hub.remove(id)
    }

    /// Number of registered inbound listeners.
    pub fn listener_count(&self) -> usize {
        self.hub.len()
    }

    pub(crate) fn hub(&self) -> &InboundHub {
        &self.hub
    }

    /// The error that stopped the inbound reader, if any.
    pub fn inbound_error(&self) -> Option<String> {
        self.inbound_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReadyState {
        self.state
    }

    /// Which transport backs this handle.
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Peer name used in logs.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// The configuration this handle was opened with.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Close the transport, stop the inbound thread, and release every
    /// listener (including a pending status listener, whose callback is
    /// never invoked). Idempotent.
    pub fn close(&mut self) -> Result<(), DeviceError> {
        if self.state == ReadyState::Closed {
            return Ok(());
        }
        self.state = ReadyState::Closed;
        self.stop.store(true, Ordering::Release);
        self.hub.clear();
        let result = self.transport.close();

        if let Some(pump) = self.pump.take() {
            // A callback that owns this handle may be closing it from the
            // inbound thread itself.
            if pump.thread().id() != std::thread::current().id() {
                let _ = pump.join();
            }
        }
        // The pump may have dispatched one last chunk while stopping.
        self.hub.clear();
        log::debug!("{}: device closed", self.peer);
        result
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("kind", &self.kind)
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("listeners", &self.hub.len())
            .finish_non_exhaustive()
    }
}

fn write_traced(
    transport: &mut dyn Transport,
    peer: &str,
    trace_io: bool,
    bytes: &[u8],
) -> Result<(), DeviceError> {
    if trace_io {
        log::trace!("{peer} -> {}", hex::encode(bytes));
    }
    transport.write_all(bytes)
}
