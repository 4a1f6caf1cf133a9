//! Status query protocol.
//!
//! A status request is a `DLE EOT n` write followed by whatever chunk the
//! device sends next. Inbound data has no framing, so the reply is
//! correlated purely by arrival order: a one-shot listener is registered
//! before the request goes out, and the first chunk after it is the answer.
//! Only one request may be outstanding per handle; a second one is rejected
//! with [`DeviceError::StatusQueryPending`] instead of racing the first for
//! the same chunk.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::RecvTimeoutError;
use escpos_link_codes::{PaperStatus, StatusRequest};

use crate::{Device, DeviceError, ListenerId};

/// How a status reply is rendered before it reaches the callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusEncoding {
    /// Lowercase hex, two digits per byte (`0x12` renders as `"12"`).
    #[default]
    Hex,
    /// UTF-8, with invalid sequences replaced.
    Utf8,
    /// One char per byte.
    Latin1,
}

impl StatusEncoding {
    /// Render `raw` in this encoding.
    pub fn render(self, raw: &[u8]) -> String {
        match self {
            StatusEncoding::Hex => hex::encode(raw),
            StatusEncoding::Utf8 => String::from_utf8_lossy(raw).into_owned(),
            StatusEncoding::Latin1 => raw.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

impl fmt::Display for StatusEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusEncoding::Hex => "hex",
            StatusEncoding::Utf8 => "utf8",
            StatusEncoding::Latin1 => "latin1",
        })
    }
}

impl FromStr for StatusEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(StatusEncoding::Hex),
            "utf8" | "utf-8" => Ok(StatusEncoding::Utf8),
            "latin1" | "binary" => Ok(StatusEncoding::Latin1),
            other => Err(format!(
                "unknown status encoding '{other}' (expected hex, utf8, or latin1)"
            )),
        }
    }
}

/// The chunk that answered a status request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusReply {
    /// What was asked.
    pub request: StatusRequest,
    /// The inbound chunk, unmodified.
    pub raw: Vec<u8>,
}

impl StatusReply {
    /// Render the reply bytes.
    pub fn render(&self, encoding: StatusEncoding) -> String {
        encoding.render(&self.raw)
    }

    /// Decode the first byte as a roll paper status.
    pub fn paper_status(&self) -> Option<PaperStatus> {
        PaperStatus::from_reply(&self.raw)
    }
}

/// Holds the per-handle pending flag; released when dropped.
struct PendingGuard(Arc<AtomicBool>);

impl PendingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, DeviceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DeviceError::StatusQueryPending)?;
        Ok(Self(Arc::clone(flag)))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Device {
    /// Send `request` and hand the next inbound chunk to `callback`,
    /// rendered in `encoding`.
    ///
    /// The callback runs on the inbound thread and at most once. If the
    /// handle is closed first it is dropped without being called.
    ///
    /// # Errors
    ///
    /// [`DeviceError::StatusQueryPending`] if a request is already waiting
    /// for its reply; otherwise any write error.
    pub fn query_status<F>(
        &mut self,
        request: StatusRequest,
        encoding: StatusEncoding,
        callback: F,
    ) -> Result<ListenerId, DeviceError>
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.submit_status(request, move |reply| callback(reply.render(encoding)))
    }

    /// Ask for the roll paper sensor status (`DLE EOT 4`).
    ///
    /// Compare the rendered reply against
    /// [`PAPER_STATUS_CODES`](escpos_link_codes::PAPER_STATUS_CODES), or
    /// use [`paper_status`](Device::paper_status) for a decoded value.
    pub fn get_paper_status<F>(
        &mut self,
        encoding: StatusEncoding,
        callback: F,
    ) -> Result<ListenerId, DeviceError>
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.query_status(StatusRequest::PaperSensor, encoding, callback)
    }

    /// Send `request` and wait up to the configured status timeout for the
    /// reply.
    pub fn query_status_blocking(
        &mut self,
        request: StatusRequest,
    ) -> Result<StatusReply, DeviceError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let id = self.submit_status(request, move |reply| {
            let _ = tx.send(reply);
        })?;

        let timeout = self.config().timeouts.status;
        match rx.recv_timeout(timeout) {
            Ok(reply) => Ok(reply),
            Err(RecvTimeoutError::Timeout) => {
                if !self.hub().remove(id)
                    && let Ok(reply) = rx.recv_timeout(self.config().timeouts.poll)
                {
                    // Fired between the timeout and the removal.
                    return Ok(reply);
                }
                log::debug!("{}: no reply to {request:?} within {timeout:?}", self.peer());
                Err(DeviceError::StatusTimeout(timeout))
            }
            // The listener was dropped unfired: the inbound stream ended.
            Err(RecvTimeoutError::Disconnected) => Err(DeviceError::ConnectionClosed),
        }
    }

    /// Blocking roll paper status query.
    pub fn paper_status(&mut self) -> Result<PaperStatus, DeviceError> {
        self.query_status_blocking(StatusRequest::PaperSensor)?
            .paper_status()
            .ok_or(DeviceError::EmptyReply)
    }

    /// Whether a status request is waiting for its reply.
    pub fn status_pending(&self) -> bool {
        self.status_pending.load(Ordering::Acquire)
    }

    fn submit_status<F>(
        &mut self,
        request: StatusRequest,
        on_reply: F,
    ) -> Result<ListenerId, DeviceError>
    where
        F: FnOnce(StatusReply) + Send + 'static,
    {
        let guard = PendingGuard::acquire(&self.status_pending)?;

        // Registered before the write so a fast reply cannot slip past.
        let mut slot = Some((guard, on_reply));
        let id = self.hub().once_data(move |chunk| {
            if let Some((guard, on_reply)) = slot.take() {
                // Release first so the callback may issue the next request.
                drop(guard);
                on_reply(StatusReply {
                    request,
                    raw: chunk.to_vec(),
                });
            }
        });

        if let Err(e) = self.send_raw(request.command()) {
            // Dropping the listener releases the guard.
            self.hub().remove(id);
            return Err(e);
        }
        Ok(id)
    }
}
