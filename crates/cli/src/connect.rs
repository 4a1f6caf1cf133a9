//! Device selection: connection flags, JSON connection profiles, and the
//! tap transport that records what each command writes.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use escpos_link_client::{
    Device, DeviceConfig, DeviceError, SerialDataBits, SerialFlowControl, SerialParity,
    SerialStopBits, Target, Transport, TransportKind, open_transport,
};
use serde::Deserialize;

// ── Flags ───────────────────────────────────────────────────────────────

/// Connection flags shared by every device command.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ConnectArgs {
    /// Device address: IP[:PORT], HOSTNAME[:PORT], [IPv6]:PORT (default
    /// port 9100), or a serial device path such as /dev/ttyUSB0 or COM3.
    #[arg(long, short = 'p', global = true)]
    pub(crate) printer: Option<String>,

    /// Treat --printer as a serial device path.
    #[arg(long, global = true)]
    pub(crate) serial: bool,

    /// Serial baud rate (default 9600).
    #[arg(long, global = true)]
    pub(crate) baud: Option<u32>,

    /// Serial data bits.
    #[arg(long, global = true, value_enum)]
    pub(crate) serial_data_bits: Option<DataBitsArg>,

    /// Serial parity.
    #[arg(long, global = true, value_enum)]
    pub(crate) serial_parity: Option<ParityArg>,

    /// Serial stop bits.
    #[arg(long, global = true, value_enum)]
    pub(crate) serial_stop_bits: Option<StopBitsArg>,

    /// Serial flow control.
    #[arg(long, global = true, value_enum)]
    pub(crate) serial_flow_control: Option<FlowControlArg>,

    /// Connect and status-reply timeout, in seconds.
    #[arg(long, global = true)]
    pub(crate) timeout: Option<f64>,

    /// Log every byte written and received (hex) at trace level.
    #[arg(long, global = true)]
    pub(crate) trace_io: bool,

    /// JSON connection profile; flags override its values.
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum DataBitsArg {
    #[value(name = "5")]
    Five,
    #[value(name = "6")]
    Six,
    #[value(name = "7")]
    Seven,
    #[value(name = "8")]
    Eight,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ParityArg {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum StopBitsArg {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum FlowControlArg {
    None,
    Software,
    Hardware,
}

impl ConnectArgs {
    fn has_serial_options(&self) -> bool {
        self.baud.is_some()
            || self.serial_data_bits.is_some()
            || self.serial_parity.is_some()
            || self.serial_stop_bits.is_some()
            || self.serial_flow_control.is_some()
    }
}

// ── Profiles ────────────────────────────────────────────────────────────

/// A connection profile loaded with `--config`.
///
/// ```json
/// {
///   "target": { "network": { "host": "10.0.0.9", "port": 9100 } },
///   "timeouts": { "connect_ms": 2000, "status_ms": 1000 },
///   "trace_io": false
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Profile {
    pub(crate) target: Option<Target>,
    pub(crate) timeouts: ProfileTimeouts,
    pub(crate) trace_io: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProfileTimeouts {
    pub(crate) connect_ms: Option<u64>,
    pub(crate) write_ms: Option<u64>,
    pub(crate) status_ms: Option<u64>,
}

impl Profile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }
}

/// Fully merged connection settings.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub(crate) target: Option<Target>,
    pub(crate) config: DeviceConfig,
}

/// Merge the profile (if any) with the flags. Flags win.
pub(crate) fn resolve(args: &ConnectArgs) -> Result<Resolved> {
    let profile = match &args.config {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    let mut target = match &args.printer {
        Some(addr) if args.serial => Some(Target::serial(addr.trim(), Default::default())),
        Some(addr) => Some(
            Target::parse(addr).with_context(|| format!("invalid --printer value '{addr}'"))?,
        ),
        None if args.serial => bail!("--serial requires --printer <PATH>"),
        None => profile.target,
    };

    match &mut target {
        Some(Target::Serial { settings, .. }) => {
            if let Some(baud) = args.baud {
                settings.baud_rate = baud;
            }
            if let Some(bits) = args.serial_data_bits {
                settings.data_bits = match bits {
                    DataBitsArg::Five => SerialDataBits::Five,
                    DataBitsArg::Six => SerialDataBits::Six,
                    DataBitsArg::Seven => SerialDataBits::Seven,
                    DataBitsArg::Eight => SerialDataBits::Eight,
                };
            }
            if let Some(parity) = args.serial_parity {
                settings.parity = match parity {
                    ParityArg::None => SerialParity::None,
                    ParityArg::Odd => SerialParity::Odd,
                    ParityArg::Even => SerialParity::Even,
                };
            }
            if let Some(stop) = args.serial_stop_bits {
                settings.stop_bits = match stop {
                    StopBitsArg::One => SerialStopBits::One,
                    StopBitsArg::Two => SerialStopBits::Two,
                };
            }
            if let Some(flow) = args.serial_flow_control {
                settings.flow_control = match flow {
                    FlowControlArg::None => SerialFlowControl::None,
                    FlowControlArg::Software => SerialFlowControl::Software,
                    FlowControlArg::Hardware => SerialFlowControl::Hardware,
                };
            }
        }
        Some(Target::Network { .. }) if args.has_serial_options() => {
            bail!("serial options (--baud, --serial-*) require a serial device; use --serial")
        }
        _ => {}
    }

    let mut config = DeviceConfig::default();
    if let Some(ms) = profile.timeouts.connect_ms {
        config.timeouts.connect = Duration::from_millis(ms);
    }
    if let Some(ms) = profile.timeouts.write_ms {
        config.timeouts.write = Duration::from_millis(ms);
    }
    if let Some(ms) = profile.timeouts.status_ms {
        config.timeouts.status = Duration::from_millis(ms);
    }
    if let Some(secs) = args.timeout {
        if !secs.is_finite() || secs <= 0.0 {
            bail!("--timeout must be a positive number of seconds, got {secs}");
        }
        let Ok(timeout) = Duration::try_from_secs_f64(secs) else {
            bail!("--timeout must be a positive number of seconds, got {secs}");
        };
        config.timeouts.connect = timeout;
        config.timeouts.status = timeout;
    }
    config.trace_io = args.trace_io || profile.trace_io.unwrap_or(false);

    Ok(Resolved { target, config })
}

// ── Session ─────────────────────────────────────────────────────────────

/// Bytes written through a [`Tap`].
#[derive(Debug, Clone, Default)]
pub(crate) struct SentLog(Arc<Mutex<Vec<u8>>>);

impl SentLog {
    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, data: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
    }
}

/// Records every write; forwards to a real transport unless dry-running.
struct Tap {
    inner: Option<Box<dyn Transport>>,
    log: SentLog,
}

impl Transport for Tap {
    fn kind(&self) -> TransportKind {
        self.inner
            .as_ref()
            .map_or(TransportKind::Tcp, |t| t.kind())
    }

    fn peer(&self) -> String {
        self.inner
            .as_ref()
            .map_or_else(|| "dry-run".to_string(), |t| t.peer())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        if let Some(inner) = self.inner.as_mut() {
            inner.write_all(data)?;
        }
        self.log.record(data);
        Ok(())
    }

    fn reader(&mut self) -> Result<Box<dyn Read + Send>, DeviceError> {
        match self.inner.as_mut() {
            Some(inner) => inner.reader(),
            None => Ok(Box::new(io::empty())),
        }
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        match self.inner.as_mut() {
            Some(inner) => inner.close(),
            None => Ok(()),
        }
    }
}

/// An initialized device plus the record of what was written to it.
pub(crate) struct Session {
    pub(crate) device: Device,
    /// Peer name for reports (`dry-run` when not connected).
    pub(crate) peer: String,
    pub(crate) sent: SentLog,
    pub(crate) dry_run: bool,
}

impl Session {
    /// Open the configured device, or a recording-only device for a dry run.
    pub(crate) fn open(args: &ConnectArgs, dry_run: bool) -> Result<Self> {
        let Resolved { target, config } = resolve(args)?;
        let inner = if dry_run {
            None
        } else {
            let target = target.context(
                "no device given; use --printer <ADDR>, --config <FILE>, or --dry-run",
            )?;
            log::info!("connecting to {target}");
            Some(
                open_transport(&target, &config)
                    .with_context(|| format!("failed to open {target}"))?,
            )
        };

        let sent = SentLog::default();
        let tap = Tap {
            inner,
            log: sent.clone(),
        };
        let device = Device::with_transport(Box::new(tap), config)
            .context("failed to initialize device")?;
        Ok(Self {
            peer: device.peer().to_string(),
            device,
            sent,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(
            &path,
            r#"{"target": {"network": {"host": "10.0.0.9"}}, "timeouts": {"status_ms": 500}, "trace_io": true}"#,
        )
        .unwrap();

        let args = ConnectArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        let resolved = resolve(&args).unwrap();
        assert_eq!(resolved.target, Some(Target::network("10.0.0.9", 9100)));
        assert_eq!(resolved.config.timeouts.status, Duration::from_millis(500));
        assert!(resolved.config.trace_io);

        let args = ConnectArgs {
            config: Some(path),
            printer: Some("127.0.0.1:9200".into()),
            timeout: Some(1.5),
            ..Default::default()
        };
        let resolved = resolve(&args).unwrap();
        assert_eq!(resolved.target, Some(Target::network("127.0.0.1", 9200)));
        assert_eq!(resolved.config.timeouts.status, Duration::from_millis(1500));
        assert_eq!(resolved.config.timeouts.connect, Duration::from_millis(1500));
    }

    #[test]
    fn serial_flags_apply_to_serial_targets() {
        let args = ConnectArgs {
            printer: Some("ttyS1".into()),
            serial: true,
            baud: Some(19200),
            serial_parity: Some(ParityArg::Even),
            ..Default::default()
        };
        match resolve(&args).unwrap().target {
            Some(Target::Serial { path, settings }) => {
                assert_eq!(path, "ttyS1");
                assert_eq!(settings.baud_rate, 19200);
                assert_eq!(settings.parity, SerialParity::Even);
                assert_eq!(settings.data_bits, SerialDataBits::Eight);
            }
            other => panic!("expected serial target, got {other:?}"),
        }
    }

    #[test]
    fn serial_flags_with_network_target_are_rejected() {
        let args = ConnectArgs {
            printer: Some("10.0.0.9".into()),
            baud: Some(19200),
            ..Default::default()
        };
        let err = resolve(&args).unwrap_err();
        assert!(err.to_string().contains("--serial"), "{err}");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let args = ConnectArgs {
            timeout: Some(0.0),
            ..Default::default()
        };
        assert!(resolve(&args).is_err());

        let args = ConnectArgs {
            timeout: Some(1e30),
            ..Default::default()
        };
        let err = resolve(&args).unwrap_err();
        assert!(err.to_string().contains("--timeout"), "{err}");
    }

    #[test]
    fn unknown_profile_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, r#"{"printer": "10.0.0.9"}"#).unwrap();
        let args = ConnectArgs {
            config: Some(path),
            ..Default::default()
        };
        let err = resolve(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"), "{err:#}");
    }

    #[test]
    fn dry_run_records_init() {
        let session = Session::open(&ConnectArgs::default(), true).unwrap();
        assert_eq!(session.sent.bytes(), b"\x1b\x40");
        assert_eq!(session.peer, "dry-run");
    }
}
