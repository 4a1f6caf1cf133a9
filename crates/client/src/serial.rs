//! Serial transport using the `serialport` crate.
//!
//! Feature-gated behind the `serial` Cargo feature (on by default).

use std::io::{Read, Write};

use crate::{
    DeviceConfig, DeviceError, SerialDataBits, SerialFlowControl, SerialParity, SerialSettings,
    SerialStopBits, Transport, TransportKind,
};

/// A device connected over a serial port (RS-232, USB-serial, or Bluetooth SPP).
pub struct SerialTransport {
    /// The underlying port handle; `None` once closed.
    port: Option<Box<dyn serialport::SerialPort>>,
    path: String,
    /// Read timeout for the inbound reader handle.
    poll: std::time::Duration,
}

impl SerialTransport {
    /// Open `path` with the given line settings.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::SerialError` if the port cannot be opened.
    pub fn open(
        path: &str,
        settings: &SerialSettings,
        config: &DeviceConfig,
    ) -> Result<Self, DeviceError> {
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(data_bits(settings.data_bits))
            .parity(parity(settings.parity))
            .stop_bits(stop_bits(settings.stop_bits))
            .flow_control(flow_control(settings.flow_control))
            .timeout(config.timeouts.write)
            .open()
            .map_err(|e| DeviceError::SerialError(format!("failed to open {path}: {e}")))?;

        log::debug!("serial: opened {path} at {} baud", settings.baud_rate);

        Ok(Self {
            port: Some(port),
            path: path.to_string(),
            poll: config.timeouts.poll,
        })
    }

    /// List available serial port names on the system.
    ///
    /// On Linux this crate is built without `libudev`; enumeration falls back
    /// to sysfs and may report fewer details.
    pub fn list_ports() -> Vec<String> {
        serialport::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.port_name)
            .collect()
    }

    fn port(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, DeviceError> {
        self.port.as_mut().ok_or(DeviceError::ConnectionClosed)
    }
}

impl Transport for SerialTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn peer(&self) -> String {
        self.path.clone()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        let port = self.port()?;
        port.write_all(data).map_err(DeviceError::WriteFailed)?;
        port.flush().map_err(DeviceError::WriteFailed)?;
        Ok(())
    }

    fn reader(&mut self) -> Result<Box<dyn Read + Send>, DeviceError> {
        let poll = self.poll;
        let mut clone = self
            .port()?
            .try_clone()
            .map_err(|e| DeviceError::SerialError(format!("failed to clone port handle: {e}")))?;
        clone
            .set_timeout(poll)
            .map_err(|e| DeviceError::SerialError(format!("failed to set read timeout: {e}")))?;
        Ok(Box::new(SerialReader(clone)))
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        if self.port.take().is_some() {
            log::debug!("serial: closed {}", self.path);
        }
        Ok(())
    }
}

/// Read half handed to the inbound thread.
struct SerialReader(Box<dyn serialport::SerialPort>);

impl Read for SerialReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

fn data_bits(bits: SerialDataBits) -> serialport::DataBits {
    match bits {
        SerialDataBits::Five => serialport::DataBits::Five,
        SerialDataBits::Six => serialport::DataBits::Six,
        SerialDataBits::Seven => serialport::DataBits::Seven,
        SerialDataBits::Eight => serialport::DataBits::Eight,
    }
}

fn parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Odd => serialport::Parity::Odd,
        SerialParity::Even => serialport::Parity::Even,
    }
}

fn stop_bits(bits: SerialStopBits) -> serialport::StopBits {
    match bits {
        SerialStopBits::One => serialport::StopBits::One,
        SerialStopBits::Two => serialport::StopBits::Two,
    }
}

fn flow_control(flow: SerialFlowControl) -> serialport::FlowControl {
    match flow {
        SerialFlowControl::None => serialport::FlowControl::None,
        SerialFlowControl::Software => serialport::FlowControl::Software,
        SerialFlowControl::Hardware => serialport::FlowControl::Hardware,
    }
}
