//! Receipt printer profile.

use escpos_link_codes::printer::{Align, CutMode, Font, RasterScale, TextStyle, Underline};
use escpos_link_codes::{
    BarcodeSetup, PRINTER_LINE_WIDTH, PaperStatus, StatusRequest, Symbology, center_text, printer,
};

use crate::{Device, DeviceConfig, DeviceError, ListenerId, StatusEncoding, StatusReply, Target};

/// A thermal receipt printer on top of a [`Device`].
///
/// Every text line is terminated with `LF CR`.
#[derive(Debug)]
pub struct ReceiptPrinter {
    device: Device,
}

impl ReceiptPrinter {
    /// Open and initialize a printer.
    pub fn open(target: &Target, config: DeviceConfig) -> Result<Self, DeviceError> {
        Ok(Self::new(Device::open(target, config)?))
    }

    /// Wrap an already-initialized device.
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// The underlying device handle.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Mutable access for raw writes and listeners.
    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    /// Unwrap into the device handle.
    pub fn into_inner(self) -> Device {
        self.device
    }

    /// Print `text` followed by the line terminator.
    pub fn print_line(&mut self, text: &str) -> Result<(), DeviceError> {
        self.device.send_text(&terminated(text))
    }

    /// Print `text` centered on a 40-column line.
    pub fn print_centered(&mut self, text: &str) -> Result<(), DeviceError> {
        self.print_centered_width(text, PRINTER_LINE_WIDTH)
    }

    /// Print `text` centered on a `width`-column line.
    pub fn print_centered_width(&mut self, text: &str, width: usize) -> Result<(), DeviceError> {
        self.device.send_text(&terminated(&center_text(text, width)))
    }

    /// Send arbitrary command bytes.
    pub fn print_command(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        self.device.send_raw(bytes)
    }

    /// Cut the paper.
    pub fn cut(&mut self, mode: CutMode) -> Result<(), DeviceError> {
        self.device.send_raw(mode.command())
    }

    /// Select normal, double-height, or double-width text.
    pub fn set_style(&mut self, style: TextStyle) -> Result<(), DeviceError> {
        self.device.send_raw(style.command())
    }

    /// Select the underline mode.
    pub fn set_underline(&mut self, underline: Underline) -> Result<(), DeviceError> {
        self.device.send_raw(underline.command())
    }

    /// Turn emphasized printing on or off.
    pub fn set_bold(&mut self, bold: bool) -> Result<(), DeviceError> {
        self.device.send_raw(if bold {
            printer::TXT_BOLD_ON
        } else {
            printer::TXT_BOLD_OFF
        })
    }

    /// Select font A or B.
    pub fn set_font(&mut self, font: Font) -> Result<(), DeviceError> {
        self.device.send_raw(font.command())
    }

    /// Set justification for the following lines.
    pub fn set_align(&mut self, align: Align) -> Result<(), DeviceError> {
        self.device.send_raw(align.command())
    }

    /// Send HRI position, HRI font, height, and module width.
    pub fn barcode_setup(&mut self, setup: &BarcodeSetup) -> Result<(), DeviceError> {
        let bytes = setup.to_bytes()?;
        self.device.send_raw(&bytes)
    }

    /// Print a barcode. The data is validated before anything is sent.
    pub fn print_barcode(&mut self, symbology: Symbology, data: &str) -> Result<(), DeviceError> {
        let bytes = symbology.print_command(data)?;
        self.device.send_raw(&bytes)
    }

    /// Print a raster bit image; see [`RasterScale::image_command`].
    pub fn print_raster(
        &mut self,
        scale: RasterScale,
        width_bytes: u16,
        height_dots: u16,
        data: &[u8],
    ) -> Result<(), DeviceError> {
        let bytes = scale.image_command(width_bytes, height_dots, data)?;
        self.device.send_raw(&bytes)
    }

    /// Ask for the roll paper sensor status; see [`Device::get_paper_status`].
    pub fn get_paper_status<F>(
        &mut self,
        encoding: StatusEncoding,
        callback: F,
    ) -> Result<ListenerId, DeviceError>
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.device.get_paper_status(encoding, callback)
    }

    /// Blocking status query; see [`Device::query_status_blocking`].
    pub fn query_status(&mut self, request: StatusRequest) -> Result<StatusReply, DeviceError> {
        self.device.query_status_blocking(request)
    }

    /// Blocking roll paper status query.
    pub fn paper_status(&mut self) -> Result<PaperStatus, DeviceError> {
        self.device.paper_status()
    }

    /// Close the underlying device.
    pub fn close(&mut self) -> Result<(), DeviceError> {
        self.device.close()
    }
}

fn terminated(text: &str) -> String {
    format!("{text}\n\r")
}
