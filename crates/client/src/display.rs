//! Customer display (2×20 VFD) profile.

use escpos_link_codes::vfd::{self, CursorMove};
use escpos_link_codes::{DISPLAY_LINE_WIDTH, center_text};

use crate::{Device, DeviceConfig, DeviceError, Target};

/// A pole display on top of a [`Device`].
#[derive(Debug)]
pub struct CustomerDisplay {
    device: Device,
}

impl CustomerDisplay {
    /// Open and initialize a display.
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

    /// Mutable access for raw writes and status queries.
    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    /// Unwrap into the device handle.
    pub fn into_inner(self) -> Device {
        self.device
    }

    /// Show or hide the cursor.
    pub fn show_cursor(&mut self, visible: bool) -> Result<(), DeviceError> {
        self.device.send_raw(&vfd::cursor_display(visible))
    }

    /// Replace the top line with `text`, centered.
    pub fn centered_top_line(&mut self, text: &str) -> Result<(), DeviceError> {
        self.centered_line(CursorMove::Home, text)
    }

    /// Replace the bottom line with `text`, centered.
    pub fn centered_bottom_line(&mut self, text: &str) -> Result<(), DeviceError> {
        self.centered_line(CursorMove::Bottom, text)
    }

    fn centered_line(&mut self, position: CursorMove, text: &str) -> Result<(), DeviceError> {
        self.device.send_raw(position.command())?;
        self.device.send_raw(vfd::CLEAR_CURSOR_LINE)?;
        self.device.send_text(&center_text(text, DISPLAY_LINE_WIDTH))
    }

    /// Move the cursor one step or to an edge.
    pub fn move_cursor(&mut self, movement: CursorMove) -> Result<(), DeviceError> {
        self.device.send_raw(movement.command())
    }

    /// Move the cursor to column `col` (1–20) of row `row` (1–2).
    pub fn goto(&mut self, col: u8, row: u8) -> Result<(), DeviceError> {
        let cmd = vfd::cursor_goto(col, row)?;
        self.device.send_raw(&cmd)
    }

    /// Clear both lines.
    pub fn clear_screen(&mut self) -> Result<(), DeviceError> {
        self.device.send_raw(vfd::CLEAR_SCREEN)
    }

    /// Clear the line the cursor is on.
    pub fn clear_line(&mut self) -> Result<(), DeviceError> {
        self.device.send_raw(vfd::CLEAR_CURSOR_LINE)
    }

    /// Set brightness (1–4).
    pub fn brightness(&mut self, level: u8) -> Result<(), DeviceError> {
        let cmd = vfd::brightness(level)?;
        self.device.send_raw(&cmd)
    }

    /// Blink at `interval × 50 ms`; 0 stops blinking, 255 blanks the display.
    pub fn blink(&mut self, interval: u8) -> Result<(), DeviceError> {
        self.device.send_raw(&vfd::blink(interval))
    }

    /// Write text at the cursor.
    pub fn text(&mut self, text: &str) -> Result<(), DeviceError> {
        self.device.send_text(text)
    }

    /// Close the underlying device.
    pub fn close(&mut self) -> Result<(), DeviceError> {
        self.device.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPeer, mock};

    fn open_mock() -> (CustomerDisplay, MockPeer) {
        let (transport, peer) = mock();
        let device = Device::with_transport(Box::new(transport), DeviceConfig::default()).unwrap();
        (CustomerDisplay::new(device), peer)
    }

    #[test]
    fn show_then_hide_cursor_differ_in_last_byte() {
        let (mut display, peer) = open_mock();
        display.show_cursor(true).unwrap();
        display.show_cursor(false).unwrap();
        assert_eq!(
            peer.after_init(),
            vec![b"\x1f\x43\x01".to_vec(), b"\x1f\x43\x00".to_vec()]
        );
    }

    #[test]
    fn top_line_is_home_clear_then_centered_text() {
        let (mut display, peer) = open_mock();
        display.centered_top_line("TOTAL").unwrap();
        assert_eq!(
            peer.after_init(),
            vec![
                b"\x0b".to_vec(),
                b"\x18".to_vec(),
                format!("{}TOTAL", " ".repeat(7)).into_bytes(),
            ]
        );
    }

    #[test]
    fn bottom_line_uses_bottom_position() {
        let (mut display, peer) = open_mock();
        display.centered_bottom_line("$ 12.50").unwrap();
        let writes = peer.after_init();
        assert_eq!(writes[0], b"\x1f\x42");
        assert_eq!(writes[1], b"\x18");
        assert_eq!(writes[2], b"      $ 12.50");
    }

    #[test]
    fn long_line_is_sent_unpadded() {
        let (mut display, peer) = open_mock();
        let text = "eighteen chars ok!";
        display.centered_top_line(text).unwrap();
        assert_eq!(peer.after_init()[2], text.as_bytes());
    }

    #[test]
    fn out_of_range_parameters_write_nothing() {
        let (mut display, peer) = open_mock();
        assert!(matches!(
            display.goto(21, 1),
            Err(DeviceError::InvalidArgument(_))
        ));
        assert!(matches!(
            display.brightness(0),
            Err(DeviceError::InvalidArgument(_))
        ));
        assert!(peer.after_init().is_empty());
    }

    #[test]
    fn cursor_and_screen_commands() {
        let (mut display, peer) = open_mock();
        display.goto(20, 2).unwrap();
        display.move_cursor(CursorMove::Left).unwrap();
        display.clear_screen().unwrap();
        display.brightness(4).unwrap();
        display.blink(0).unwrap();
        assert_eq!(
            peer.bytes()[2..],
            *b"\x1f\x24\x14\x02\x08\x0c\x1f\x58\x04\x1f\x45\x00"
        );
    }
}
