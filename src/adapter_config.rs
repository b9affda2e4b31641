use bitfield::bitfield;

/// Backlight mask applied to the control lines of every frame while the backlight is on.
pub const BACKLIGHT_ON_MASK: u8 = 0x0F;
/// Backlight mask applied while the backlight is off. Only P3 is cleared.
pub const BACKLIGHT_OFF_MASK: u8 = 0x07;

// Pin wiring of the common PCF8574T backpack. Control lines sit on P0-P3 and the
// HD44780 D4-D7 data lines on P4-P7.
bitfield! {
    pub struct Pcf8574Frame(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub rw, set_rw: 1, 1;
    pub enable, set_enable: 2, 2;
    pub backlight, set_backlight: 3, 3;
    pub data, set_data: 7, 4;
}

impl Clone for Pcf8574Frame {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl Pcf8574Frame {
    /// Builds one expander frame holding `nibble` on the data lines. The backlight line is
    /// driven high and then gated by `backlight_mask`, so the mask decides the low nibble.
    pub fn compose(nibble: u8, enable: bool, rs_setting: bool, backlight_mask: u8) -> Self {
        let mut frame = Pcf8574Frame(0);
        frame.set_data(nibble & 0x0F);
        frame.set_backlight(1);
        frame.set_enable(enable as u8);
        frame.set_rw(0);
        frame.set_rs(rs_setting as u8);
        Pcf8574Frame(frame.0 & (0xF0 | (backlight_mask & 0x0F)))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Splits `value` into the four frames the HD44780 needs in 4-bit mode: high nibble with
/// enable raised, high nibble with enable lowered, then the same pair for the low nibble.
/// If `rs_setting` is `true` the byte lands in the data register (DDRAM or CGRAM, depending on
/// the prior address command), otherwise in the instruction register.
pub fn nibble_frames(value: u8, rs_setting: bool, backlight_mask: u8) -> [u8; 4] {
    let high = value >> 4;
    let low = value & 0x0F;
    [
        Pcf8574Frame::compose(high, true, rs_setting, backlight_mask).bits(),
        Pcf8574Frame::compose(high, false, rs_setting, backlight_mask).bits(),
        Pcf8574Frame::compose(low, true, rs_setting, backlight_mask).bits(),
        Pcf8574Frame::compose(low, false, rs_setting, backlight_mask).bits(),
    ]
}
