// HD44780 instruction set as used over the 4-bit expander interface.

// commands
pub const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
pub const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
pub const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Set the CGRAM pointer, OR'd with slot << 3
pub const LCD_CMD_FUNCTIONSET_4BIT: u8 = 0x28; //  4 bit interface, 2 lines, 5x7 font

// display on/off control
pub const LCD_CMD_DISPLAYON: u8 = 0x0C; //  Restore the display with the cursor hidden
pub const LCD_CMD_DISPLAYOFF: u8 = 0x08; //  Blank the display without clearing it

// single step cursor and display shifts
pub const LCD_CMD_MOVECURSORLEFT: u8 = 0x10; //  Move cursor one character left
pub const LCD_CMD_MOVECURSORRIGHT: u8 = 0x14; //  Move cursor one character right
pub const LCD_CMD_SCROLLLEFT: u8 = 0x18; //  Scroll all lines one character left
pub const LCD_CMD_SCROLLRIGHT: u8 = 0x1E; //  Scroll all lines one character right

/// Number of CGRAM glyph slots on the controller.
pub const CGRAM_SLOT_COUNT: u8 = 8;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Cursor style, sent as a complete display control command.
pub enum CursorType {
    /// Cursor hidden
    Off = 0x0C,
    /// Blinking block cursor
    Blink = 0x0D,
    /// Underline cursor
    On = 0x0E,
    /// Underline cursor plus blinking block
    OnBlink = 0x0F,
}

impl CursorType {
    pub const fn command(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Entry mode set command. Controls the address counter direction and whether the display
/// shifts on each write.
pub enum EntryMode {
    /// Decrement address counter, no display shift
    One = 0x04,
    /// Decrement address counter, display shift
    Two = 0x05,
    /// Increment address counter, no display shift
    #[default]
    Three = 0x06,
    /// Increment address counter, display shift
    Four = 0x07,
}

impl EntryMode {
    pub const fn command(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Direction for cursor moves and display scrolls.
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) const fn move_cursor_command(self) -> u8 {
        match self {
            Direction::Left => LCD_CMD_MOVECURSORLEFT,
            Direction::Right => LCD_CMD_MOVECURSORRIGHT,
        }
    }

    pub(crate) const fn scroll_command(self) -> u8 {
        match self {
            Direction::Left => LCD_CMD_SCROLLLEFT,
            Direction::Right => LCD_CMD_SCROLLRIGHT,
        }
    }
}

/// CGRAM pointer command for a glyph slot, or `None` when the slot does not exist.
pub(crate) const fn cgram_address(slot: u8) -> Option<u8> {
    if slot < CGRAM_SLOT_COUNT {
        Some(LCD_CMD_SETCGRAMADDR | (slot << 3))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_mode_commands() {
        assert_eq!(EntryMode::default().command(), 0x06);
        assert_eq!(EntryMode::One.command(), 0x04);
        assert_eq!(EntryMode::Four.command(), 0x07);
    }

    #[test]
    fn test_cgram_address() {
        assert_eq!(cgram_address(0), Some(0x40));
        assert_eq!(cgram_address(1), Some(0x48));
        assert_eq!(cgram_address(7), Some(0x78));
        assert_eq!(cgram_address(8), None);
        assert_eq!(cgram_address(255), None);
    }
}
