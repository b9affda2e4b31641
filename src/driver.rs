// HD44780 protocol engine
// Every public operation resolves to one or more controller bytes. Each byte goes through
// `write_byte`, which splits it into four PCF8574 frames (see `adapter_config::nibble_frames`)
// and hands each frame to the bus as its own single byte write. A failed frame write is never
// propagated: the remaining frames are still sent and, when debug logging is on, the failure is
// recorded in the transfer diagnostics.

use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, ErrorKind},
};

use crate::{
    adapter_config::{nibble_frames, BACKLIGHT_OFF_MASK, BACKLIGHT_ON_MASK},
    bus::BusTransportTrait,
    commands::{
        cgram_address, CursorType, Direction, EntryMode, CGRAM_SLOT_COUNT, LCD_CMD_CLEARDISPLAY,
        LCD_CMD_DISPLAYOFF, LCD_CMD_DISPLAYON, LCD_CMD_FUNCTIONSET_4BIT, LCD_CMD_RETURNHOME,
    },
    config::{DeviceSetupConfig, ProbePolicy, DEFAULT_I2C_ADDRESS},
    geometry::{Geometry, LcdDisplayType, LcdLine, LineWidth},
    CharacterDisplayError,
};

// settle times, in milliseconds
const POWER_ON_SETTLE_MS: u32 = 15;
const HOME_SYNC_SETTLE_MS: u32 = 5;
const CLEAR_SETTLE_MS: u32 = 5;
const DISPLAY_CONTROL_SETTLE_MS: u32 = 5;
const SINGLE_COMMAND_SETTLE_MS: u32 = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Progress of the initialization sequence.
pub enum InitState {
    Uninitialized,
    /// Bus is up and the expander answered the presence probe.
    BusUp,
    /// The controller has been switched into 4-bit mode.
    FourBitModeEntered,
    /// Initialization finished. All other operations are valid.
    Configured,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Bus failures observed while debug logging was enabled.
pub struct TransferDiagnostics {
    failed_transfers: u32,
    failed_probes: u32,
    last_error: Option<ErrorKind>,
}

impl TransferDiagnostics {
    /// number of frame writes that failed
    pub fn failed_transfers(&self) -> u32 {
        self.failed_transfers
    }

    /// number of presence probes the expander did not answer during `init`
    pub fn failed_probes(&self) -> u32 {
        self.failed_probes
    }

    /// error kind of the most recent failed frame write
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    fn record_transfer(&mut self, kind: ErrorKind) {
        self.failed_transfers = self.failed_transfers.saturating_add(1);
        self.last_error = Some(kind);
    }

    fn record_probe(&mut self) {
        self.failed_probes = self.failed_probes.saturating_add(1);
    }
}

/// HD44780 character display driven through a PCF8574T I2C expander.
///
/// One instance owns one physical display. All operations are blocking and run their full
/// sequence of transfers and settle delays before returning. `init` must complete before any
/// other operation is used; the driver does not guard against use before that.
pub struct CharacterDisplayPCF8574T<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    config: DeviceSetupConfig<BUS, DELAY>,
    geometry: Geometry,
    backlight_mask: u8,
    entry_mode: EntryMode,
    debug_logging: bool,
    diagnostics: TransferDiagnostics,
    state: InitState,
}

impl<BUS, DELAY> CharacterDisplayPCF8574T<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    /// Create a new character display object with the default I2C address for the PCF8574T.
    pub fn new(bus: BUS, delay: DELAY) -> Self {
        Self::new_with_address(bus, DEFAULT_I2C_ADDRESS, delay)
    }

    /// Create a new character display object with a specific I2C address for the PCF8574T.
    pub fn new_with_address(bus: BUS, address: u8, delay: DELAY) -> Self {
        Self {
            config: DeviceSetupConfig::new(bus, address, delay),
            geometry: Geometry::default(),
            backlight_mask: BACKLIGHT_ON_MASK,
            entry_mode: EntryMode::default(),
            debug_logging: false,
            diagnostics: TransferDiagnostics::default(),
            state: InitState::Uninitialized,
        }
    }

    /// Bus clock passed to the transport when the bus is brought up.
    pub fn with_bus_clock(mut self, clock_hz: u32) -> Self {
        self.config.clock_hz = clock_hz;
        self
    }

    /// How `init` reacts to an expander that does not answer the presence probe.
    pub fn with_probe_policy(mut self, probe_policy: ProbePolicy) -> Self {
        self.config.probe_policy = probe_policy;
        self
    }

    /// Release the bus and delay objects.
    pub fn release(self) -> (BUS, DELAY) {
        (self.config.bus, self.config.delay)
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Bus binding, clock and probe policy the display was set up with.
    pub fn setup(&self) -> &DeviceSetupConfig<BUS, DELAY> {
        &self.config
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The entry mode most recently requested through `init`, `change_entry_mode` or
    /// `reset_screen`.
    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    //--------------------------------------------------------------------------------------------------
    // lifecycle
    //--------------------------------------------------------------------------------------------------

    /// Initialize the display. This must be called before using the display.
    ///
    /// `columns` must be 16 or 20, the two widths with a known line 3 and line 4 layout; any other
    /// width is rejected before the bus is touched. `rows` is stored as given.
    ///
    /// The expander is probed with a one byte read after the bus is brought up. What happens when
    /// it does not answer is decided by the `ProbePolicy` given to `with_probe_policy`. With
    /// `ProbePolicy::RetryForever` this call blocks until the expander appears.
    pub fn init(
        &mut self,
        cursor: CursorType,
        rows: u8,
        columns: u8,
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        let width =
            LineWidth::try_from(columns).map_err(|_| CharacterDisplayError::UnsupportedGeometry)?;
        self.geometry = Geometry::new(rows, width);
        self.state = InitState::Uninitialized;

        self.bring_up_bus()?;
        self.state = InitState::BusUp;
        #[cfg(feature = "defmt")]
        defmt::debug!("expander found at {=u8:#x}", self.config.address);

        self.config.delay.delay_ms(POWER_ON_SETTLE_MS);
        // the controller may still be in 8-bit mode and misread the first nibbles
        for _ in 0..3 {
            self.send_command(LCD_CMD_RETURNHOME);
            self.config.delay.delay_ms(HOME_SYNC_SETTLE_MS);
        }
        self.send_command(LCD_CMD_FUNCTIONSET_4BIT);
        self.state = InitState::FourBitModeEntered;

        self.send_command(LCD_CMD_DISPLAYON);
        self.send_command(cursor.command());
        self.entry_mode = EntryMode::default();
        self.send_command(self.entry_mode.command());
        self.send_command(LCD_CMD_CLEARDISPLAY);
        self.config.delay.delay_ms(CLEAR_SETTLE_MS);

        self.state = InitState::Configured;
        #[cfg(feature = "defmt")]
        defmt::info!("display configured: {} rows x {} columns", rows, columns);
        Ok(self)
    }

    /// Initialize the display using the geometry of a common display type.
    pub fn init_display_type(
        &mut self,
        cursor: CursorType,
        display_type: LcdDisplayType,
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.init(cursor, display_type.rows(), display_type.cols())
    }

    /// Release the bus binding. `init` must be called again before further use.
    pub fn deinit(&mut self) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.config
            .bus
            .release()
            .map_err(CharacterDisplayError::BusError)?;
        self.state = InitState::Uninitialized;
        Ok(self)
    }

    fn bring_up_bus(&mut self) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.config
            .bus
            .bring_up(self.config.clock_hz())
            .map_err(CharacterDisplayError::BusError)?;

        let mut failed_probes: u32 = 0;
        loop {
            let mut probe = [0u8; 1];
            let Err(_e) = self.config.bus.read(self.config.address, &mut probe) else {
                return Ok(());
            };
            failed_probes = failed_probes.saturating_add(1);
            if self.debug_logging {
                self.diagnostics.record_probe();
            }
            #[cfg(feature = "defmt")]
            if self.debug_logging {
                defmt::warn!("probe failed: {}", _e.kind());
            }
            match self.config.probe_policy.backoff_after(failed_probes) {
                Some(backoff_ms) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "no answer from {=u8:#x}, probing again in {} ms",
                        self.config.address,
                        backoff_ms
                    );
                    self.config.delay.delay_ms(backoff_ms);
                }
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "no answer from {=u8:#x} after {} probes",
                        self.config.address,
                        failed_probes
                    );
                    return Err(CharacterDisplayError::BusUnavailable);
                }
            }
        }
    }

    //--------------------------------------------------------------------------------------------------
    // command and data dispatch
    //--------------------------------------------------------------------------------------------------

    /// Sends an instruction byte to the controller. Normally users do not need to call this
    /// directly.
    pub fn send_command(&mut self, command: u8) -> &mut Self {
        self.write_byte(false, command);
        self
    }

    /// Sends a data byte to DDRAM or CGRAM, depending on the prior address command. Normally users
    /// do not need to call this directly.
    pub fn send_data(&mut self, data: u8) -> &mut Self {
        self.write_byte(true, data);
        self
    }

    fn write_byte(&mut self, rs_setting: bool, value: u8) {
        for frame in nibble_frames(value, rs_setting, self.backlight_mask) {
            self.write_frame(frame);
        }
    }

    fn write_frame(&mut self, frame: u8) {
        if let Err(e) = self.config.bus.write(self.config.address, &[frame]) {
            #[cfg(feature = "defmt")]
            if self.debug_logging {
                defmt::warn!("frame {=u8:#x} failed: {}", frame, e.kind());
            }
            if self.debug_logging {
                self.diagnostics.record_transfer(e.kind());
            }
        }
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Clears the screen by writing spaces over every line present on the display. Does nothing
    /// when the configured row count is outside 1..=4. See `clear_screen_cmd` for the controller's
    /// own clear instruction.
    pub fn clear_screen(&mut self) -> &mut Self {
        for &line in self.geometry.lines() {
            self.clear_line(line);
        }
        self
    }

    /// Clear display using the controller instruction, which also homes the cursor.
    pub fn clear_screen_cmd(&mut self) -> &mut Self {
        self.send_command(LCD_CMD_CLEARDISPLAY);
        self.config.delay.delay_ms(SINGLE_COMMAND_SETTLE_MS);
        self
    }

    /// Writes a space to every column of `line`. The cursor is left after the line's last column,
    /// not returned to column 0.
    pub fn clear_line(&mut self, line: LcdLine) -> &mut Self {
        self.send_command(self.geometry.line_base(line));
        for _ in 0..self.geometry.columns() {
            self.send_data(b' ');
        }
        self
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> &mut Self {
        self.send_command(LCD_CMD_RETURNHOME);
        self.config.delay.delay_ms(SINGLE_COMMAND_SETTLE_MS);
        self
    }

    /// Move the cursor to a zero-indexed column on `line`. The column is not range checked.
    pub fn goto(&mut self, line: LcdLine, col: u8) -> &mut Self {
        self.send_command(self.geometry.address(line, col))
    }

    /// Prints the bytes of `text` at the current cursor position. Bytes are sent unchanged, so
    /// anything outside ASCII shows whatever the controller's character ROM holds at that code.
    pub fn send_string(&mut self, text: &str) -> &mut Self {
        for byte in text.bytes() {
            self.send_data(byte);
        }
        self
    }

    pub fn send_char(&mut self, character: u8) -> &mut Self {
        self.send_data(character)
    }

    /// Stores a glyph bitmap in CGRAM slot `slot` (0-7). Out of range slots are ignored.
    ///
    /// The controller's address counter points into CGRAM afterwards, so position the cursor with
    /// `goto` or `home` before printing text again.
    pub fn create_custom_char(&mut self, slot: u8, charmap: [u8; 8]) -> &mut Self {
        if let Some(command) = cgram_address(slot) {
            self.send_command(command);
            for row in charmap {
                self.send_data(row);
            }
        }
        self
    }

    /// Prints the glyph stored in CGRAM slot `slot` (0-7). Out of range slots are ignored.
    pub fn print_custom_char(&mut self, slot: u8) -> &mut Self {
        if slot < CGRAM_SLOT_COUNT {
            self.send_data(slot);
        }
        self
    }

    /// Move the cursor `count` positions. The controller only steps one position per instruction.
    pub fn move_cursor(&mut self, direction: Direction, count: u8) -> &mut Self {
        for _ in 0..count {
            self.send_command(direction.move_cursor_command());
        }
        self
    }

    /// Scroll all lines `count` positions.
    pub fn scroll(&mut self, direction: Direction, count: u8) -> &mut Self {
        for _ in 0..count {
            self.send_command(direction.scroll_command());
        }
        self
    }

    pub fn change_entry_mode(&mut self, entry_mode: EntryMode) -> &mut Self {
        self.entry_mode = entry_mode;
        self.send_command(entry_mode.command());
        self.config.delay.delay_ms(SINGLE_COMMAND_SETTLE_MS);
        self
    }

    /// Re-applies the 4-bit function set, display on and `cursor`, then clears the screen and
    /// restores the default entry mode. This is how the cursor style is changed after `init`; the
    /// clear and the entry mode reset always come with it.
    pub fn reset_screen(&mut self, cursor: CursorType) -> &mut Self {
        self.send_command(LCD_CMD_FUNCTIONSET_4BIT);
        self.send_command(LCD_CMD_DISPLAYON);
        self.send_command(cursor.command());
        self.send_command(LCD_CMD_CLEARDISPLAY);
        self.entry_mode = EntryMode::default();
        self.send_command(self.entry_mode.command());
        self.config.delay.delay_ms(CLEAR_SETTLE_MS);
        self
    }

    /// Turn the display on (cursor hidden) or blank it without clearing DDRAM.
    pub fn display_on(&mut self, on: bool) -> &mut Self {
        self.send_command(if on {
            LCD_CMD_DISPLAYON
        } else {
            LCD_CMD_DISPLAYOFF
        });
        self.config.delay.delay_ms(DISPLAY_CONTROL_SETTLE_MS);
        self
    }

    /// Turn the backlight on or off.
    ///
    /// Nothing is sent to the bus. The new state rides along with the next command or data
    /// transfer, so it only becomes visible then.
    pub fn set_backlight(&mut self, on: bool) -> &mut Self {
        self.backlight_mask = if on {
            BACKLIGHT_ON_MASK
        } else {
            BACKLIGHT_OFF_MASK
        };
        self
    }

    pub fn backlight(&self) -> bool {
        self.backlight_mask != BACKLIGHT_OFF_MASK
    }

    /// Enables recording of transfer failures.
    pub fn set_debug_logging(&mut self, on: bool) -> &mut Self {
        self.debug_logging = on;
        #[cfg(feature = "defmt")]
        if on {
            defmt::info!("debug logging on");
        }
        self
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    pub fn transfer_diagnostics(&self) -> TransferDiagnostics {
        self.diagnostics
    }

    pub fn clear_transfer_diagnostics(&mut self) -> &mut Self {
        self.diagnostics = TransferDiagnostics::default();
        self
    }
}
