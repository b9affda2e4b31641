//! This Rust `embedded-hal`-based library drives a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display wired through a **PCF8574T I2C expander** ("I2C backpack") in an embedded, `no_std` environment.
//! These backpacks are ubiquitous on eBay and AliExpress and have no clear branding. The supported wiring is the common one:
//! RS on P0, RW on P1, EN on P2, the backlight transistor on P3 and the display's 4-bit data pins on P4-P7.
//!
//! Key features include:
//! - Convenient high-level API for controlling the display
//! - Support for custom characters in all eight CGRAM slots
//! - Backlight control
//! - 1 to 4 line displays with 16 or 20 columns
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Configurable presence probing so a late powering backpack can be waited for
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! hd44780-pcf8574 = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which allows the library's types to be used with the `defmt` logging
//! framework and logs bus failures while debug logging is turned on. Another optional feature is `features = ["ufmt"]`, which enables the `ufmt`
//! feature, allowing the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Wrap the I2C peripheral in an `I2cBus` and create the display:
//! ```rust
//! use hd44780_pcf8574::{CharacterDisplayPCF8574T, CursorType, I2cBus, ProbePolicy};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral
//! let delay = ...; // DelayNs implementation
//!
//! // backpack at the default address 0x27
//! let mut lcd = CharacterDisplayPCF8574T::new(I2cBus::new(i2c), delay);
//! // or at another address, waiting for the backpack to answer
//! let mut lcd = CharacterDisplayPCF8574T::new_with_address(I2cBus::new(i2c), 0x3F, delay)
//!     .with_probe_policy(ProbePolicy::Retry { retries: 5, backoff_ms: 100 });
//! ```
//! Boards that must configure the bus pins and clock themselves can implement `BusTransportTrait` instead of using `I2cBus`.
//!
//! Initialize the display:
//! ```rust
//! if let Err(e) = lcd.init(CursorType::Off, 2, 16) {
//!    panic!("Error initializing LCD: {}", e);
//! }
//! ```
//! Use the display:
//! ```rust
//! use hd44780_pcf8574::LcdLine;
//!
//! lcd.send_string("Hello,").goto(LcdLine::Two, 0).send_string("world!");
//! // can also use the `core::fmt::write!` macro
//! use core::fmt::Write;
//!
//! write!(lcd, "{} C", 21)?;
//! ```
//! The optional `ufmt` feature enables the `ufmt` crate, which allows the `uwriteln!` and `uwrite!` macros to be used with the display:
//! ```rust
//! use ufmt::uwrite;
//!
//! uwrite!(lcd, "{} C", 21)?;
//! ```
//!
//! Apart from `init` and `deinit`, every method returns the display object, allowing for easy chaining of commands. Bus transfers are best effort:
//! a frame the backpack does not acknowledge is skipped and the rest of the sequence is still sent. Turn on `set_debug_logging` to have those
//! failures counted in `transfer_diagnostics`.
//!
//! The backlight state is carried in every frame, so `set_backlight` takes effect with the next command or character sent to the display.
#![no_std]

use core::fmt::Display;
use embedded_hal::{delay::DelayNs, i2c};

mod adapter_config;
mod bus;
mod commands;
mod config;
mod driver;
mod geometry;

pub use bus::{BusTransportTrait, I2cBus};
pub use commands::{CursorType, Direction, EntryMode, CGRAM_SLOT_COUNT};
pub use config::{DeviceSetupConfig, ProbePolicy, DEFAULT_BUS_CLOCK_HZ, DEFAULT_I2C_ADDRESS};
pub use driver::{CharacterDisplayPCF8574T, InitState, TransferDiagnostics};
pub use geometry::{Geometry, LcdDisplayType, LcdLine, LineWidth};

#[derive(Debug, PartialEq, Copy, Clone)]
/// Errors that can occur when setting up the display
pub enum CharacterDisplayError<E>
where
    E: i2c::Error,
{
    /// Error returned from the bus while bringing it up or releasing it
    BusError(E),
    /// The expander never answered the presence probe
    BusUnavailable,
    /// Only 16 and 20 column displays are supported
    UnsupportedGeometry,
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<E> From<core::fmt::Error> for CharacterDisplayError<E>
where
    E: i2c::Error,
{
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<E> From<&CharacterDisplayError<E>> for &'static str
where
    E: i2c::Error,
{
    fn from(err: &CharacterDisplayError<E>) -> Self {
        match err {
            CharacterDisplayError::BusError(_) => "Bus error",
            CharacterDisplayError::BusUnavailable => "Display not found on bus",
            CharacterDisplayError::UnsupportedGeometry => "Unsupported display geometry",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for CharacterDisplayError<E>
where
    E: i2c::Error,
{
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl<E> ufmt::uDisplay for CharacterDisplayError<E>
where
    E: i2c::Error,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<E> Display for CharacterDisplayError<E>
where
    E: i2c::Error,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

/// Byte sink for print helpers that live outside this crate. Each byte is sent to the display as
/// character data at the current cursor position.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8);
}

impl<BUS, DELAY> ByteSink for CharacterDisplayPCF8574T<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    fn write_byte(&mut self, byte: u8) {
        self.send_data(byte);
    }
}

/// Implement the `core::fmt::Write` trait for the display, allowing it to be used with the `write!` macro.
/// Transfers are best effort, so this never returns an error.
impl<BUS, DELAY> core::fmt::Write for CharacterDisplayPCF8574T<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        self.send_string(s);
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the display, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<BUS, DELAY> ufmt::uWrite for CharacterDisplayPCF8574T<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.send_string(s);
        Ok(())
    }

    type Error = CharacterDisplayError<BUS::Error>;
}
