use embedded_hal::i2c;

/// The two-wire bus collaborator the display driver sends its frames through.
///
/// Implementations own the physical bus segment. Any bounded timeout on a transfer is the
/// implementation's concern: a timed out transfer is reported as an `Err` and the driver treats
/// it exactly like any other failed transfer.
pub trait BusTransportTrait {
    /// Error type reported by the bus. The `embedded-hal` error kind is used as the diagnostic
    /// code when transfer failures are logged.
    type Error: i2c::Error;

    /// Bring the bus up at the requested clock rate (pin function assignment, pull-ups and clock
    /// configuration). Transports whose HAL configured the bus at construction can rely on the
    /// default, which does nothing.
    fn bring_up(&mut self, _clock_hz: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Blocking write of `bytes` to the device at the 7-bit `address`.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Blocking read into `buffer` from the device at the 7-bit `address`. Used to probe for the
    /// expander during initialization.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Release the bus and its pin functions.
    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Transport for any `embedded-hal` 1.0 I2C peripheral.
///
/// The HAL has already muxed the pins and set the bus clock when the peripheral was built, so
/// bring-up and release are no-ops here.
pub struct I2cBus<I2C>
where
    I2C: i2c::I2c,
{
    i2c: I2C,
}

impl<I2C> I2cBus<I2C>
where
    I2C: i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// returns a mutable reference to the wrapped I2C peripheral. mostly needed for testing
    pub fn inner_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C> From<I2C> for I2cBus<I2C>
where
    I2C: i2c::I2c,
{
    fn from(i2c: I2C) -> Self {
        Self::new(i2c)
    }
}

impl<I2C> BusTransportTrait for I2cBus<I2C>
where
    I2C: i2c::I2c,
{
    type Error = I2C::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, buffer)
    }
}
