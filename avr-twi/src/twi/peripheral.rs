use core::{
    borrow::{Borrow, BorrowMut},
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

#[cfg(feature = "atmega328p")]
use avr_hal_generic::{clock::Clock, port};

/// Data direction of a transfer; the value is the LSB of the SLA+R/W byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// The raw capability a TWI peripheral has to offer.
///
/// Every `send_*` method issues exactly one hardware command and returns
/// without waiting; completion is reported through [`is_ready`].
/// Implementations exist for the on-chip peripherals (behind the per-MCU
/// features) and for simulated buses in tests.
///
/// [`is_ready`]: Self::is_ready
pub trait TwiOps<SDA, SCL> {
    /// Programs the bit-rate register and enables the peripheral.
    fn setup(&mut self, bit_rate: u8);

    /// Commands a START (or repeated START) condition.
    fn send_start(&mut self);

    /// Places a pre-composed SLA+R/W byte on the bus, as produced by
    /// [`Address::as_write_byte`] / [`Address::as_read_byte`].
    ///
    /// [`Address::as_write_byte`]: super::Address::as_write_byte
    /// [`Address::as_read_byte`]: super::Address::as_read_byte
    fn send_slarw(&mut self, slarw: u8);

    /// Places one data byte on the bus.
    fn send_write(&mut self, byte: u8);

    /// Commands reception of one byte, acknowledged iff `ack`.
    fn send_read(&mut self, ack: bool);

    /// Commands a STOP condition. The hardware clears it on its own; there
    /// is no completion to wait for.
    fn send_stop(&mut self);

    /// Whether the last command has completed.
    fn is_ready(&self) -> bool;

    /// The byte latched by the last completed read command.
    fn read_data(&self) -> u8;
}

#[cfg(feature = "atmega328p")]
impl
    TwiOps<
        crate::hal::port::Pin<crate::hal::port::mode::Input, crate::hal::port::PC4>,
        crate::hal::port::Pin<crate::hal::port::mode::Input, crate::hal::port::PC5>,
    > for crate::hal::pac::TWI
{
    #[inline(always)]
    fn setup(&mut self, bit_rate: u8) {
        self.twbr.write(|w| unsafe { w.bits(bit_rate) });

        // Disable prescaler
        self.twsr.write(|w| w.twps().prescaler_1());

        self.twcr.write(|w| w.twen().set_bit());
    }

    #[inline(always)]
    fn send_start(&mut self) {
        self.twcr
            .write(|w| w.twint().set_bit().twen().set_bit().twsta().set_bit());
    }

    #[inline(always)]
    fn send_slarw(&mut self, slarw: u8) {
        self.twdr.write(|w| unsafe { w.bits(slarw) });
        self.twcr.write(|w| w.twint().set_bit().twen().set_bit());
    }

    #[inline(always)]
    fn send_write(&mut self, byte: u8) {
        self.twdr.write(|w| unsafe { w.bits(byte) });
        self.twcr.write(|w| w.twint().set_bit().twen().set_bit());
    }

    #[inline(always)]
    fn send_read(&mut self, ack: bool) {
        if ack {
            self.twcr
                .write(|w| w.twint().set_bit().twen().set_bit().twea().set_bit());
        } else {
            self.twcr.write(|w| w.twint().set_bit().twen().set_bit());
        }
    }

    #[inline(always)]
    fn send_stop(&mut self) {
        self.twcr
            .write(|w| w.twint().set_bit().twen().set_bit().twsto().set_bit());
    }

    #[inline(always)]
    fn is_ready(&self) -> bool {
        self.twcr.read().twint().bit_is_set()
    }

    #[inline(always)]
    fn read_data(&self) -> u8 {
        self.twdr.read().bits()
    }
}

/// A TWI peripheral bundled with its SDA/SCL pins and the system clock it
/// was configured against.
pub struct TwiPeripheral<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> {
    p: TWI,
    sda: SDA,
    scl: SCL,
    _clock: PhantomData<CLOCK>,
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    /// Wraps an already-configured peripheral.
    #[inline]
    pub fn from_parts(p: TWI, sda: SDA, scl: SCL) -> Self {
        Self {
            p,
            sda,
            scl,
            _clock: PhantomData,
        }
    }

    /// Gives the peripheral and pins back.
    #[inline]
    pub fn release(self) -> (TWI, SDA, SCL) {
        (self.p, self.sda, self.scl)
    }
}

#[cfg(feature = "atmega328p")]
impl<TWI, SDAPIN, SCLPIN, CLOCK>
    TwiPeripheral<
        TWI,
        port::Pin<port::mode::Input, SDAPIN>,
        port::Pin<port::mode::Input, SCLPIN>,
        CLOCK,
    >
where
    TWI: TwiOps<port::Pin<port::mode::Input, SDAPIN>, port::Pin<port::mode::Input, SCLPIN>>,
    SDAPIN: port::PinOps,
    SCLPIN: port::PinOps,
    CLOCK: Clock,
{
    pub fn new(
        p: TWI,
        sda: port::Pin<port::mode::Input<port::mode::PullUp>, SDAPIN>,
        scl: port::Pin<port::mode::Input<port::mode::PullUp>, SCLPIN>,
        speed: u32,
    ) -> Self {
        let mut twi = Self::from_parts(p, sda.forget_imode(), scl.forget_imode());
        twi.p.setup(bit_rate(CLOCK::FREQ, speed));
        twi
    }

    pub fn with_external_pullup(
        p: TWI,
        sda: port::Pin<port::mode::Input<port::mode::Floating>, SDAPIN>,
        scl: port::Pin<port::mode::Input<port::mode::Floating>, SCLPIN>,
        speed: u32,
    ) -> Self {
        let mut twi = Self::from_parts(p, sda.forget_imode(), scl.forget_imode());
        twi.p.setup(bit_rate(CLOCK::FREQ, speed));
        twi
    }
}

/// TWBR value for `speed` Hz with prescaler 1. 16 MHz / 100 kHz gives 72.
///
/// TWBR is 8 bits wide: with prescaler 1 the clock divisor must stay in
/// `16 ..= 526`, i.e. roughly FREQ/526 to FREQ/16 Hz.
#[cfg(any(feature = "atmega328p", test))]
#[inline(always)]
fn bit_rate(freq: u32, speed: u32) -> u8 {
    debug_assert!((16..=526).contains(&(freq / speed)));
    ((freq / speed - 16) / 2) as u8
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> Deref for TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    type Target = TWI;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.p
    }
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> DerefMut for TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.p
    }
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> Borrow<TWI> for TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    #[inline(always)]
    fn borrow(&self) -> &TWI {
        &self.p
    }
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> BorrowMut<TWI>
    for TwiPeripheral<TWI, SDA, SCL, CLOCK>
{
    #[inline(always)]
    fn borrow_mut(&mut self) -> &mut TWI {
        &mut self.p
    }
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> AsRef<TWI> for TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    #[inline(always)]
    fn as_ref(&self) -> &TWI {
        &self.p
    }
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> AsMut<TWI> for TwiPeripheral<TWI, SDA, SCL, CLOCK> {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut TWI {
        &mut self.p
    }
}

#[cfg(feature = "atmega328p")]
pub type TwiPeripheral1Pac = crate::hal::pac::TWI;

#[cfg(feature = "atmega328p")]
pub type TwiPeripheral1Sda = crate::hal::port::PC4;

#[cfg(feature = "atmega328p")]
pub type TwiPeripheral1Scl = crate::hal::port::PC5;

#[cfg(feature = "atmega328p")]
pub type TwiPeripheral1<CLOCK> = TwiPeripheral<
    TwiPeripheral1Pac,
    crate::hal::port::Pin<crate::hal::port::mode::Input, TwiPeripheral1Sda>,
    crate::hal::port::Pin<crate::hal::port::mode::Input, TwiPeripheral1Scl>,
    CLOCK,
>;

#[cfg(feature = "atmega328p")]
#[macro_export]
macro_rules! twi {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::peripheral::TwiPeripheral1::<$clock>::new(
            $peripherals.TWI,
            $pins.pc4.into_pull_up_input(),
            $pins.pc5.into_pull_up_input(),
            $speed,
        )
    }};
}

#[cfg(feature = "atmega328p")]
#[macro_export]
macro_rules! twi_external_pullup {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::peripheral::TwiPeripheral1::<$clock>::with_external_pullup(
            $peripherals.TWI,
            $pins.pc4.into_floating_input(),
            $pins.pc5.into_floating_input(),
            $speed,
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_rate_matches_datasheet_reference() {
        // ATmega328P datasheet values for a 16 MHz clock
        assert_eq!(bit_rate(16_000_000, 100_000), 72);
        assert_eq!(bit_rate(16_000_000, 400_000), 12);
    }

    #[test]
    #[should_panic]
    fn bit_rate_rejects_speeds_above_bus_limit() {
        bit_rate(16_000_000, 2_000_000);
    }

    #[test]
    #[should_panic]
    fn bit_rate_rejects_speeds_below_divisor_range() {
        bit_rate(16_000_000, 10_000);
    }
}
