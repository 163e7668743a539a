//! Blocking TWI master transaction engine.
//!
//! [`TwoWireInterface`] composes the four bus primitives (start, stop,
//! write byte, read byte) into whole master transactions. Every primitive
//! issues one hardware command through [`TwiOps`] and spins on the
//! completion flag before returning, so a later command is never issued
//! before the previous one has finished. There is no timeout: a bus that
//! never completes (stuck slave, missing pull-ups) blocks the caller
//! indefinitely, and slave NACKs are not inspected. Mutual exclusion on the
//! one physical bus is the caller's obligation.

mod address;
pub mod peripheral;

pub use address::{Address, InvalidAddress};
pub use peripheral::{Direction, TwiOps, TwiPeripheral};

use heapless::Vec;

/// A blocking TWI bus master.
pub struct TwoWireInterface<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> {
    peripheral: TwiPeripheral<TWI, SDA, SCL, CLOCK>,
}

impl<TWI: TwiOps<SDA, SCL>, SDA, SCL, CLOCK> TwoWireInterface<TWI, SDA, SCL, CLOCK> {
    #[inline]
    pub fn new(peripheral: TwiPeripheral<TWI, SDA, SCL, CLOCK>) -> Self {
        Self { peripheral }
    }

    /// Gives the peripheral back.
    #[inline]
    pub fn free(self) -> TwiPeripheral<TWI, SDA, SCL, CLOCK> {
        self.peripheral
    }

    /// Issues a START condition and waits for it to be signalled.
    ///
    /// On a bus the master already owns this is a repeated START: the bus
    /// is not released in between, so no other master can interleave.
    pub fn start(&mut self) {
        self.peripheral.send_start();
        self.wait_ready();
    }

    /// Issues a STOP condition, releasing the bus to idle.
    ///
    /// Returns immediately; the hardware clears the condition on its own.
    /// Issuing a STOP on an already idle bus has no effect.
    pub fn stop(&mut self) {
        self.peripheral.send_stop();
    }

    /// Transmits one byte and waits until it has been latched out.
    pub fn write_byte(&mut self, byte: u8) {
        self.peripheral.send_write(byte);
        self.wait_ready();
    }

    /// Receives one byte, acknowledged iff `ack`, and waits for it.
    ///
    /// ACK asks the slave to keep transmitting; NACK (`false`) tells it the
    /// master is done after this byte.
    pub fn read_byte(&mut self, ack: bool) -> u8 {
        self.peripheral.send_read(ack);
        self.wait_ready();
        self.peripheral.read_data()
    }

    /// Bulk write: START, SLA+W, `buf` in order, STOP.
    ///
    /// An empty `buf` still performs the address cycle.
    pub fn write(&mut self, address: Address, buf: &[u8]) {
        self.start();
        self.send_slarw(address, Direction::Write);
        for &byte in buf {
            self.write_byte(byte);
        }
        self.stop();
    }

    /// Bulk read: START, SLA+R, fill `buf` in reception order, STOP.
    ///
    /// Every byte is ACKed except the last, which is NACKed so the slave
    /// stops after it; a single-byte read NACKs immediately. An empty `buf`
    /// still performs the address cycle.
    pub fn read(&mut self, address: Address, buf: &mut [u8]) {
        self.start();
        self.send_slarw(address, Direction::Read);
        self.read_into(buf);
        self.stop();
    }

    /// Write-then-read in one bus ownership span.
    ///
    /// Writes `tx` as in [`write`](Self::write) but without a STOP, issues
    /// a repeated START, then reads into `rx` as in [`read`](Self::read).
    /// Register-addressable slaves need the two phases joined like this so
    /// no other master can disturb the addressed-register context.
    pub fn write_read(&mut self, address: Address, tx: &[u8], rx: &mut [u8]) {
        self.start();
        self.send_slarw(address, Direction::Write);
        for &byte in tx {
            self.write_byte(byte);
        }

        // Repeated START, the bus stays ours
        self.start();
        self.send_slarw(address, Direction::Read);
        self.read_into(rx);
        self.stop();
    }

    /// Bulk read of exactly `N` bytes, returned by value.
    pub fn read_bytes<const N: usize>(&mut self, address: Address) -> Vec<u8, N> {
        let mut data = Vec::new();
        self.start();
        self.send_slarw(address, Direction::Read);
        for idx in 0..N {
            let byte = self.read_byte(idx + 1 < N);
            let _ = data.push(byte);
        }
        self.stop();
        data
    }

    fn send_slarw(&mut self, address: Address, direction: Direction) {
        let slarw = match direction {
            Direction::Write => address.as_write_byte(),
            Direction::Read => address.as_read_byte(),
        };
        self.peripheral.send_slarw(slarw);
        self.wait_ready();
    }

    fn read_into(&mut self, buf: &mut [u8]) {
        let len = buf.len();
        for (idx, slot) in buf.iter_mut().enumerate() {
            // NACK on the last byte only
            *slot = self.read_byte(idx + 1 < len);
        }
    }

    fn wait_ready(&mut self) {
        while !self.peripheral.is_ready() {}
    }
}
