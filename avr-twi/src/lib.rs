//! Blocking, polling-mode TWI (I2C) master driver for AVR microcontrollers.
//!
//! The transaction engine in [`twi`] is generic over the
//! [`TwiOps`](twi::TwiOps) hardware seam; the on-chip peripheral
//! implementations live behind per-MCU cargo features
//! (currently `atmega328p`).

#![no_std]

pub mod twi;

pub mod reexports {
    #[cfg(feature = "atmega328p")]
    pub mod avr_hal_generic {
        pub use avr_hal_generic::*;
    }
}

pub mod hal {
    #[cfg(feature = "atmega328p")]
    pub use atmega_hal::*;
}

#[cfg(feature = "atmega328p")]
pub use crate::hal::pins;
#[cfg(feature = "atmega328p")]
pub use crate::hal::Peripherals;
