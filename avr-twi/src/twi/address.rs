/// A validated 7-bit slave address.
///
/// The raw value never exceeds [`Address::MAX`]; the read/write direction
/// bit is composed into the low bit of the on-wire byte by
/// [`as_write_byte`](Self::as_write_byte) / [`as_read_byte`](Self::as_read_byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(u8);

/// The error returned when a slave address does not fit in 7 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct InvalidAddress;

impl Address {
    pub const MAX: u8 = 0x7F;

    #[inline]
    pub const fn new(raw: u8) -> Result<Self, InvalidAddress> {
        if raw > Self::MAX {
            Err(InvalidAddress)
        } else {
            Ok(Self(raw))
        }
    }

    /// Like [`new`](Self::new) but panics on an out-of-range value, for
    /// `const` contexts.
    #[inline]
    pub const fn const_new(raw: u8) -> Self {
        if raw > Self::MAX {
            panic!("Invalid address")
        } else {
            Self(raw)
        }
    }

    /// SLA+W: the address byte with the write direction bit (0) in the LSB.
    #[inline]
    pub const fn as_write_byte(&self) -> u8 {
        self.0 << 1
    }

    /// SLA+R: the address byte with the read direction bit (1) in the LSB.
    #[inline]
    pub const fn as_read_byte(&self) -> u8 {
        (self.0 << 1) | 1
    }
}

impl core::fmt::Display for Address {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u8> for Address {
    type Error = InvalidAddress;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[allow(clippy::from_over_into)]
impl Into<u8> for Address {
    #[inline(always)]
    fn into(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_7bit_range() {
        assert_eq!(Address::new(0), Ok(Address(0)));
        assert_eq!(Address::new(0x50), Ok(Address(0x50)));
        assert_eq!(Address::new(Address::MAX), Ok(Address(0x7F)));
    }

    #[test]
    fn rejects_8bit_values() {
        assert_eq!(Address::new(0x80), Err(InvalidAddress));
        assert_eq!(Address::try_from(0xFF), Err(InvalidAddress));
    }

    #[test]
    fn direction_bit_is_lsb() {
        let addr = Address::const_new(0x50);
        assert_eq!(addr.as_write_byte(), 0xA0);
        assert_eq!(addr.as_read_byte(), 0xA1);
    }
}
