//! Creation and extraction of the 29-bit CAN identifiers used by SAE J1939.
//!
//! ```text
//! Bits 26-28 ( 3 bits) : Priority
//! Bit  25    ( 1 bit ) : Reserved
//! Bit  24    ( 1 bit ) : Data page
//! Bits 16-23 ( 8 bits) : PDU Format (PF)
//! Bits  8-15 ( 8 bits) : PDU Specific (PS), destination when PF < 240
//! Bits  0-7  ( 8 bits) : Source address
//! ```

/// Mask selecting the 29 meaningful bits of an extended identifier.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;
/// Mask applied to a PGN before it is packed into an identifier.
pub const PGN_MASK: u32 = 0x3FFFF;
/// First PDU Format value of broadcast (PDU2) groups.
pub const PDU2_FORMAT_MIN: u8 = 240;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, PGN, destination and source.
pub struct CanId(pub u32);

impl CanId {
    /// Wrap a raw identifier, dropping everything above bit 28.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw & EXTENDED_ID_MASK)
    }

    /// Pack `priority << 26 | pgn << 8 | source`.
    ///
    /// Priority is masked to 3 bits and the PGN to 18 bits. Nothing else is
    /// validated: an out-of-range PGN is silently truncated.
    #[inline]
    pub const fn from_parts(pgn: u32, priority: u8, source_address: u8) -> Self {
        Self(((priority as u32 & 0x07) << 26) | ((pgn & PGN_MASK) << 8) | source_address as u32)
    }

    /// Creates a `CanIdBuilder` for a PGN and source address (priority 6).
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Returns the priority (3 bits, value 0-7) encoded in the CAN ID.
    #[inline]
    pub const fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// PDU Format byte (bits 16-23).
    #[inline]
    pub const fn pdu_format(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// PDU Specific byte (bits 8-15).
    #[inline]
    pub const fn pdu_specific(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Parameter Group Number, following the PDU1/PDU2 rule:
    /// - PF < 240: destination-specific, PGN = `PF << 8` (PS ignored)
    /// - PF ≥ 240: broadcast, PGN = `PF << 8 | PS`
    ///
    /// The reserved and data page bits are not part of the result.
    #[inline]
    pub const fn pgn(&self) -> u32 {
        let pf = self.pdu_format();
        if pf < PDU2_FORMAT_MIN {
            (pf as u32) << 8
        } else {
            ((pf as u32) << 8) | self.pdu_specific() as u32
        }
    }

    /// Returns the destination address (PDU1) when the PGN carries one.
    pub const fn destination(&self) -> Option<u8> {
        if self.pdu_format() < PDU2_FORMAT_MIN {
            Some(self.pdu_specific())
        } else {
            None
        }
    }

    /// Eight-bit source address of the sender.
    #[inline]
    pub const fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug, Clone, Copy)]
/// Fluent builder over [`CanId::from_parts`].
pub struct CanIdBuilder {
    pub priority: u8,
    pub pgn: u32,
    pub source_address: u8,
}

impl CanIdBuilder {
    /// Initializes the builder for a given PGN and source address.
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6, // Default priority
            pgn,
            source_address,
        }
    }

    /// Sets the priority (3 bits) to use during construction.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Builds the identifier. Never fails: fields are masked, not validated.
    pub fn build(self) -> CanId {
        CanId::from_parts(self.pgn, self.priority, self.source_address)
    }
}
