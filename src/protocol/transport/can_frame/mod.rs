//! In-memory representation of an SAE J1939 CAN frame.
use crate::protocol::transport::can_id::CanId;
use embedded_can::{ExtendedId, Id, StandardId};

/// Padding written into unused payload bytes.
pub const PAD_BYTE: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from or written to the CAN bus.
pub struct CanFrame {
    /// CAN identifier. 29 bits when `extended`, 11 bits otherwise.
    pub id: CanId,
    /// `true` for 29-bit identifiers. J1939 traffic is always extended.
    pub extended: bool,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Eight-byte extended frame, the only shape J1939 uses here.
    pub const fn new_j1939(id: CanId, data: [u8; 8]) -> Self {
        Self {
            id,
            extended: true,
            data,
            len: 8,
        }
    }

    /// Valid part of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(8)]
    }

    /// Copy any `embedded_can` frame. Short payloads are padded with `0xFF`.
    pub fn from_frame<F: embedded_can::Frame>(frame: &F) -> Self {
        let (id, extended) = match frame.id() {
            Id::Extended(id) => (CanId::new(id.as_raw()), true),
            Id::Standard(id) => (CanId(id.as_raw() as u32), false),
        };
        let mut data = [PAD_BYTE; 8];
        let payload = frame.data();
        let len = payload.len().min(8);
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id,
            extended,
            data,
            len,
        }
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let (id, extended) = match id.into() {
            Id::Extended(id) => (CanId::new(id.as_raw()), true),
            Id::Standard(id) => (CanId(id.as_raw() as u32), false),
        };
        let mut buffer = [PAD_BYTE; 8];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id,
            extended,
            data: buffer,
            len: data.len(),
        })
    }

    // J1939 never uses remote frames.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        if self.extended {
            Id::Extended(ExtendedId::new(self.id.0).unwrap_or(ExtendedId::MAX))
        } else {
            Id::Standard(StandardId::new(self.id.0 as u16).unwrap_or(StandardId::MAX))
        }
    }

    fn dlc(&self) -> usize {
        self.len.min(8)
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

//==================================================================================TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use embedded_can::Frame;

    #[test]
    fn test_new_j1939() {
        let frame = CanFrame::new_j1939(CanId(0x18FF0000), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(frame.is_extended());
        assert_eq!(frame.dlc(), 8);
        assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(frame.id(), Id::Extended(ExtendedId::new(0x18FF0000).unwrap()));
    }

    #[test]
    /// Short payloads are padded and the DLC preserved.
    fn test_embedded_can_new_pads() {
        let id = ExtendedId::new(0x18FEEE95).unwrap();
        let frame = CanFrame::new(id, &[0x10, 0x20]).unwrap();
        assert_eq!(frame.len, 2);
        assert_eq!(frame.data, [0x10, 0x20, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(CanFrame::new(id, &[0u8; 9]).is_none());
        assert!(CanFrame::new_remote(id, 8).is_none());
    }

    #[test]
    /// Standard-id frames keep their 11-bit identifier and stay non-extended.
    fn test_standard_frame() {
        let id = StandardId::new(0x123).unwrap();
        let frame = CanFrame::new(id, &[0xAA]).unwrap();
        assert!(!frame.extended);
        assert_eq!(frame.id.0, 0x123);

        let copy = CanFrame::from_frame(&frame);
        assert_eq!(copy, frame);
    }
}
