use crate::constants::{CLEARED_PATTERN, ERASED_PATTERN, SLOT_SIZE};

/// Decoded content of one physical slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotState {
    /// All-0xFF: never written since the medium was erased
    Erased,
    /// All-zero
    Cleared,
    Value(f32),
}

impl SlotState {
    /// Decodes a raw slot. Returns `None` when `raw` is not exactly one slot long.
    pub fn decode(raw: &[u8]) -> Option<SlotState> {
        let bytes: [u8; SLOT_SIZE] = raw.try_into().ok()?;
        Some(if bytes == ERASED_PATTERN {
            SlotState::Erased
        } else if bytes == CLEARED_PATTERN {
            SlotState::Cleared
        } else {
            SlotState::Value(f32::from_le_bytes(bytes))
        })
    }

    pub fn value(self) -> Option<f64> {
        match self {
            SlotState::Value(v) => Some(v as f64),
            SlotState::Erased | SlotState::Cleared => None,
        }
    }
}

/// Encodes a reading as a little-endian IEEE-754 single.
pub fn encode_slot(value: f64) -> [u8; SLOT_SIZE] {
    (value as f32).to_le_bytes()
}
