// -
// Slot encoding

/// Bytes per slot: one IEEE-754 single-precision float.
pub const SLOT_SIZE: usize = 4;

/// Slot content of a never-written (erased) cell.
pub const ERASED_PATTERN: [u8; SLOT_SIZE] = [0xFF; SLOT_SIZE];

/// Slot content of an explicitly cleared cell.
pub const CLEARED_PATTERN: [u8; SLOT_SIZE] = [0x00; SLOT_SIZE];

// -
// Sled medium namespaces

pub(crate) const MEDIUM_TREE: &str = "_medium_bytes";

// -
// Log file

pub const LOG_FILE_NAME: &str = "tiercache.log";

// -
// Simulation

/// Probability that a simulated sensor read yields nothing.
pub(crate) const SIMULATED_UNAVAILABLE_RATE: f64 = 0.02;
