mod mem_medium;
pub use mem_medium::*;
