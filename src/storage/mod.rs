mod adaptors;
mod durable_store;
mod medium;
mod slot;


pub use adaptors::*;
pub use durable_store::*;
pub use medium::*;
pub use slot::*;
