mod sled_medium;
pub use sled_medium::*;

#[cfg(test)]
mod sled_medium_test;
