mod volatile_cache;
pub use volatile_cache::*;
