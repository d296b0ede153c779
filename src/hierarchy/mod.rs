mod controller;
mod layout;
pub use controller::*;
pub use layout::*;
