mod is_valid;
mod locate;

pub use is_valid::{InvalidReason, IsValid, Validity};
pub use locate::{locate_in_area, PointLocator};
