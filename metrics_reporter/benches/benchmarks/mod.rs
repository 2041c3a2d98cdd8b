pub mod recording;
pub mod vending;
