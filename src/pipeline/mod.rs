pub mod collector;
pub mod generator;
pub mod renderer;

pub use collector::Collector;
pub use generator::{GiftEntry, GiftGenerator};
