pub mod codec;
pub mod resolver;
pub mod types;

pub use resolver::ColorResolver;
pub use types::{Channel, CustomColor, OverrideOutcome, Rgba};
