//! Theme loading and the query surface over the loaded theme.

mod clock;
mod engine;
mod settings;

pub use clock::{Clock, SystemClock};
pub use engine::{LoadOutcome, ThemeEngine};
pub use settings::EngineSettings;
