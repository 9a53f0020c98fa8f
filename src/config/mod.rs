pub mod settings;

pub use settings::{LinkConfig, ParityConfig};
