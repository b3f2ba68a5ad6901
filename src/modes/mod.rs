pub mod train;

pub use train::{StopReason, TrainConfig, TrainMode};
