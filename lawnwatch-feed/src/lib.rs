pub mod sweep;

pub use sweep::{MowerStatus, SweepPlan};
