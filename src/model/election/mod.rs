//! The election record and its lifecycle arithmetic.

pub use record::ElectionRecord;
pub use status::{Countdown, LifecycleStage, StatusReport};

mod record;
mod status;
