pub mod policy;

pub use policy::{IsiMode, ResponseDeadline, TimingPlan, TimingPolicy, TimingStep};
