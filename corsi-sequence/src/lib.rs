pub mod generator;
pub mod reference;

pub use generator::{GenerationMode, SequenceGenerator, SequenceOrigin};
pub use reference::{ReferenceError, ReferenceSet};
