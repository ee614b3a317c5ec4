pub mod position;
pub mod round;
pub mod sequence;

pub use position::{Position, standard_nine};
pub use round::{Response, RoundResult};
pub use sequence::Sequence;
