mod projection;
mod resolver;
mod ring;

pub use projection::Calibration;
pub use resolver::{Resolver, VotePolicy};
pub use ring::{ring, RingIter};
