mod util;
mod normalize;

pub use util::*;
pub use normalize::*;
