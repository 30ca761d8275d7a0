pub mod normalize;

pub use normalize::{nonzero_mean, normalize};
