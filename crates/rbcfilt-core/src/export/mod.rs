pub mod chomp;
pub mod threshold;

pub use chomp::{ChompConfig, ChompRunner};
pub use threshold::{export_coords, threshold_coords, write_coords};
