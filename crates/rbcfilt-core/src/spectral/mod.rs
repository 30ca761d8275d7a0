pub mod filter;
pub mod sweep;
pub mod transform;

pub use filter::{filter_spectrum, FilterSpec, FrequencyFilter, Metric, Traversal};
pub use sweep::{band_schedule, radius_schedule};
pub use transform::{center_index, fftshift, forward, ifftshift, inverse, log_power, Spectrum};
