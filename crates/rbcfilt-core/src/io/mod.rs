pub mod loader;
pub mod naming;
pub mod npy;
pub mod record;
pub mod text;

pub use loader::{
    discover_frames, load_boundary, load_frame, load_matrix, split_concatenated, split_to_dir,
};
pub use record::{load_record, load_records, save_record, save_records};
