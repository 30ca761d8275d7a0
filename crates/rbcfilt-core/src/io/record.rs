use std::path::Path;

use crate::error::Result;
use crate::frame::FilteredFrame;

pub fn encode_record(frame: &FilteredFrame) -> Result<Vec<u8>> {
    Ok(postcard::to_allocvec(frame)?)
}

pub fn decode_record(bytes: &[u8]) -> Result<FilteredFrame> {
    Ok(postcard::from_bytes(bytes)?)
}

pub fn save_record(path: &Path, frame: &FilteredFrame) -> Result<()> {
    std::fs::write(path, encode_record(frame)?)?;
    Ok(())
}

pub fn load_record(path: &Path) -> Result<FilteredFrame> {
    decode_record(&std::fs::read(path)?)
}

/// Save every frame filtered with one set of modes into a single file.
pub fn save_records(path: &Path, frames: &[FilteredFrame]) -> Result<()> {
    std::fs::write(path, postcard::to_allocvec(&frames)?)?;
    Ok(())
}

pub fn load_records(path: &Path) -> Result<Vec<FilteredFrame>> {
    Ok(postcard::from_bytes(&std::fs::read(path)?)?)
}
