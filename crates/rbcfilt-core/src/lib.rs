pub mod consts;
pub mod error;
pub mod export;
pub mod filters;
pub mod frame;
pub mod io;
pub mod mask;
pub mod pipeline;
pub mod spectral;
