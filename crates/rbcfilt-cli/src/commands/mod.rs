pub mod config;
pub mod export;
pub mod filter;
pub mod info;
pub mod split;
