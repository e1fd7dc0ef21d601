pub mod artwork;
pub mod config;
pub mod consts;
pub mod display;
pub mod engine;
pub mod error;
pub mod exhibition;
pub mod museum;
pub mod normalize;
