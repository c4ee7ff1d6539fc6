pub mod blocks;
pub mod error;
