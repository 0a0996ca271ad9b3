pub mod clean;
mod command_result;
pub mod generate;

pub use command_result::*;
