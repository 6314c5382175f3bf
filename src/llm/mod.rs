pub mod batcher;
pub mod client;
pub mod estimator;
pub mod parser;
pub mod prompts;
pub mod types;

pub use batcher::*;
pub use client::*;
pub use estimator::*;
pub use parser::*;
pub use prompts::*;
pub use types::*;
