mod engine;
mod query;
pub mod string;

pub use engine::PlayerEngine;
