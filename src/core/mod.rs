pub mod engine;
pub mod index;
pub mod normalize;
pub mod suggest;
pub mod types;
