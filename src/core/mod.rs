pub mod assemble;
pub mod builder;
pub mod cpe;
pub mod error;
pub mod model;
pub mod types;
