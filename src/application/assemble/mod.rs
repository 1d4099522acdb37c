//! Assemble Module
//!
//! Runtime assembler: composes `<output>/image` from the staged package set
//! and the project source tree.

mod options;
mod result;
mod use_case;

pub use options::{AssembleOptions, EnvOptions, IMAGE_DIR};
pub use result::AssembleResult;
pub use use_case::AssembleUseCase;
