//! Domain Layer
//!
//! Pure build logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Lock descriptor, installed package set, image manifest
//! - `value_objects/` - Hashes, package names, module paths, ignore patterns
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod value_objects;
