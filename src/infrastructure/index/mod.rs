//! Package Index Implementations

mod local;

pub use local::LocalPackageIndex;
