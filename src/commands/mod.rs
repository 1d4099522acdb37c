pub mod build;
pub mod check;
pub mod context;
mod project_root;
pub mod run;
