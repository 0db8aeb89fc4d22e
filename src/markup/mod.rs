pub mod sanitize;
pub mod tree;

pub use sanitize::sanitize;
