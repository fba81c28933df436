pub mod upstream;
#[cfg(test)]
pub mod canned;

pub use upstream::*;
