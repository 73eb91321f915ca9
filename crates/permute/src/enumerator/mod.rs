mod machine;
mod permutations;

pub use machine::*;
pub use permutations::*;
