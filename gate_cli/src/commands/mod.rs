mod common_args;

mod check;
pub use check::*;

mod eval;
pub use eval::*;
