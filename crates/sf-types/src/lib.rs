pub mod errors;
pub mod evaluation;
pub mod mode;

pub use errors::*;
pub use evaluation::*;
pub use mode::*;
