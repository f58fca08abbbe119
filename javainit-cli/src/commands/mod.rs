//! One module per verb. Each maps a supervisor result to an exit code and
//! writes any failure text to stderr.

pub mod start;
pub mod status;
pub mod stop;
