//! Tree-walking interpreter for checked files.
//!
//! Every active call owns one flat frame of slots, sized by the number of
//! parameters and locals its function declares. `return` travels back to
//! its call as a [`Flow::Returning`] value rather than an unwinding panic.

pub mod config;
pub mod interpreter;
pub mod value;
