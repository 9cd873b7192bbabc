//! Interactive front-end: the read loop and the text reports it prints.

pub mod repl;
pub mod report;
