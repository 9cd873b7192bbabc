//! Application layer: the stateless DFA engine and the caller-owned session
//! that threads state and history through it.

pub mod engine;
pub mod session;
