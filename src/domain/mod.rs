//! Domain types: the automaton, balances and the product catalog.

pub mod automaton;
pub mod balance;
pub mod product;
