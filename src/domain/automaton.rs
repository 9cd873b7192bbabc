use crate::domain::balance::Balance;
use serde::Serialize;
use std::collections::HashMap;

/// Target state that ends the session when reached.
pub const DEAD_STATE: &str = "DEAD";

/// A state identifier paired with the balance it encodes.
///
/// Only built from a name, so the balance always matches the digits in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineState {
    name: String,
    balance: Balance,
}

impl MachineState {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let balance = Balance::decode(&name);
        Self { name, balance }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn is_dead(&self) -> bool {
        self.name == DEAD_STATE
    }
}

/// An immutable deterministic finite automaton.
///
/// Sequence-valued fields keep their declaration order. The transition table
/// is partial: a missing `(state, symbol)` entry means no transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Automaton {
    states: Vec<String>,
    alphabet: Vec<String>,
    accept_states: Vec<String>,
    start_state: String,
    transitions: HashMap<String, HashMap<String, String>>,
    balances: HashMap<String, Balance>,
}

impl Automaton {
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn accept_states(&self) -> &[String] {
        &self.accept_states
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    pub fn transitions(&self) -> &HashMap<String, HashMap<String, String>> {
        &self.transitions
    }

    pub fn in_alphabet(&self, symbol: &str) -> bool {
        self.alphabet.iter().any(|s| s == symbol)
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.iter().any(|s| s == state)
    }

    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(String::as_str)
    }

    /// Resolves a state name to its `(name, balance)` pair.
    ///
    /// Names known to the automaton use the table built at load time; any
    /// other name is decoded on the fly.
    pub fn machine_state(&self, name: &str) -> MachineState {
        match self.balances.get(name) {
            Some(balance) => MachineState {
                name: name.to_string(),
                balance: *balance,
            },
            None => MachineState::new(name),
        }
    }

    pub fn start(&self) -> MachineState {
        self.machine_state(&self.start_state)
    }
}

/// Accumulates declarations in the order they are read.
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    inner: Automaton,
}

impl AutomatonBuilder {
    pub fn state(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.inner.transitions.entry(name.clone()).or_default();
        self.inner.states.push(name);
        self
    }

    pub fn symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.inner.alphabet.push(symbol.into());
        self
    }

    pub fn accept(&mut self, name: impl Into<String>) -> &mut Self {
        self.inner.accept_states.push(name.into());
        self
    }

    pub fn start(&mut self, name: impl Into<String>) -> &mut Self {
        self.inner.start_state = name.into();
        self
    }

    /// Adds `from --symbol--> to`, creating the row for `from` if it was
    /// never declared. A repeated `(from, symbol)` pair overwrites.
    pub fn transition(
        &mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) -> &mut Self {
        self.inner
            .transitions
            .entry(from.into())
            .or_default()
            .insert(symbol.into(), to.into());
        self
    }

    pub fn build(&mut self) -> Automaton {
        let mut automaton = std::mem::take(&mut self.inner);

        let mut balances = HashMap::new();
        let names = automaton
            .states
            .iter()
            .chain(std::iter::once(&automaton.start_state))
            .chain(automaton.transitions.iter().flat_map(|(from, row)| {
                std::iter::once(from).chain(row.values())
            }));
        for name in names {
            balances
                .entry(name.clone())
                .or_insert_with(|| Balance::decode(name));
        }
        automaton.balances = balances;
        automaton
    }
}
