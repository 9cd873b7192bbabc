use crate::domain::automaton::{Automaton, MachineState};
use crate::domain::balance::{Amount, Balance};
use crate::domain::product::{Catalog, Product};

/// What happened to a single input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    /// The automaton moved; `accepted` tells whether the new state is an
    /// accept state.
    Moved { accepted: bool },
    /// The symbol is not part of the alphabet.
    RejectedSymbol,
    /// The alphabet knows the symbol but the current state has no edge for it.
    NoTransition,
    /// The automaton moved into the dead state. The session must end.
    Dead,
}

/// Result of [`VendingEngine::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: MachineState,
    pub signal: StepSignal,
}

impl Step {
    pub fn moved(&self) -> bool {
        matches!(self.signal, StepSignal::Moved { .. } | StepSignal::Dead)
    }
}

/// Why a purchase did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseFailure {
    InsufficientFunds { balance: Balance, price: Amount },
    NoTransition,
}

/// Result of [`VendingEngine::purchase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub state: MachineState,
    pub change: Balance,
    pub succeeded: bool,
    /// Display name of the product bought at this price, or `Unknown`.
    pub product: String,
    pub accepted: bool,
    pub failure: Option<PurchaseFailure>,
}

impl Purchase {
    fn failed(state: MachineState, product: String, failure: PurchaseFailure) -> Self {
        Self {
            state,
            change: Balance::ZERO,
            succeeded: false,
            product,
            accepted: false,
            failure: Some(failure),
        }
    }
}

/// Stateless DFA engine over an immutable automaton and product catalog.
///
/// Callers own the current state and pass it in; the engine never mutates
/// anything, so one engine can serve several sessions at once.
#[derive(Debug, Clone)]
pub struct VendingEngine {
    automaton: Automaton,
    catalog: Catalog,
}

impl VendingEngine {
    /// Creates a new `VendingEngine`.
    ///
    /// # Arguments
    ///
    /// * `automaton` - The transition table to run.
    /// * `catalog` - The products used for purchase labels and availability.
    pub fn new(automaton: Automaton, catalog: Catalog) -> Self {
        Self { automaton, catalog }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Feeds one input symbol to the automaton.
    pub fn step(&self, state: &MachineState, symbol: &str) -> Step {
        if !self.automaton.in_alphabet(symbol) {
            tracing::debug!(state = %state.name(), symbol, "symbol not in alphabet");
            return Step {
                state: state.clone(),
                signal: StepSignal::RejectedSymbol,
            };
        }

        let Some(target) = self.automaton.transition(state.name(), symbol) else {
            tracing::debug!(state = %state.name(), symbol, "no transition defined");
            return Step {
                state: state.clone(),
                signal: StepSignal::NoTransition,
            };
        };

        let next = self.automaton.machine_state(target);
        tracing::debug!(from = %state.name(), symbol, to = %next.name(), "transition");
        let signal = if next.is_dead() {
            StepSignal::Dead
        } else {
            StepSignal::Moved {
                accepted: self.automaton.is_accepting(next.name()),
            }
        };
        Step {
            state: next,
            signal,
        }
    }

    /// Buys something at `price` from `state`.
    ///
    /// The post-purchase state comes from the configured transition for the
    /// `-<price>` symbol, not from the computed change.
    pub fn purchase(&self, state: &MachineState, price: Amount) -> Purchase {
        let product = self.catalog.name_for(price).to_string();
        let balance = state.balance();

        if !balance.covers(price) {
            tracing::debug!(state = %state.name(), %balance, %price, "insufficient funds");
            return Purchase::failed(
                state.clone(),
                product,
                PurchaseFailure::InsufficientFunds { balance, price },
            );
        }

        let symbol = price.purchase_symbol();
        let Some(target) = self.automaton.transition(state.name(), &symbol) else {
            tracing::debug!(state = %state.name(), %symbol, "no purchase transition");
            return Purchase::failed(state.clone(), product, PurchaseFailure::NoTransition);
        };

        let change = balance - Balance::from(price);
        let next = self.automaton.machine_state(target);
        tracing::debug!(from = %state.name(), to = %next.name(), %change, product = %product, "purchase");
        Purchase {
            accepted: self.automaton.is_accepting(next.name()),
            state: next,
            change,
            succeeded: true,
            product,
            failure: None,
        }
    }

    /// Products from the engine's catalog affordable at `state`.
    pub fn available_products(&self, state: &MachineState) -> Vec<&Product> {
        available_products(state.name(), self.catalog.products())
    }
}

/// Products whose `state_key` threshold is covered by the balance encoded in
/// `state`, in catalog order.
pub fn available_products<'a>(state: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let balance = Balance::decode(state);
    products
        .iter()
        .filter(|product| balance >= product.threshold())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::automaton::DEAD_STATE;

    fn engine() -> VendingEngine {
        let automaton = Automaton::builder()
            .state("q0")
            .state("q3000")
            .state("q4000")
            .state("q6000")
            .symbol("1000")
            .symbol("3000")
            .symbol("-3000")
            .symbol("-4000")
            .accept("q0")
            .start("q0")
            .transition("q0", "3000", "q3000")
            .transition("q3000", "1000", "q4000")
            .transition("q3000", "3000", "q6000")
            .transition("q6000", "3000", DEAD_STATE)
            .transition("q3000", "-3000", "q0")
            .transition("q4000", "-3000", "q1000")
            .transition("q6000", "-3000", "q0")
            .build();
        VendingEngine::new(automaton, Catalog::default())
    }

    fn price(value: u64) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_step_follows_transition() {
        let engine = engine();
        let step = engine.step(&engine.automaton().start(), "3000");

        assert_eq!(step.state, MachineState::new("q3000"));
        assert_eq!(step.signal, StepSignal::Moved { accepted: false });
        assert!(step.moved());
    }

    #[test]
    fn test_step_reports_accept_state() {
        let automaton = Automaton::builder()
            .state("q0")
            .symbol("0")
            .accept("q0")
            .start("q0")
            .transition("q0", "0", "q0")
            .build();
        let engine = VendingEngine::new(automaton, Catalog::default());

        let step = engine.step(&MachineState::new("q0"), "0");
        assert_eq!(step.signal, StepSignal::Moved { accepted: true });
    }

    #[test]
    fn test_step_rejects_unknown_symbol() {
        let engine = engine();
        let state = MachineState::new("q3000");
        let step = engine.step(&state, "9999");

        assert_eq!(step.state, state);
        assert_eq!(step.signal, StepSignal::RejectedSymbol);
        assert!(!step.moved());
    }

    #[test]
    fn test_step_without_transition() {
        let engine = engine();
        let state = MachineState::new("q0");
        let step = engine.step(&state, "1000");

        assert_eq!(step.state, state);
        assert_eq!(step.signal, StepSignal::NoTransition);
    }

    #[test]
    fn test_step_into_dead_state() {
        let engine = engine();
        let step = engine.step(&MachineState::new("q6000"), "3000");

        assert_eq!(step.signal, StepSignal::Dead);
        assert!(step.state.is_dead());
    }

    #[test]
    fn test_purchase_exact_amount() {
        let engine = engine();
        let purchase = engine.purchase(&MachineState::new("q3000"), price(3000));

        assert!(purchase.succeeded);
        assert_eq!(purchase.change, Balance::ZERO);
        assert_eq!(purchase.state, MachineState::new("q0"));
        assert_eq!(purchase.product, "Coffee");
        assert!(purchase.accepted);
        assert_eq!(purchase.failure, None);
    }

    #[test]
    fn test_purchase_with_change_uses_configured_target() {
        let engine = engine();
        let purchase = engine.purchase(&MachineState::new("q4000"), price(3000));

        assert!(purchase.succeeded);
        assert_eq!(purchase.change, Balance(1000));
        // The config decides where the machine goes, not the arithmetic.
        assert_eq!(purchase.state.name(), "q1000");
        assert!(!purchase.accepted);
    }

    #[test]
    fn test_purchase_insufficient_funds() {
        let engine = engine();
        let state = MachineState::new("q3000");
        let purchase = engine.purchase(&state, price(4000));

        assert!(!purchase.succeeded);
        assert_eq!(purchase.state, state);
        assert_eq!(purchase.change, Balance::ZERO);
        assert_eq!(purchase.product, "Tea");
        assert_eq!(
            purchase.failure,
            Some(PurchaseFailure::InsufficientFunds {
                balance: Balance(3000),
                price: price(4000),
            })
        );
    }

    #[test]
    fn test_purchase_without_configured_transition() {
        let engine = engine();
        let state = MachineState::new("q6000");
        let purchase = engine.purchase(&state, price(4000));

        assert!(!purchase.succeeded);
        assert_eq!(purchase.state, state);
        assert_eq!(purchase.change, Balance::ZERO);
        assert_eq!(purchase.failure, Some(PurchaseFailure::NoTransition));
    }

    #[test]
    fn test_purchase_unknown_product_label() {
        let automaton = Automaton::builder()
            .state("q5000")
            .transition("q5000", "-2500", "q0")
            .build();
        let engine = VendingEngine::new(automaton, Catalog::default());
        let purchase = engine.purchase(&MachineState::new("q5000"), price(2500));

        assert!(purchase.succeeded);
        assert_eq!(purchase.product, "Unknown");
        assert_eq!(purchase.change, Balance(2500));
    }

    #[test]
    fn test_available_products() {
        let catalog = Catalog::default();
        let names = |state: &str| -> Vec<String> {
            available_products(state, catalog.products())
                .into_iter()
                .map(|p| p.name.clone())
                .collect()
        };

        assert!(names("q0").is_empty());
        assert_eq!(names("q3000"), ["Coffee"]);
        assert_eq!(names("q4500"), ["Coffee", "Tea"]);
        assert_eq!(names("q6000"), ["Coffee", "Tea", "Hot Chocolate"]);
        assert_eq!(names("q6000"), names("q6000"));
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = engine();
        std::thread::scope(|scope| {
            for coin in ["3000", "9999"] {
                let engine = &engine;
                scope.spawn(move || {
                    let step = engine.step(&engine.automaton().start(), coin);
                    assert_eq!(step.moved(), coin == "3000");
                });
            }
        });
    }
}
