use crate::application::engine::{Purchase, Step, StepSignal};
use crate::domain::automaton::{Automaton, MachineState};
use crate::domain::balance::{Amount, Balance};
use crate::domain::product::Catalog;
use serde::Serialize;

/// One recorded event of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A symbol that moved the automaton.
    Input { symbol: String, to: String },
    Purchase {
        price: Amount,
        change: Balance,
        product: String,
        to: String,
    },
    FailedPurchase { price: Amount, state: String },
}

/// Why a session stopped accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    Purchased,
    Quit,
    Dead,
    EndOfInput,
}

/// The mutable side of a vending run: where the machine is and how it got
/// there. Owned by whoever drives the engine.
#[derive(Debug, Clone)]
pub struct Session {
    start: MachineState,
    current: MachineState,
    history: Vec<HistoryEntry>,
    end: Option<SessionEnd>,
}

impl Session {
    pub fn new(automaton: &Automaton) -> Self {
        let start = automaton.start();
        Self {
            current: start.clone(),
            start,
            history: Vec::new(),
            end: None,
        }
    }

    pub fn start(&self) -> &MachineState {
        &self.start
    }

    pub fn current(&self) -> &MachineState {
        &self.current
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn end(&self) -> Option<SessionEnd> {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    /// Records the outcome of feeding `symbol`. Rejected symbols leave no
    /// trace; reaching the dead state ends the session.
    pub fn apply_step(&mut self, symbol: &str, step: &Step) {
        if !step.moved() {
            return;
        }
        self.history.push(HistoryEntry::Input {
            symbol: symbol.to_string(),
            to: step.state.name().to_string(),
        });
        self.current = step.state.clone();
        if step.signal == StepSignal::Dead {
            self.finish(SessionEnd::Dead);
        }
    }

    /// Records a purchase attempt. A successful purchase ends the session.
    pub fn apply_purchase(&mut self, price: Amount, purchase: &Purchase) {
        if purchase.succeeded {
            self.history.push(HistoryEntry::Purchase {
                price,
                change: purchase.change,
                product: purchase.product.clone(),
                to: purchase.state.name().to_string(),
            });
            self.current = purchase.state.clone();
            self.finish(SessionEnd::Purchased);
        } else {
            self.history.push(HistoryEntry::FailedPurchase {
                price,
                state: self.current.name().to_string(),
            });
        }
    }

    /// Marks the session as over. The first reason wins.
    pub fn finish(&mut self, end: SessionEnd) {
        self.end.get_or_insert(end);
    }

    /// Totals for the transaction report.
    ///
    /// Positive numeric input symbols count as inserted money. Negative ones,
    /// whether typed directly or issued through a purchase command, count as
    /// money spent.
    pub fn summary(&self, catalog: &Catalog) -> Summary {
        let mut inserted = Balance::ZERO;
        let mut spent = Balance::ZERO;
        let mut products = Vec::new();

        for entry in &self.history {
            match entry {
                HistoryEntry::Input { symbol, .. } => {
                    if let Some(digits) = symbol.strip_prefix('-')
                        && let Some(price) = digits.parse().ok().and_then(|v| Amount::new(v).ok())
                    {
                        spent += Balance::from(price);
                        if let Some(product) = catalog.by_price(price) {
                            products.push(product.name.clone());
                        }
                    } else if let Ok(value) = symbol.parse::<u64>() {
                        inserted += Balance::new(value);
                    }
                }
                HistoryEntry::Purchase { price, product, .. } => {
                    spent += Balance::from(*price);
                    products.push(product.clone());
                }
                HistoryEntry::FailedPurchase { .. } => {}
            }
        }

        Summary {
            start_state: self.start.name().to_string(),
            final_state: self.current.name().to_string(),
            inserted,
            spent,
            change: inserted - spent,
            products,
            end: self.end,
        }
    }
}

/// Money totals and purchases for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub start_state: String,
    pub final_state: String,
    pub inserted: Balance,
    pub spent: Balance,
    pub change: Balance,
    pub products: Vec<String>,
    pub end: Option<SessionEnd>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::VendingEngine;
    use crate::domain::automaton::DEAD_STATE;

    fn engine() -> VendingEngine {
        let automaton = Automaton::builder()
            .state("q0")
            .state("q3000")
            .state("q4000")
            .symbol("1000")
            .symbol("3000")
            .symbol("-3000")
            .accept("q0")
            .start("q0")
            .transition("q0", "3000", "q3000")
            .transition("q3000", "1000", "q4000")
            .transition("q4000", "-3000", "q0")
            .transition("q4000", "3000", DEAD_STATE)
            .build();
        VendingEngine::new(automaton, Catalog::default())
    }

    fn feed(engine: &VendingEngine, session: &mut Session, symbol: &str) {
        let step = engine.step(session.current(), symbol);
        session.apply_step(symbol, &step);
    }

    #[test]
    fn test_session_starts_at_start_state() {
        let engine = engine();
        let session = Session::new(engine.automaton());

        assert_eq!(session.current().name(), "q0");
        assert!(session.history().is_empty());
        assert!(!session.is_finished());
    }

    #[test]
    fn test_rejected_inputs_are_not_recorded() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());

        feed(&engine, &mut session, "9999");
        feed(&engine, &mut session, "1000");

        assert_eq!(session.current().name(), "q0");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_purchase_ends_session() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());
        feed(&engine, &mut session, "3000");
        feed(&engine, &mut session, "1000");

        let price = Amount::new(3000).unwrap();
        let purchase = engine.purchase(session.current(), price);
        session.apply_purchase(price, &purchase);

        assert_eq!(session.end(), Some(SessionEnd::Purchased));
        assert_eq!(session.current().name(), "q0");
        assert_eq!(
            session.history().last(),
            Some(&HistoryEntry::Purchase {
                price,
                change: Balance(1000),
                product: "Coffee".to_string(),
                to: "q0".to_string(),
            })
        );

        let summary = session.summary(engine.catalog());
        assert_eq!(summary.inserted, Balance(4000));
        assert_eq!(summary.spent, Balance(3000));
        assert_eq!(summary.change, Balance(1000));
        assert_eq!(summary.products, ["Coffee"]);
    }

    #[test]
    fn test_failed_purchase_keeps_session_open() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());
        feed(&engine, &mut session, "3000");

        let price = Amount::new(6000).unwrap();
        let purchase = engine.purchase(session.current(), price);
        session.apply_purchase(price, &purchase);

        assert!(!session.is_finished());
        assert_eq!(session.current().name(), "q3000");
        assert_eq!(
            session.history().last(),
            Some(&HistoryEntry::FailedPurchase {
                price,
                state: "q3000".to_string(),
            })
        );
        assert_eq!(session.summary(engine.catalog()).spent, Balance::ZERO);
    }

    #[test]
    fn test_dead_state_ends_session() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());
        for coin in ["3000", "1000", "3000"] {
            feed(&engine, &mut session, coin);
        }

        assert_eq!(session.end(), Some(SessionEnd::Dead));
        assert!(session.current().is_dead());
    }

    #[test]
    fn test_typed_purchase_symbol_counts_as_spent() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());
        for symbol in ["3000", "1000", "-3000"] {
            feed(&engine, &mut session, symbol);
        }
        session.finish(SessionEnd::Quit);
        session.finish(SessionEnd::EndOfInput);

        let summary = session.summary(engine.catalog());
        assert_eq!(summary.final_state, "q0");
        assert_eq!(summary.spent, Balance(3000));
        assert_eq!(summary.products, ["Coffee"]);
        assert_eq!(summary.end, Some(SessionEnd::Quit));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let engine = engine();
        let mut session = Session::new(engine.automaton());
        feed(&engine, &mut session, "3000");
        session.finish(SessionEnd::Quit);

        let json = serde_json::to_value(session.summary(engine.catalog())).unwrap();
        assert_eq!(json["inserted"], 3000);
        assert_eq!(json["final_state"], "q3000");
        assert_eq!(json["end"], "quit");
    }
}
