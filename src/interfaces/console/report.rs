use crate::application::engine::{Purchase, PurchaseFailure, Step, StepSignal};
use crate::application::session::{HistoryEntry, Session, Summary};
use crate::domain::automaton::MachineState;
use crate::domain::balance::Amount;
use crate::domain::product::{Catalog, Product};
use std::io::{self, Write};

const RULE: &str = "============================================";

pub fn write_banner<W: Write>(out: &mut W, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "\n=== Vending Machine ===")?;
    writeln!(
        out,
        "Enter coins (positive values) or buy products (negative values):"
    )?;
    let codes: Vec<String> = catalog
        .products()
        .iter()
        .map(|p| format!("{} ({})", p.code, p.name))
        .collect();
    if !codes.is_empty() {
        writeln!(out, "To purchase: {}", codes.join(", "))?;
    }
    writeln!(out, "Type 'quit' to quit:")
}

pub fn write_available<W: Write>(out: &mut W, products: &[&Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products available at this state.");
    }
    writeln!(out, "Available Products:")?;
    for product in products {
        writeln!(out, "  - {} (price: {}): ON", product.name, product.price)?;
    }
    Ok(())
}

pub fn write_step<W: Write>(
    out: &mut W,
    from: &MachineState,
    symbol: &str,
    step: &Step,
) -> io::Result<()> {
    match step.signal {
        StepSignal::RejectedSymbol => writeln!(
            out,
            "Error: Input '{symbol}' contains symbols not in the alphabet."
        ),
        StepSignal::NoTransition => writeln!(
            out,
            "Error: No transition defined for state '{}' and input '{symbol}'.",
            from.name()
        ),
        StepSignal::Dead => {
            writeln!(out, "Transition: δ({}, {symbol}) = {}", from.name(), step.state.name())?;
            writeln!(out, "Error: Machine is in a dead state. Exiting...")
        }
        StepSignal::Moved { accepted } => {
            writeln!(out, "Transition: δ({}, {symbol}) = {}", from.name(), step.state.name())?;
            writeln!(out, "Current state: {}", step.state.name())?;
            writeln!(out, "Accepted? {accepted}")
        }
    }
}

pub fn write_purchase<W: Write>(out: &mut W, purchase: &Purchase) -> io::Result<()> {
    match purchase.failure {
        Some(PurchaseFailure::InsufficientFunds { balance, price }) => writeln!(
            out,
            "Not enough money! Current value: {balance}, Product price: {price}"
        ),
        Some(PurchaseFailure::NoTransition) => {
            writeln!(out, "Error: Transition to state is not valid in the DFA.")
        }
        None => {
            writeln!(out, "\n{RULE}")?;
            writeln!(out, "Successfully purchased {}!", purchase.product)?;
            writeln!(out, "Change: {}", purchase.change)?;
            writeln!(out, "Accepted? {}", purchase.accepted)?;
            writeln!(out, "{RULE}")
        }
    }
}

/// Renders the path the session took as a vertical arrow diagram.
pub fn write_diagram<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "        STATE TRANSITION DIAGRAM")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "\nState Transitions:")?;
    writeln!(out, "----------------")?;
    write!(out, "State: {}", session.start().name())?;

    for entry in session.history() {
        let (label, state) = match entry {
            HistoryEntry::Input { symbol, to } => (format!("Input: {symbol}"), to),
            HistoryEntry::Purchase { price, change, to, .. } => {
                (format!("Purchase: {price} (Change: {change})"), to)
            }
            HistoryEntry::FailedPurchase { price, state } => {
                (format!("Failed Purchase: {price}"), state)
            }
        };
        write!(out, "\n    |\n    | {label}\n    v\nState: {state}")?;
    }
    writeln!(out)
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "TRANSACTION SUMMARY")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Total money inserted: {}", summary.inserted)?;
    writeln!(out, "Total money spent: {}", summary.spent)?;
    writeln!(out, "Change received: {}", summary.change)?;

    if summary.products.is_empty() {
        writeln!(out, "\nNo products were purchased.")?;
    } else {
        writeln!(out, "\nProducts purchased:")?;
        for product in &summary.products {
            writeln!(out, "  - {product}")?;
        }
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Thank you for using the vending machine!")?;
    writeln!(out, "{RULE}")
}

pub fn write_unknown_product<W: Write>(out: &mut W, code: &str) -> io::Result<()> {
    writeln!(out, "Error: Product '{code}' not found.")
}

pub fn write_purchase_attempt<W: Write>(out: &mut W, code: &str, price: Amount) -> io::Result<()> {
    writeln!(out, "Purchase {code}: input {}", price.purchase_symbol())
}
