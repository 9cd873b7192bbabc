use crate::application::engine::{StepSignal, VendingEngine};
use crate::application::session::{Session, SessionEnd};
use crate::interfaces::console::report;
use crate::interfaces::lossy_lines;
use std::io::{self, BufRead, Write};

/// Word that ends a session, matched case-insensitively.
pub const QUIT_COMMAND: &str = "quit";

/// Drives one vending session from line-based input.
///
/// Each non-empty line is either `quit`, a purchase command (leading `P`,
/// resolved through the catalog) or an input symbol. The loop stops on quit,
/// a successful purchase, the dead state, or end of input, and hands the
/// finished session back for reporting.
pub fn run<R: BufRead, W: Write>(
    engine: &VendingEngine,
    input: R,
    out: &mut W,
) -> io::Result<Session> {
    let mut session = Session::new(engine.automaton());

    report::write_banner(out, engine.catalog())?;
    report::write_available(out, &engine.available_products(session.current()))?;

    for line in lossy_lines(input) {
        let line = line?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        if command.eq_ignore_ascii_case(QUIT_COMMAND) {
            writeln!(out, "Processing input stream and exiting...")?;
            session.finish(SessionEnd::Quit);
            break;
        }

        if command.starts_with('P') {
            let Some(product) = engine.catalog().by_code(command) else {
                report::write_unknown_product(out, command)?;
                continue;
            };
            let price = product.price;
            report::write_purchase_attempt(out, command, price)?;
            let purchase = engine.purchase(session.current(), price);
            report::write_purchase(out, &purchase)?;
            session.apply_purchase(price, &purchase);
            if session.is_finished() {
                writeln!(
                    out,
                    "\nPurchase completed! Processing transaction history and exiting..."
                )?;
                break;
            }
            continue;
        }

        let from = session.current().clone();
        let step = engine.step(&from, command);
        report::write_step(out, &from, command, &step)?;
        session.apply_step(command, &step);
        match step.signal {
            StepSignal::Dead => break,
            StepSignal::Moved { .. } => {
                report::write_available(out, &engine.available_products(session.current()))?
            }
            StepSignal::RejectedSymbol | StepSignal::NoTransition => {}
        }
    }

    session.finish(SessionEnd::EndOfInput);
    Ok(session)
}
