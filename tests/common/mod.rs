#![allow(dead_code)]

use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

/// Builds a vending config whose states step by `unit` up to `top`.
///
/// Coins that would push the balance past `top` lead to `DEAD`; every price
/// has a purchase edge back to `q0` from each state that can afford it.
pub fn config_text(unit: u64, top: u64, coins: &[u64], prices: &[u64]) -> String {
    let balances: Vec<u64> = (0..=top / unit).map(|i| i * unit).collect();
    let states: Vec<String> = balances.iter().map(|b| format!("q{b}")).collect();
    let mut symbols: Vec<String> = coins.iter().map(|c| c.to_string()).collect();
    symbols.extend(prices.iter().map(|p| format!("-{p}")));

    let mut text = String::new();
    text.push_str("States:\n");
    text.push_str(&states.join(", "));
    text.push_str("\nAlphabet:\n");
    text.push_str(&symbols.join(", "));
    text.push_str("\nAccept:\nq0\nStart:\nq0\nTransitions:\n");

    for balance in &balances {
        for coin in coins {
            let next = balance + coin;
            if next <= top {
                text.push_str(&format!("q{balance} {coin} q{next}\n"));
            } else {
                text.push_str(&format!("q{balance} {coin} DEAD\n"));
            }
        }
    }
    for price in prices {
        for balance in balances.iter().filter(|b| *b >= price) {
            text.push_str(&format!("q{balance} -{price} q0\n"));
        }
    }
    text
}

pub fn generate_config(
    path: &Path,
    unit: u64,
    top: u64,
    coins: &[u64],
    prices: &[u64],
) -> Result<(), Error> {
    let mut file = File::create(path)?;
    file.write_all(config_text(unit, top, coins, prices).as_bytes())?;
    file.flush()
}

/// The machine shipped in `config/dfa_config.txt`.
pub fn standard_config() -> String {
    config_text(1000, 6000, &[1000, 2000, 3000], &[3000, 4000, 6000])
}
