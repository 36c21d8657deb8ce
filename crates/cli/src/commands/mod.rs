//! Subcommand implementations.

pub mod catalog;
pub mod products;

use serde::Serialize;

/// Print a command result to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
