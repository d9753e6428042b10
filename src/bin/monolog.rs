//! Monolog interactive interpreter

use anyhow::Result;

fn main() -> Result<()> {
    monolog::repl::run()
}
