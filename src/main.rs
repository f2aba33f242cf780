use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(message) = spiderdeck::app::run_cli() {
        eprintln!(
            "{}{}{} {}",
            "[".bold().white(),
            "ERR".bold().red(),
            "]".bold().white(),
            message.bold().white()
        );
        exit(1);
    }
}
