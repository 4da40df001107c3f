//! `roster` - character roster manager.
//!
//! Manages warriors, mages, enemies and items in a local JSON store, with
//! bulk JSON import/export per kind.

use roster::cli::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
