//! Console presentation of hook progress and results.

use gitpassport_core::hook::{Outcome, Reporter};
use gitpassport_core::models::CandidatePool;
use gitpassport_core::resolver::PoolOrigin;

use crate::style;

/// Prints the candidate listing to standard output.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn candidates(&mut self, origin: &PoolOrigin, remote: &str, pool: &CandidatePool, table: &str) {
        println!();
        println!("{}", style::header("~Intermission~"));
        match origin {
            PoolOrigin::RemoteMatch { .. } => {
                println!("  One or more passports match your current git provider.");
                println!("{}", style::field("Remote", remote));
            }
            PoolOrigin::NoMatch { .. } => {
                println!("  Zero passports matching, listing all passports.");
                println!("{}", style::field("Remote", remote));
            }
            PoolOrigin::NoRemote => {
                println!("  {}, listing all passports.", remote);
            }
        }
        println!();
        println!("{}", table);
        if pool.is_empty() {
            println!(
                "{}",
                style::warn("No passports configured and no global identity set. Enter q to quit.")
            );
        }
        println!();
    }
}

/// Print the closing message for `outcome`.
pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Disabled => {}
        Outcome::AlreadyProvisioned { active, remote } => {
            println!();
            println!("{}", style::header("~Active Passport~"));
            println!("{}", style::field("User", &active.name));
            println!("{}", style::field("Mail", &active.email));
            println!("{}", style::field("Remote", remote));
            println!();
        }
        Outcome::Persisted { key, identity } => {
            println!();
            println!(
                "{}",
                style::success(&format!("Passport [{}] set: {}", key, identity))
            );
            println!("{}", style::dim("~Done~"));
            println!();
        }
        Outcome::Quit => {
            eprintln!();
            eprintln!("{}", style::dim("~Quitting~"));
        }
    }
}
