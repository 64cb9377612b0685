use clap::*;
use std::path::Path;

use bbh::libs::compare::{compare, Comparison};
use bbh::libs::store::read_records;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("compare")
        .about("Compare two parsed results")
        .after_help(
            r###"
Compares the (gene, subject) pairs of two *_parsed.csv files.

* Same    - identical pairs
* Swapped - identical once gene and subject are exchanged, e.g. a_vs_b against b_vs_a
* Otherwise the differing pairs are listed and the exit code is non-zero

Examples:
   bbh compare bbh/a_vs_b_parsed.csv bbh/b_vs_a_parsed.csv

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(2)
                .index(1)
                .help("Two result files"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infiles: Vec<_> = args.get_many::<String>("infiles").unwrap().collect();
    let left = read_records(Path::new(infiles[0]))?;
    let right = read_records(Path::new(infiles[1]))?;

    match compare(&left, &right) {
        Comparison::Same => println!("The two outputs are the same."),
        Comparison::Swapped => {
            println!("The two outputs are the same, but the genes and subject are switched.")
        }
        Comparison::Different {
            only_left,
            only_right,
        } => {
            for (g, s) in &only_left {
                println!("<\t{}\t{}", g, s);
            }
            for (g, s) in &only_right {
                println!(">\t{}\t{}", g, s);
            }
            anyhow::bail!(
                "The two outputs are not the same: {} and {} unique pairs",
                only_left.len(),
                only_right.len()
            );
        }
    }

    Ok(())
}
