use clap::*;
use std::path::Path;

use bbh::libs::pipeline::resolve_files;
use bbh::libs::resolve::OutputMode;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("parse")
        .about("Resolve best hits from existing blast tables")
        .after_help(
            r###"
This command skips blastp and resolves bidirectional best hits from two tables
already produced with `-outfmt 6`.

* <hits1> holds the genes of <fasta1> as queries, <hits2> those of <fasta2>
* Gene lengths come from the FASTA files, the first word of each header
* Every query must be present in its FASTA file

Examples:
1. Resolve and print:
   bbh parse ecoli.faa salmonella.faa ecoli_vs_salmonella.txt salmonella_vs_ecoli.txt

2. Keep one-directional best hits too:
   bbh parse a.faa b.faa a_vs_b.txt b_vs_a.txt --partial -o out.csv

"###,
        )
        .arg(
            Arg::new("fasta1")
                .required(true)
                .index(1)
                .help("Protein FASTA of the first organism"),
        )
        .arg(
            Arg::new("fasta2")
                .required(true)
                .index(2)
                .help("Protein FASTA of the second organism"),
        )
        .arg(
            Arg::new("hits1")
                .required(true)
                .index(3)
                .help("Hits of fasta1 queries against fasta2"),
        )
        .arg(
            Arg::new("hits2")
                .required(true)
                .index(4)
                .help("Hits of fasta2 queries against fasta1"),
        )
        .arg(
            Arg::new("mincov")
                .long("mincov")
                .short('m')
                .num_args(1)
                .default_value("0.8")
                .value_parser(value_parser!(f64))
                .help("Minimum coverage to call a hit, in (0, 1]"),
        )
        .arg(
            Arg::new("partial")
                .long("partial")
                .action(ArgAction::SetTrue)
                .help("Also output best hits in one direction only (BBH = ->)"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mode = if args.get_flag("partial") {
        OutputMode::WithPartial
    } else {
        OutputMode::FullOnly
    };

    let outcome = resolve_files(
        Path::new(args.get_one::<String>("fasta1").unwrap()),
        Path::new(args.get_one::<String>("fasta2").unwrap()),
        Path::new(args.get_one::<String>("hits1").unwrap()),
        Path::new(args.get_one::<String>("hits2").unwrap()),
        *args.get_one::<f64>("mincov").unwrap(),
        mode,
    )?;

    let writer = bbh::writer(args.get_one::<String>("outfile").unwrap())?;
    bbh::libs::store::write_records(writer, &outcome.records)?;

    Ok(())
}
