use clap::*;
use std::path::{Path, PathBuf};

use bbh::libs::pipeline::{get_bbh, BbhConfig};
use bbh::libs::resolve::OutputMode;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("run")
        .about("Bidirectional best BLAST hits of two protein sets")
        .after_help(
            r###"
This command runs blastp in both directions and keeps the pairs of genes that are
each other's best hit.

Process:
1. Check both FASTA files and their BLAST db files (.phr, .pin, .psq)
2. blastp <db2> against db1 and <db1> against db2, unless the tables exist
3. Drop hits with alignment length / query length below --mincov
4. For each gene, take the hit with the highest percent identity (first one on ties)
5. Keep the gene when the subject's best hit points back to it

Notes:
* Build the databases beforehand: makeblastdb -in ecoli.faa -dbtype prot
* An existing <db1>_vs_<db2>_parsed.csv is reused unless --force
* Intermediate tables are named <query>_vs_<db>.txt
* With --no-save the result goes to stdout and the tables are removed

Examples:
1. Default parameters:
   bbh run ecoli.faa salmonella.faa -o bbh

2. Stricter coverage, 8 threads:
   bbh run ecoli.faa salmonella.faa -m 0.9 -p 8

3. Also report one-directional best hits:
   bbh run ecoli.faa salmonella.faa --partial --outname partial.csv

"###,
        )
        .arg(
            Arg::new("db1")
                .required(true)
                .index(1)
                .help("Protein FASTA of the first organism, with a BLAST db"),
        )
        .arg(
            Arg::new("db2")
                .required(true)
                .index(2)
                .help("Protein FASTA of the second organism, with a BLAST db"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('o')
                .num_args(1)
                .default_value("bbh")
                .help("Output directory, created if absent"),
        )
        .arg(
            Arg::new("outname")
                .long("outname")
                .num_args(1)
                .help("Name of the result file. Default <db1>_vs_<db2>_parsed.csv"),
        )
        .arg(
            Arg::new("indir")
                .long("indir")
                .num_args(1)
                .help("Directory that relative db paths are resolved against"),
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
            Arg::new("evalue")
                .long("evalue")
                .short('e')
                .num_args(1)
                .default_value("0.001")
                .value_parser(value_parser!(f64))
                .help("E-value threshold for BLAST hits"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for blastp"),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Overwrite existing tables and results"),
        )
        .arg(
            Arg::new("no_save")
                .long("no-save")
                .action(ArgAction::SetTrue)
                .help("Write the result to stdout and remove the blast tables"),
        )
        .arg(
            Arg::new("partial")
                .long("partial")
                .action(ArgAction::SetTrue)
                .help("Also output best hits in one direction only (BBH = ->)"),
        )
        .arg(
            Arg::new("blastp")
                .long("blastp")
                .num_args(1)
                .default_value("blastp")
                .help("blastp executable"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let db1 = args.get_one::<String>("db1").unwrap();
    let db2 = args.get_one::<String>("db2").unwrap();

    let config = BbhConfig {
        indir: args.get_one::<String>("indir").map(PathBuf::from),
        outdir: PathBuf::from(args.get_one::<String>("outdir").unwrap()),
        outname: args.get_one::<String>("outname").cloned(),
        min_coverage: *args.get_one::<f64>("mincov").unwrap(),
        evalue: *args.get_one::<f64>("evalue").unwrap(),
        threads: *args.get_one::<usize>("threads").unwrap(),
        force: args.get_flag("force"),
        save_files: !args.get_flag("no_save"),
        output_mode: if args.get_flag("partial") {
            OutputMode::WithPartial
        } else {
            OutputMode::FullOnly
        },
        blastp: args.get_one::<String>("blastp").unwrap().to_string(),
    };

    //----------------------------
    // Operating
    //----------------------------
    let runner = config.runner();
    let outcome = get_bbh(Path::new(db1), Path::new(db2), &config, &runner)?;

    if !config.save_files {
        let writer = bbh::writer("stdout")?;
        bbh::libs::store::write_records(writer, &outcome.records)?;
    }

    Ok(())
}
