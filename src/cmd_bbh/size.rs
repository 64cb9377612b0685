use clap::*;

use bbh::libs::length::GeneLengthIndex;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("size")
        .about("Gene lengths of protein FASTA file(s)")
        .after_help(
            r###"
This command prints the gene length index used for coverage: the first word of each
header and its number of residues, tab-separated.

Notes:
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'
* Duplicated names within one file are an error

Examples:
1. One file:
   bbh size ecoli.faa

2. Save the output to a file:
   bbh size ecoli.faa salmonella.faa -o lengths.tsv

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input FASTA file(s) to process"),
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
    let mut writer = bbh::writer(args.get_one::<String>("outfile").unwrap())?;

    for infile in args.get_many::<String>("infiles").unwrap() {
        let reader = bbh::reader(infile)?;
        let index = GeneLengthIndex::from_reader(infile, reader)?;

        for (name, len) in index.iter() {
            writer.write_fmt(format_args!("{}\t{}\n", name, len))?;
        }
    }

    Ok(())
}
