extern crate clap;
use clap::*;

mod cmd_bbh;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let app = Command::new("bbh")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`bbh` - Bidirectional best BLAST hits")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_bbh::run::make_subcommand())
        .subcommand(cmd_bbh::parse::make_subcommand())
        .subcommand(cmd_bbh::size::make_subcommand())
        .subcommand(cmd_bbh::compare::make_subcommand())
        .after_help(
            r###"Subcommands:

* Pipeline:
    * run     - blastp both ways, then resolve best hits
* Tables:
    * parse   - resolve existing outfmt 6 tables
    * size    - gene lengths of protein FASTA files
    * compare - compare two parsed results

Set RUST_LOG=debug to see skipped genes.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("run", sub_matches)) => cmd_bbh::run::execute(sub_matches),
        Some(("parse", sub_matches)) => cmd_bbh::parse::execute(sub_matches),
        Some(("size", sub_matches)) => cmd_bbh::size::execute(sub_matches),
        Some(("compare", sub_matches)) => cmd_bbh::compare::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
