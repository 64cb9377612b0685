use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_parse() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("bbh")?;
    let output = cmd
        .arg("parse")
        .arg("tests/bbh/a.fa")
        .arg("tests/bbh/b.fa")
        .arg("tests/bbh/a_vs_b.tsv")
        .arg("tests/bbh/b_vs_a.tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.starts_with(",gene,subject,PID,alnLength,"));
    assert!(stdout.contains("\n0,a1,b1,98.5,100,2,0,1,100,1,100,1e-60,201.0,100,1.0,<=>\n"));
    assert!(stdout.contains("\n2,a2,b2,92.0,78,"));
    // a3 -> b3, but b3 -> a2
    assert!(!stdout.contains(",a3,"));
    // a4 fails coverage, the reverse hits of b4 all fail coverage
    assert!(!stdout.contains(",a4,"));
    assert!(!stdout.contains(",a5,"));

    Ok(())
}

#[test]
fn command_parse_partial() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("bbh")?;
    let output = cmd
        .arg("parse")
        .arg("tests/bbh/a.fa")
        .arg("tests/bbh/b.fa")
        .arg("tests/bbh/a_vs_b.tsv")
        .arg("tests/bbh/b_vs_a.tsv")
        .arg("--partial")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let genes: Vec<&str> = stdout
        .lines()
        .skip(1)
        .map(|l| l.split(',').nth(1).unwrap())
        .collect();

    assert_eq!(genes, vec!["a1", "a2", "a3"]);
    // the first of the two 88.0 hits is kept
    assert!(stdout.contains("\n3,a3,b3,88.0,110,"));
    assert!(stdout.trim_end().ends_with(",->"));

    Ok(())
}

#[test]
fn command_parse_mincov() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("bbh")?;
    let output = cmd
        .arg("parse")
        .arg("tests/bbh/a.fa")
        .arg("tests/bbh/b.fa")
        .arg("tests/bbh/a_vs_b.tsv")
        .arg("tests/bbh/b_vs_a.tsv")
        .arg("-m")
        .arg("0.3")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("\n5,a4,b4,75.0,30,"));
    assert!(!stdout.contains(",a5,"));

    Ok(())
}

#[test]
fn command_parse_invalid_mincov() -> anyhow::Result<()> {
    for c in ["0", "1.5"] {
        let mut cmd = Command::cargo_bin("bbh")?;
        cmd.arg("parse")
            .arg("tests/bbh/a.fa")
            .arg("tests/bbh/b.fa")
            .arg("tests/bbh/a_vs_b.tsv")
            .arg("tests/bbh/b_vs_a.tsv")
            .arg("--mincov")
            .arg(c)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid parameter"));
    }

    Ok(())
}

#[test]
fn command_parse_missing_length() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let fasta = temp.path().join("a.fa");
    std::fs::write(&fasta, ">a1\nMKV\n>a2\nMKV\n")?;

    let mut cmd = Command::cargo_bin("bbh")?;
    cmd.arg("parse")
        .arg(&fasta)
        .arg("tests/bbh/b.fa")
        .arg("tests/bbh/a_vs_b.tsv")
        .arg("tests/bbh/b_vs_a.tsv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no length for query `a3`"));

    Ok(())
}

#[test]
fn command_parse_malformed_table() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let hits = temp.path().join("broken.tsv");
    std::fs::write(&hits, "a1\tb1\t98.5\n")?;

    let mut cmd = Command::cargo_bin("bbh")?;
    cmd.arg("parse")
        .arg("tests/bbh/a.fa")
        .arg("tests/bbh/b.fa")
        .arg(&hits)
        .arg("tests/bbh/b_vs_a.tsv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed hit"));

    Ok(())
}
