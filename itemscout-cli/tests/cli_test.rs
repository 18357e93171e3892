use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

const SAMPLE_HEAD: &str = "6,C\n5,W\n5,C,W\n";

// Runs the binary inside an empty directory so no local config is picked up
fn itemscout(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("itemscout-cli")?;
    cmd.current_dir(dir.path());
    Ok(cmd)
}

fn stdout_of(cmd: &mut Command) -> Result<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(String::from_utf8(output)?)
}

#[test]
fn test_example_dataset() -> Result<()> {
    let dir = tempdir()?;
    let stdout = stdout_of(itemscout(&dir)?.arg("--example"))?;

    assert!(stdout.starts_with(SAMPLE_HEAD));
    assert!(stdout.contains("\n3,A,C,T,W\n"));
    assert!(!stdout.contains(",D,T\n"));
    assert_eq!(stdout.lines().count(), 19);
    Ok(())
}

#[test]
fn test_example_is_default_input() -> Result<()> {
    let dir = tempdir()?;
    let explicit = stdout_of(itemscout(&dir)?.arg("--example"))?;
    let short = stdout_of(itemscout(&dir)?.arg("-e"))?;
    let implicit = stdout_of(&mut itemscout(&dir)?)?;
    assert_eq!(explicit, implicit);
    assert_eq!(short, implicit);
    Ok(())
}

#[test]
fn test_csv_input() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("baskets.csv"),
        "bread,milk\nbread, eggs\n\nmilk,bread,eggs,\n",
    )?;

    itemscout(&dir)?
        .args(["--csv", "baskets.csv", "-m", "2"])
        .assert()
        .success()
        .stdout("3,bread\n2,eggs\n2,milk\n2,bread,eggs\n2,bread,milk\n");
    Ok(())
}

#[test]
fn test_json_input_and_output() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("baskets.json"),
        r#"[["x", "y"], ["x"], ["y", "x"]]"#,
    )?;

    itemscout(&dir)?
        .args(["--json", "baskets.json", "-m", "2", "--format", "json"])
        .assert()
        .success()
        .stdout("[[3,[\"x\"]],[2,[\"y\"]],[2,[\"x\",\"y\"]]]\n");
    Ok(())
}

#[test]
fn test_labels_with_commas_are_quoted() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("baskets.json"),
        r#"[["salt, coarse", "pepper"], ["salt, coarse"]]"#,
    )?;

    itemscout(&dir)?
        .args(["--json", "baskets.json", "-m", "2", "-o", "itemsets.csv"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("itemsets.csv"))?,
        "2,\"salt, coarse\"\n"
    );

    // The quoted output reads back as a single item
    itemscout(&dir)?
        .args(["--csv", "itemsets.csv", "-m", "1"])
        .assert()
        .success()
        .stdout("1,2\n1,\"salt, coarse\"\n1,2,\"salt, coarse\"\n");
    Ok(())
}

#[test]
fn test_blank_rows_count_toward_percentage() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("baskets.csv"), "a\na\n\n\n")?;

    // 50% of four transactions is two
    itemscout(&dir)?
        .args(["--csv", "baskets.csv", "-M", "50"])
        .assert()
        .success()
        .stdout("2,a\n");

    // 75% of four is three, which nothing reaches
    itemscout(&dir)?
        .args(["--csv", "baskets.csv", "-M", "75"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_stdin_input() -> Result<()> {
    let dir = tempdir()?;
    itemscout(&dir)?
        .args(["--stdin", "-m", "2"])
        .write_stdin("a,b\na\nc\n")
        .assert()
        .success()
        .stdout("2,a\n");
    Ok(())
}

#[test]
fn test_percent_threshold() -> Result<()> {
    let dir = tempdir()?;
    itemscout(&dir)?
        .args(["--example", "-M", "100"])
        .assert()
        .success()
        .stdout("6,C\n");
    Ok(())
}

#[test]
fn test_all_modes_print_the_same_itemsets() -> Result<()> {
    let dir = tempdir()?;
    let reference = stdout_of(itemscout(&dir)?.args(["--example", "-m", "2"]))?;

    for args in [
        vec!["-p", "-j", "3"],
        vec!["-a", "apriori"],
        vec!["-a", "apriori", "-p"],
    ] {
        let stdout = stdout_of(itemscout(&dir)?.args(["--example", "-m", "2"]).args(&args))?;
        assert_eq!(stdout, reference, "args: {:?}", args);
    }
    Ok(())
}

#[test]
fn test_output_file() -> Result<()> {
    let dir = tempdir()?;
    itemscout(&dir)?
        .args(["--example", "-o", "itemsets.csv"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(dir.path().join("itemsets.csv"))?;
    assert!(written.starts_with(SAMPLE_HEAD));
    assert_eq!(written.lines().count(), 19);
    Ok(())
}

#[test]
fn test_stats_only() -> Result<()> {
    let dir = tempdir()?;
    itemscout(&dir)?
        .args(["--example", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found"))
        .stdout(predicate::str::contains("19"))
        .stdout(predicate::str::contains("frequent itemsets in 6 transactions"))
        .stdout(predicate::str::contains("Itemsets by size"))
        .stdout(predicate::str::contains("6,C").not());
    Ok(())
}

#[test]
fn test_config_file_with_cli_override() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("mining.yaml"),
        "min_support:\n  count: 5\noutput_format: json\n",
    )?;

    itemscout(&dir)?
        .args(["--example", "--config", "mining.yaml"])
        .assert()
        .success()
        .stdout("[[6,[\"C\"]],[5,[\"W\"]],[5,[\"C\",\"W\"]]]\n");

    // Flags win over the file
    itemscout(&dir)?
        .args(["--example", "--config", "mining.yaml", "-M", "100", "-f", "csv"])
        .assert()
        .success()
        .stdout("6,C\n");
    Ok(())
}

#[test]
fn test_local_config_file() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join(".itemscout.yaml"),
        "min_support:\n  percent: 100.0\n",
    )?;

    itemscout(&dir)?.assert().success().stdout("6,C\n");
    Ok(())
}

#[test]
fn test_invalid_min_support() -> Result<()> {
    let dir = tempdir()?;
    itemscout(&dir)?
        .args(["--example", "-m", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minimum support must be at least 1"));

    itemscout(&dir)?
        .args(["--example", "-M", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("percentage must be in (0, 100]"));
    Ok(())
}

#[test]
fn test_empty_and_missing_input() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("empty.csv"), "")?;
    fs::write(dir.path().join("blank.csv"), "\n\n")?;

    itemscout(&dir)?
        .args(["--csv", "empty.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyTransactions"));

    // Blank rows are empty transactions, so nothing is frequent
    itemscout(&dir)?
        .args(["--csv", "blank.csv", "-m", "1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    itemscout(&dir)?
        .args(["--csv", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileNotFound"));
    Ok(())
}

#[test]
fn test_rejects_bad_arguments() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.csv"), "x\n")?;
    fs::write(dir.path().join("a.json"), "[[\"x\"]]")?;

    itemscout(&dir)?
        .args(["--csv", "a.csv", "--json", "a.json"])
        .assert()
        .failure();

    itemscout(&dir)?
        .args(["-m", "2", "-M", "50"])
        .assert()
        .failure();

    itemscout(&dir)?
        .args(["-a", "fpgrowth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown algorithm"));

    itemscout(&dir)?
        .args(["-j", "0", "-p"])
        .assert()
        .failure();
    Ok(())
}
