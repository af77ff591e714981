use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Run the binary on `root` with a config home that holds no config file.
fn voxreport(root: &Path, args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("config home");
    Command::new(env!("CARGO_BIN_EXE_voxreport"))
        .arg(root)
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .output()
        .expect("run voxreport")
}

fn html_files(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .expect("read root")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".html"))
        .collect();
    names.sort();
    names
}

#[test]
fn no_csv_files_exits_2_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.aac"), b"x").unwrap();

    let output = voxreport(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No CSV files found"));
    assert!(html_files(dir.path()).is_empty());
}

#[test]
fn missing_audio_still_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("voices.csv"),
        "lang,engine,voice,gender,filename\nen-US,azure,Jane,Female,gone.aac\n",
    )
    .unwrap();

    let output = voxreport(dir.path(), &[]);
    assert!(output.status.success());
    assert_eq!(html_files(dir.path()), vec!["en-US.html", "index.html"]);

    let page = fs::read_to_string(dir.path().join("en-US.html")).unwrap();
    assert!(page.contains("card missing"));
    assert!(!page.contains("<audio"));
}

#[test]
fn dry_run_writes_no_pages() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("voices.csv"),
        "lang,engine,voice,gender,filename\nen-US,aws,Matthew,Male,m.aac\n",
    )
    .unwrap();
    fs::write(dir.path().join("m.aac"), b"x").unwrap();

    let output = voxreport(dir.path(), &["--dry-run", "--mode", "provider"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("aws.html"));
    assert!(html_files(dir.path()).is_empty());
}
