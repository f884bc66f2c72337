use assert_cmd::Command;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn codedump(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("codedump"));
    cmd.current_dir(cwd).arg("--no-interactive");
    cmd
}

fn sample_project() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path().join("shop");
    write_file(&root.join("app.py"), "import os\nprint(os.name)\n");
    write_file(&root.join("lib/cart.rs"), "pub struct Cart;\n");
    write_file(&root.join("lib/logo.png"), "not really a png");
    write_file(&root.join("node_modules/dep/index.js"), "module.exports = 1;\n");
    write_file(&root.join(".gitignore"), "# generated\ngen\n");
    write_file(&root.join("gen/out.py"), "x = 1\n");
    temp
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[test]
fn all_formats_agree_on_extracted_files() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "--format", "txt,json,md,html", "-o", "snap"])
        .args(["--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction Summary"));

    let out = temp.path().join("out");
    assert_eq!(
        files_in(&out),
        vec!["snap.html", "snap.json", "snap.md", "snap.txt"]
    );

    let count_re = Regex::new(r"(\d+) files extracted successfully").unwrap();
    for name in ["snap.txt", "snap.md", "snap.html"] {
        let body = fs::read_to_string(out.join(name)).unwrap();
        assert_eq!(&count_re.captures(&body).unwrap()[1], "2", "{}", name);
    }

    let json: Value = serde_json::from_str(&fs::read_to_string(out.join("snap.json")).unwrap()).unwrap();
    let paths: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["app.py", "lib/cart.rs"]);
    assert_eq!(json["extracted_count"], 2);
    assert_eq!(json["header"]["projects"][0], "shop");

    let text = fs::read_to_string(out.join("snap.txt")).unwrap();
    assert!(text.contains("'lib/cart.rs': ["));
    assert!(!text.contains("node_modules"));
    assert!(!text.contains("out.py"));
    assert!(text.contains("logo.png"));
}

#[test]
fn missing_path_exits_with_input_error() {
    let temp = tempdir().unwrap();

    codedump(temp.path())
        .args(["does-not-exist", "--output-dir", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nothing to extract"));

    assert!(!temp.path().join("out").exists());
    assert!(files_in(temp.path()).is_empty());
}

#[test]
fn oneline_flag_writes_compressed_copy() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "-o", "snap.txt", "--oneline"])
        .assert()
        .success();

    let compressed = fs::read_to_string(temp.path().join("snap.oneline.txt")).unwrap();
    assert!(!compressed.contains('\n'));
    assert!(compressed.contains("import os print(os.name)"));
    assert!(temp.path().join("snap.txt").is_file());
}

#[test]
fn chunk_size_switches_to_chunk_files() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "-o", "pack", "--chunk-size", "40"])
        .assert()
        .success();

    let names = files_in(temp.path());
    assert!(names.contains(&"pack_chunk_1.txt".to_string()));
    assert!(names.contains(&"pack_chunk_2.txt".to_string()));
    assert!(!names.iter().any(|n| n == "pack.txt"));

    let first = fs::read_to_string(temp.path().join("pack_chunk_1.txt")).unwrap();
    assert!(first.starts_with("--- START FILE: app.py ---\n"));
}

#[test]
fn zero_chunk_size_is_a_chunking_error() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "--chunk-size", "0"])
        .assert()
        .code(3);
}

#[test]
fn secrets_are_reported_but_unattended_runs_still_write() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("svc/settings.py"),
        "DEBUG = True\nAPI_KEY = 'abcdef0123456789'\n",
    );

    codedump(temp.path())
        .args(["svc", "-o", "report"])
        .assert()
        .success()
        .stderr(predicate::str::contains("settings.py"))
        .stderr(predicate::str::contains("Potential secrets"))
        .stderr(predicate::str::contains("non-interactive"));
    assert!(temp.path().join("report.txt").is_file());

    codedump(temp.path())
        .args(["svc", "-o", "forced", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("--force"));
    assert!(temp.path().join("forced.txt").is_file());

    codedump(temp.path())
        .args(["svc", "-o", "unscanned", "--no-secret-scan"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Potential secrets").not());
    assert!(temp.path().join("unscanned.txt").is_file());
}

#[test]
fn token_variables_in_plain_code_extract_cleanly() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("parser/lexer.rs"),
        "fn lex(input: &str) {\n    let token = tokenizer_next(input);\n}\n",
    );

    codedump(temp.path())
        .args(["parser", "-o", "lexer", "--format", "txt,json"])
        .assert()
        .success();

    assert!(temp.path().join("lexer.txt").is_file());
    assert!(temp.path().join("lexer.json").is_file());
}

#[test]
fn zip_flag_bundles_reports_and_sources() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "-o", "snap", "--format", "txt,md", "--zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snap.zip"));

    let file = fs::File::open(temp.path().join("snap.zip")).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "extracted_files/app.py",
            "extracted_files/lib/cart.rs",
            "snap.md",
            "snap.txt",
        ]
    );
}

#[test]
fn config_file_sets_defaults() {
    let temp = sample_project();
    write_file(
        &temp.path().join("codedump.toml"),
        "[output]\nformats = [\"md\"]\nbase_name = \"from_config\"\n\n[filters]\nignore_patterns = [\"lib\"]\n",
    );

    codedump(temp.path()).arg("shop").assert().success();

    let md = fs::read_to_string(temp.path().join("from_config.md")).unwrap();
    assert!(md.contains("**File: `app.py`**"));
    assert!(!md.contains("cart.rs"));
    assert!(!temp.path().join("from_config.txt").exists());

    codedump(temp.path())
        .args(["shop", "--no-config", "-o", "plain"])
        .assert()
        .success();
    assert!(temp.path().join("plain.txt").is_file());
}

#[test]
fn malformed_config_is_rejected() {
    let temp = sample_project();
    write_file(&temp.path().join("codedump.toml"), "[output\nformats = 3");

    codedump(temp.path())
        .arg("shop")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TOML"));
}

#[test]
fn unknown_format_only_is_an_invalid_argument() {
    let temp = sample_project();

    codedump(temp.path())
        .args(["shop", "--format", "pdf"])
        .assert()
        .code(5);
}

#[test]
fn default_name_uses_single_target() {
    let temp = sample_project();

    codedump(temp.path()).arg("shop").assert().success();

    let names = files_in(temp.path());
    let report = names
        .iter()
        .find(|n| n.starts_with("codebase_shop_") && n.ends_with(".txt"))
        .expect("default-named report");
    assert_eq!(report.len(), "codebase_shop_".len() + "YYYYmmdd_HHMMSS".len() + ".txt".len());
}
