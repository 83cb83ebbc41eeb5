//! CLI integration tests using assert_cmd.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const BANK: &str = r#"[
  {"id": 1, "pregunta": "Sublingual route?", "opciones": {"A": "Under the tongue", "B": "Into a muscle", "C": "Rectal"}, "respuesta_correcta": "A"},
  {"id": 2, "pregunta": "Fridge temperature?", "opciones": {"A": "2-8 C", "B": "15-25 C", "C": "-20 C"}, "respuesta_correcta": "A"},
  {"id": 3, "pregunta": "Controlled narcotic?", "opciones": {"A": "Antibiotic", "B": "Scheduled psychotropic", "C": "Antiseptic"}, "respuesta_correcta": "B"}
]"#;

fn exam() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("exam").unwrap();
    cmd.env_remove("EXAM_BANK")
        .env_remove("EXAM_SIZE")
        .env_remove("EXAM_TIME_LIMIT");
    cmd
}

fn bank_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(BANK.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_flags() {
    exam()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bank"))
        .stdout(predicate::str::contains("--time-limit"));
}

#[test]
fn missing_bank_fails() {
    let dir = tempfile::tempdir().unwrap();
    exam()
        .arg("--bank")
        .arg(dir.path().join("nope.json"))
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("question bank not found"));
}

#[test]
fn bank_smaller_than_exam_cannot_start() {
    let bank = bank_file();
    exam()
        .arg("--bank")
        .arg(bank.path())
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exam needs 30"));
}

#[test]
fn submit_prints_results() {
    let bank = bank_file();
    exam()
        .arg("--bank")
        .arg(bank.path())
        .args(["--size", "3", "--no-special"])
        .write_stdin("submit\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/3"))
        .stdout(predicate::str::contains("Final score: 0.0 points"));
}

#[test]
fn answers_are_scored() {
    let bank = bank_file();
    // two questions expect A and one expects B
    exam()
        .arg("--bank")
        .arg(bank.path())
        .args(["--size", "3", "--time-limit", "15"])
        .write_stdin("a\nn\na\nn\na\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam submitted."))
        .stdout(predicate::str::contains("Final score: 1.5 points"))
        .stdout(predicate::str::contains("  correct: A: ").count(2))
        .stdout(predicate::str::contains("  wrong: you chose A: Antibiotic").count(1))
        .stdout(predicate::str::contains("skipped, the answer").not());
}

#[test]
fn config_file_sets_exam_size() {
    let bank = bank_file();
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "exam_size = 3\ntime_limit = \"unlimited\"").unwrap();
    exam()
        .arg("--bank")
        .arg(bank.path())
        .arg("--config")
        .arg(config.path())
        .write_stdin("submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 multiple-choice questions"));
}
