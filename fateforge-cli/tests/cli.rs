use std::path::PathBuf;
use std::process::Command;

fn temp_save(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "fateforge-cli-{label}-{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_fateforge");
    Command::new(exe)
        .args(args)
        .env_remove("FATEFORGE_TOKEN")
        .output()
        .expect("run cli")
}

#[test]
fn cli_lists_the_decision_catalog() {
    let output = run(&["--list-decisions"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available decisions"));
    assert!(stdout.contains("Take up your father's sword"));
    assert!(stdout.contains("(warrior)"));
}

#[test]
fn scripted_warrior_defensive_run_grades_a_and_keeps_the_save() {
    let save = temp_save("warrior");
    let save_arg = save.to_string_lossy().to_string();
    let output = run(&[
        "--save-file",
        &save_arg,
        "--choices",
        "1,4,10,12,13",
        "--json",
        "--no-submit",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"grade\": \"A\""), "stdout: {stdout}");
    assert!(stdout.contains("\"hero_archetype\": \"warrior\""));
    // Unsubmitted finished runs stay on disk.
    assert!(save.exists());

    let output = run(&["--save-file", &save_arg, "--discard"]);
    assert!(output.status.success());
    assert!(!save.exists());
}

#[test]
fn scripted_run_with_no_favorable_decisions_grades_d() {
    let save = temp_save("rogue");
    let save_arg = save.to_string_lossy().to_string();
    let output = run(&[
        "--save-file",
        &save_arg,
        "--choices",
        "3,9,11,12,18",
        "--json",
        "--no-submit",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"grade\": \"D\""));
    assert!(stdout.contains("\"hero_archetype\": \"rogue\""));
    let _ = std::fs::remove_file(&save);
}

#[test]
fn scripted_run_rejects_a_decision_the_beat_does_not_offer() {
    let save = temp_save("invalid");
    let save_arg = save.to_string_lossy().to_string();
    // Decision 13 belongs to the warrior confrontation, not the opening branch.
    let output = run(&["--save-file", &save_arg, "--choices", "13", "--no-submit"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not offered"), "stderr: {stderr}");
    let _ = std::fs::remove_file(&save);
}
