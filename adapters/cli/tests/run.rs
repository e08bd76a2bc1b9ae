use std::{fs, process::Command};

fn survival_sim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_survival-sim"))
}

#[test]
fn short_run_prints_report() {
    let output = survival_sim()
        .args(["--seed", "3", "--ticks", "200", "--tick-ms", "50"])
        .output()
        .expect("failed to launch survival-sim");

    assert!(output.status.success(), "survival-sim should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seed 3 | 200 ticks | 10.0s simulated"));
    assert!(stdout.contains("missions active:"));
    assert!(stdout.contains("signals:"));
}

#[test]
fn identical_seeds_print_identical_reports() {
    let run = || {
        survival_sim()
            .args(["--seed", "99", "--ticks", "400"])
            .output()
            .expect("failed to launch survival-sim")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("survival-sim-{}.toml", std::process::id()));
    fs::write(&path, "[enemies]\ninitial_count = 0\n\n[resources]\nnode_count = 0\n")
        .expect("failed to write config");

    let output = survival_sim()
        .arg("--config")
        .arg(&path)
        .args(["--ticks", "20"])
        .output()
        .expect("failed to launch survival-sim");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("resources: wood 0, stone 0, food 0"));
    assert!(!stdout.contains("entity_created"));
}

#[test]
fn invalid_config_fails_with_message() {
    let path = std::env::temp_dir().join(format!(
        "survival-sim-invalid-{}.toml",
        std::process::id()
    ));
    fs::write(&path, "[player]\nmove_speed = -1.0\n").expect("failed to write config");

    let output = survival_sim()
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to launch survival-sim");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("player.move_speed"));
}
