use std::process::Command;

fn run_headless(extra: &[&str]) -> std::process::Output {
    let mut args = vec![
        "run",
        "--no-default-features",
        "--",
        "--ticks",
        "60",
        "--fps",
        "0",
        "--seed",
        "7",
    ];
    args.extend_from_slice(extra);
    Command::new("cargo")
        .args(&args)
        .env("RUST_LOG", "warn,proximity_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&[]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that final statistics are logged with the expected record count
#[test]
fn test_simulation_statistics_logged() {
    let output = run_headless(&[]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for key in [
        "Ticks run:",
        "Adjusting vehicles:",
        "Proximity clusters:",
        "Final velocity:",
    ] {
        assert!(stderr.contains(key), "Missing '{}' statistic", key);
    }

    let records_line = stderr
        .lines()
        .find(|line| line.contains("Log records:"))
        .expect("Could not find 'Log records' line");
    let parts: Vec<&str> = records_line.split("Log records:").collect();
    let records: usize = parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .expect("Could not parse record count");

    assert_eq!(records, 60 * 40);
}

/// Test that the CSV export and chart are produced at the end of the run
#[test]
fn test_log_export_and_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("velocity.csv");
    let path_arg = path.to_string_lossy().into_owned();

    let output = run_headless(&["--log-csv", &path_arg, "--chart"]);
    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let csv = std::fs::read_to_string(&path).expect("CSV was not written");
    assert_eq!(csv.lines().next(), Some("index,tick,id,x,y,velocity"));
    assert_eq!(csv.lines().count(), 1 + 60 * 40);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vehicle velocity over time"));
    assert!(stdout.contains("Vehicle  39"));
}

/// Test that SIGTERM ends an open-ended run cleanly and still exports the log
#[cfg(unix)]
#[test]
fn test_sigterm_stops_open_ended_run_and_exports_log() {
    use std::io::Read;
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("velocity.csv");

    let mut child = Command::new(env!("CARGO_BIN_EXE_proximity_sim"))
        .args(["--fps", "30", "--seed", "3", "--log-csv"])
        .arg(&path)
        .env("RUST_LOG", "warn,proximity_sim=info")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start simulation");

    std::thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("Failed to send SIGTERM");
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(30);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("Simulation did not stop after SIGTERM");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();

    assert!(exit.success(), "Simulation exited with {}. stderr: {}", exit, stderr);
    assert!(stderr.contains("stdin closed"), "Missing stdin EOF warning. stderr: {}", stderr);
    assert!(stderr.contains("SIMULATION COMPLETE"), "stderr: {}", stderr);

    let csv = std::fs::read_to_string(&path).expect("CSV was not written");
    let rows = csv.lines().count() - 1;
    assert!(rows > 0 && rows % 40 == 0, "unexpected row count {}", rows);
}

/// Test that the UI refuses to run without pacing
#[test]
fn test_ui_rejects_zero_fps() {
    let output = Command::new(env!("CARGO_BIN_EXE_proximity_sim"))
        .args(["--ui", "--fps", "0"])
        .output()
        .expect("Failed to execute simulation");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--fps 0"), "stderr: {}", stderr);
}
