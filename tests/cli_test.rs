// Command line behavior of the drop-route binary
use std::error::Error;
use std::fs;
use std::process::Command;

fn drop_route() -> Command {
    Command::new(env!("CARGO_BIN_EXE_drop-route"))
}

#[test]
fn test_failure_is_reported_once() -> Result<(), Box<dyn Error>> {
    let output = drop_route()
        .args(["optimize", "--start", "Office", "--drop", "1 Oak St"])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("no distance source").count(), 1, "{}", stderr);
    Ok(())
}

#[test]
fn test_optimize_with_leg_table() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::TempDir::new()?;
    let matrix = dir.path().join("legs.json");
    fs::write(
        &matrix,
        r#"{"legs": [
            {"origin": "A", "destination": "B", "distance": 10},
            {"origin": "B", "destination": "C", "distance": 5},
            {"origin": "C", "destination": "D", "distance": 10},
            {"origin": "A", "destination": "C", "distance": 8},
            {"origin": "C", "destination": "B", "distance": 5},
            {"origin": "B", "destination": "D", "distance": 10}
        ]}"#,
    )?;

    let output = drop_route()
        .args(["optimize", "--start", "A", "--drop", "Ann=B", "--drop", "C", "--end", "D"])
        .arg("--matrix")
        .arg(&matrix)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1. A\n2. C\n3. B (Ann)\n4. D"), "{}", stdout);
    assert!(stdout.contains("Total distance: 23.00"));
    Ok(())
}
