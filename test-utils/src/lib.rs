//! Shared helpers for the crate's end-to-end tests: compile a fixture
//! program through the real `teenyc` binary and check its JIT-executed
//! `main` return value, shelling out to the compiled binary rather than
//! calling library internals directly.

use std::{
    error::Error,
    path::Path,
    process::{Command, Output},
    str,
};

const TEENYC_PATH: &str = "./target/debug/teenyc";

pub fn check_jit_result(src_path: &Path, expected: i32) -> Result<(), Box<dyn Error>> {
    let output: Output = Command::new(TEENYC_PATH)
        .arg("--run")
        .arg(src_path)
        .output()?;

    let stdout = str::from_utf8(&output.stdout)?;
    let stderr = str::from_utf8(&output.stderr)?;

    assert!(
        output.status.success(),
        "teenyc exited with status {:?}, stderr: {stderr}",
        output.status.code()
    );

    let got: i32 = stdout.trim().parse()?;
    assert_eq!(got, expected, "stderr: {stderr}");

    Ok(())
}

pub fn check_rejected(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = Command::new(TEENYC_PATH).arg(src_path).output()?;
    assert!(
        !output.status.success(),
        "expected teenyc to reject {}",
        src_path.display()
    );
    Ok(())
}
