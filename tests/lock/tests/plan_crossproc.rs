//! Cross-process determinism test.
//!
//! Spawns the `plan_fixture` binary under several environment variants and
//! asserts identical stdout and identical plan JSON files. Plans must not
//! depend on process-level state (cwd, locale, env vars, hash seeds).

use std::path::{Path, PathBuf};
use std::process::Command;

/// `cargo test` puts test binaries in `target/<profile>/deps/`; the fixture
/// binary lives one level up.
fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("plan_fixture");
    path
}

/// Run the fixture in `work_dir`, writing plan JSON into `out_dir`.
fn run_variant(work_dir: &Path, out_dir: &Path, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .arg(out_dir)
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!(
            "failed to spawn {} (work_dir={}, overrides={env_overrides:?}): {e}",
            bin.display(),
            work_dir.display()
        )
    });
    assert!(
        output.status.success(),
        "plan_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn read_plans(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut plans: Vec<(String, Vec<u8>)> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            (name, std::fs::read(&path).unwrap())
        })
        .collect();
    plans.sort();
    plans
}

#[test]
fn crossproc_determinism_env_variants() {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap();
    let variants: [(&str, &[(&str, &str)]); 4] = [
        ("baseline", &[]),
        ("locale", &[("LC_ALL", "C"), ("LANG", "C")]),
        (
            "noise",
            &[
                ("KINOPLAN_NOISE", "should_not_matter"),
                ("TZ", "America/New_York"),
                ("HOME", "/nonexistent"),
            ],
        ),
        ("verbose", &[("RUST_LOG", "kinoplan_planner=debug")]),
    ];

    let mut runs = Vec::new();
    for (i, (label, overrides)) in variants.iter().enumerate() {
        let out = tempfile::tempdir().unwrap();
        // Alternate between the workspace root and a scratch cwd.
        let scratch = tempfile::tempdir().unwrap();
        let cwd = if i % 2 == 0 { workspace_root } else { scratch.path() };
        let stdout = run_variant(cwd, out.path(), overrides);
        runs.push((*label, stdout, read_plans(out.path())));
    }

    let (_, baseline_stdout, baseline_plans) = &runs[0];
    assert!(baseline_stdout.contains("line.digest=sha256:"));
    assert!(baseline_stdout.contains("clearance.digest=sha256:"));
    assert_eq!(baseline_plans.len(), 3);
    for (label, stdout, plans) in &runs[1..] {
        assert_eq!(
            baseline_stdout, stdout,
            "stdout differs under the {label} variant"
        );
        assert_eq!(
            baseline_plans, plans,
            "plan JSON differs under the {label} variant"
        );
    }
}

#[test]
fn crossproc_digests_match_in_process_solves() {
    let out = tempfile::tempdir().unwrap();
    let stdout = run_variant(out.path(), out.path(), &[]);
    for scenario in lock_tests::all().unwrap() {
        let digest = scenario.solve().unwrap().digest().unwrap();
        let line = format!("{}.digest={}", scenario.name, digest.as_str());
        assert!(
            stdout.lines().any(|l| l == line),
            "missing or mismatched line {line:?} in:\n{stdout}"
        );
    }
}
