use std::path::Path;
use std::process::{Command, Output};

fn srcref_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_srcref"));
    cmd.arg("--root").arg(Path::new("tests/fixtures").join(fixture));
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn packages_lists_every_build_file_directory() {
    let out = srcref_cmd("demo").arg("packages").output().unwrap();
    assert!(out.status.success(), "packages failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), "//\n//src/com/facebook\n//src/com/facebook/demo\n");
}

#[test]
fn owner_walks_up_to_nearest_build_file() {
    let out = srcref_cmd("demo")
        .args(["owner", "src/com/facebook/nobuild", "src/com/facebook/demo", "src/com"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "src/com/facebook/nobuild -> //src/com/facebook\n\
         src/com/facebook/demo -> //src/com/facebook/demo\n\
         src/com -> //\n"
    );
}

#[test]
fn parse_prints_canonical_form() {
    let out = srcref_cmd("demo").args(["parse", ":works", "--base", "src/com/facebook"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(stdout(&out), "//src/com/facebook:works\n");
}

#[test]
fn parse_rejects_malformed_target() {
    let out = srcref_cmd("demo").args(["parse", "//src/com/facebook"]).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Malformed Build Target"));
}

#[test]
fn parse_rejects_malformed_base_package() {
    for base in ["../evil", "pkg/"] {
        let out = srcref_cmd("demo").args(["parse", ":x", "--base", base]).output().unwrap();
        assert_eq!(out.status.code(), Some(1), "base {base}");
        assert!(stdout(&out).is_empty(), "base {base}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Malformed Build Target"));
    }
}

#[test]
fn resolve_files_and_targets_for_one_rule() {
    let out = srcref_cmd("demo")
        .args(["resolve", "--target", "//src/com/facebook:Main", "A.java", "//src/com/facebook:A"])
        .output()
        .unwrap();
    assert!(out.status.success(), "resolve failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout(&out),
        "A.java -> src/com/facebook/A.java\n\
         //src/com/facebook:A -> //src/com/facebook:A\n\
         //src/com/facebook:Main depends on //src/com/facebook:A\n"
    );
}

#[test]
fn resolve_reports_boundary_crossing() {
    let out = srcref_cmd("demo")
        .args(["resolve", "--target", "//src/com/facebook:boundary", "demo/B.java"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Package Boundary Crossed"), "{stderr}");
    assert!(stderr.contains("//src/com/facebook/demo"), "{stderr}");
}

#[test]
fn resolve_with_explicit_known_targets() {
    let out = srcref_cmd("demo")
        .args(["resolve", "--target", "//src/com/facebook:Main", "--known", "//src/com/facebook:works", ":A"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown Build Target"));
}

#[test]
fn resolve_parent_traversal_exits_two() {
    let out = srcref_cmd("demo")
        .args(["resolve", "--target", "//src/com/facebook/demo:Main", "../A.java"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Parent Directory Reference"));
}

#[test]
fn resolve_with_malformed_rule_target_exits_one() {
    let out = srcref_cmd("demo").args(["resolve", "--target", "//src/com/facebook", "A.java"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Malformed Build Target"));
}

#[test]
fn resolve_json_output() {
    let out = srcref_cmd("demo")
        .args(["resolve", "--json", "--target", "//:wakizashi", "build.xml"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["target"], "//:wakizashi");
    assert_eq!(json["inputs"][0]["reference"]["kind"], "file");
    assert_eq!(json["inputs"][0]["reference"]["path"], "build.xml");
}

#[test]
fn check_passes_on_clean_manifest() {
    let out = srcref_cmd("demo").arg("check").output().unwrap();
    assert!(out.status.success(), "check failed: {}", stdout(&out));
    assert_eq!(stdout(&out), "All 4 rules resolved\n");
}

#[test]
fn check_reports_each_broken_rule() {
    let out = srcref_cmd("demo").args(["check", "broken.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    let text = stdout(&out);
    assert!(text.contains("BROKEN  //src/com/facebook:boundary demo/B.java (package boundary)"), "{text}");
    assert!(text.contains("BROKEN  //src/com/facebook/demo:Main ../A.java (parent directory)"), "{text}");
    assert!(text.contains("BROKEN  //src/com/facebook:Main //does/not:exist (unknown target)"), "{text}");
    assert!(!text.contains("//src/com/facebook:ok"), "{text}");
    assert!(text.ends_with("3 of 4 rules broken\n"), "{text}");
}

#[test]
fn check_json_carries_dependencies() {
    let out = srcref_cmd("demo").args(["check", "--json"]).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0]["target"], "//src/com/facebook:Main");
    assert_eq!(
        json[0]["dependencies"],
        serde_json::json!(["//src/com/facebook:works", "//src/com/facebook/demo:demo"])
    );
}

#[test]
fn check_missing_manifest_fails() {
    let out = srcref_cmd("demo").args(["check", "nope.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Rule Manifest Not Found"));
}
