//! End-to-end driver tests (SPEC_FULL.md §10.4), exercising the compiled
//! `gdscript-compiler` binary against spec.md §8 scenarios S1-S6 plus the
//! exit-code contract from §6/§7.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> Command {
    Command::cargo_bin("gdscript-compiler").unwrap()
}

fn write_source(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_flag_exits_zero_and_prints_usage() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gdscript-compiler"));
}

#[test]
fn missing_arguments_exit_one() {
    bin().assert().failure().code(1);
}

#[test]
fn unknown_flag_exits_one() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "in.gd", "pass\n");
    let output = dir.path().join("out");
    bin()
        .arg(input)
        .arg(output)
        .arg("--bogus")
        .assert()
        .failure()
        .code(1);
}

/// S2: `a := 1 + 2` infers `int` and produces no diagnostics, so the
/// compile should succeed end to end with exit code 0.
#[test]
fn s2_type_infer_declaration_compiles_cleanly() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "s2.gd", "a := 1 + 2\n");
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .arg("--format")
        .arg("assembly")
        .assert()
        .success();
    assert!(output.with_extension("s").exists());
}

/// S3: referencing an undefined variable is a semantic error; lex/parse
/// succeed but the overall compile fails with exit code 1, and the
/// rendered diagnostic names the offending identifier and line.
#[test]
fn s3_undefined_variable_is_an_error() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "s3.gd", "print(q)\n");
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("q"));
    assert!(!output.with_extension("s").exists());
}

/// S4: a class whose first method calls a second method defined later in
/// the same class body compiles without error, thanks to the two-pass
/// (signatures-then-bodies) analysis policy.
#[test]
fn s4_class_forward_method_reference_compiles() {
    let dir = tempdir().unwrap();
    let input = write_source(
        dir.path(),
        "s4.gd",
        "class C:\n    func a(): return b()\n    func b(): return 1\n",
    );
    let output = dir.path().join("out");
    bin().arg(&input).arg(&output).assert().success();
}

/// S5: a string pattern under an int `match` subject is a non-fatal
/// warning; the pipeline still reaches codegen and exits 0.
#[test]
fn s5_match_pattern_mismatch_is_a_warning_not_an_error() {
    let dir = tempdir().unwrap();
    let input = write_source(
        dir.path(),
        "s5.gd",
        "match 3:\n    \"x\":\n        pass\n",
    );
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .arg("--format")
        .arg("assembly")
        .assert()
        .success()
        .stderr(predicate::str::contains("may not match"));
    assert!(output.with_extension("s").exists());
}

/// S6: compiling a trivial function with `--format assembly` writes
/// `<out>.s` containing the function's label, an immediate-zero `mov`,
/// and a `ret`.
#[test]
fn s6_assembly_emission_contains_label_and_return() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "s6.gd", "func f():\n    return 0\n");
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .arg("--format")
        .arg("assembly")
        .assert()
        .success();

    let asm_path = output.with_extension("s");
    assert!(asm_path.exists());
    let text = fs::read_to_string(&asm_path).unwrap();
    assert!(text.contains("f:"));
    assert!(text.lines().any(|l| l.contains("mov") && l.contains('0')));
    assert!(text.contains("ret"));
}

/// Object format additionally writes the `GDOBJ` blob alongside the `.s`.
#[test]
fn object_format_writes_assembly_and_object_blob() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "obj.gd", "func f():\n    return 0\n");
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .arg("--format")
        .arg("object")
        .assert()
        .success();

    assert!(output.with_extension("s").exists());
    let object_bytes = fs::read(output.with_extension("o")).unwrap();
    assert_eq!(&object_bytes[0..5], b"GDOBJ");
}

/// Executable format additionally writes a native binary whose magic
/// bytes match the selected platform's container format (invariant 6).
#[test]
fn executable_format_writes_native_binary_with_correct_magic() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "exe.gd", "func f():\n    return 0\n");
    let output = dir.path().join("out");
    bin()
        .arg(&input)
        .arg(&output)
        .arg("--format")
        .arg("executable")
        .arg("--platform")
        .arg("linux64")
        .assert()
        .success();

    let exe_path = output;
    let bytes = fs::read(&exe_path).unwrap();
    assert_eq!(&bytes[0..4], &[0x7f, b'E', b'L', b'F']);
}

/// Nonexistent input file fails with exit code 1 (file-open failure).
#[test]
fn nonexistent_input_file_exits_one() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("does-not-exist.gd");
    let output = dir.path().join("out");
    bin().arg(input).arg(output).assert().failure().code(1);
}
