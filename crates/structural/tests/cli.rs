/*
 * cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests driving the structural binary.
 */

use std::fs;
use std::process::Command;

const GOOD: &str = r#"<document xmlns="urn:com.structural:1:0" title="CLI Test">
  <section title="S">
    <paragraph>Hello from the command line.</paragraph>
  </section>
</document>"#;

const BAD_TABLE: &str = r#"<document xmlns="urn:com.structural:1:0" title="CLI Test">
  <section title="S">
    <paragraph><table>
      <table-head>
        <table-column-name>A</table-column-name>
        <table-column-name>B</table-column-name>
      </table-head>
      <table-body>
        <table-row><table-cell>only one</table-cell></table-row>
      </table-body>
    </table></paragraph>
  </section>
</document>"#;

fn structural() -> Command {
    Command::new(env!("CARGO_BIN_EXE_structural"))
}

#[test]
fn compiles_a_document_to_xhtml() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("doc.xhtml");
    fs::write(&input, GOOD).unwrap();

    let status = structural()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(rendered.contains("st_paragraph_1_1"));
    assert!(rendered.contains("Hello from the command line."));
}

#[test]
fn reports_compile_errors_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, BAD_TABLE).unwrap();

    let output = structural().arg("--input").arg(&input).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("number of columns in table row"));
}

#[test]
fn rejects_unrecognized_formats() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.txt");
    fs::write(&input, "plain text, not a structural document").unwrap();

    let output = structural().arg("--input").arg(&input).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized document format"));
}

#[test]
fn dumps_the_compiled_tree_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, GOOD).unwrap();

    let output = structural()
        .arg("--input")
        .arg(&input)
        .arg("--dump-ast")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "CLI Test");
}
