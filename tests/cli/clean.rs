use crate::CliTest;

const UNIT: &str = r#"{ "path": "widget.decls.json", "decls": [
    { "kind": "class", "name": "Widget", "annotations": ["class"] }
] }"#;

#[test]
fn clean_removes_cache_records() {
    let test = CliTest::with_file("widget.decls.json", UNIT).unwrap();

    test.generate_command()
        .arg("widget.decls.json")
        .output()
        .unwrap();
    assert!(test.root().join(".rivet-cache").exists());

    let output = test.clean_command().output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Removed 1 cache record"), "stdout: {stdout}");
    assert!(!test.root().join(".rivet-cache").exists());
}

#[test]
fn clean_on_empty_project_succeeds() {
    let test = CliTest::new().unwrap();

    let output = test.clean_command().output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Removed 0 cache record"), "stdout: {stdout}");
}
