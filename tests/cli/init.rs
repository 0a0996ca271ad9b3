use crate::CliTest;

#[test]
fn init_creates_config_file() {
    let test = CliTest::new().unwrap();

    let output = test.command().arg("init").output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let config = test.read_file(".rivetrc.json").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&config).unwrap();
    assert_eq!(parsed["outputPath"], "rivet_bindings.cpp");
    assert_eq!(parsed["weightThreshold"], 20);
    assert_eq!(parsed["incremental"], true);
}

#[test]
fn init_refuses_to_overwrite() {
    let test = CliTest::with_file(".rivetrc.json", "{}").unwrap();

    let output = test.command().arg("init").output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("already exists"), "stderr: {stderr}");
}
