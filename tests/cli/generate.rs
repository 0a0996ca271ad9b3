use crate::CliTest;

const WIDGET_UNIT: &str = r#"{
    "path": "widget.decls.json",
    "default_namespace": "game",
    "decls": [
        {
            "kind": "class",
            "name": "Widget",
            "annotations": ["class"],
            "members": [
                { "kind": "constructor", "name": "Widget", "annotations": [] },
                {
                    "kind": "method",
                    "name": "update",
                    "return_type": "void",
                    "annotations": []
                },
                {
                    "kind": "method",
                    "name": "getName",
                    "return_type": "std::string",
                    "annotations": ["property"]
                },
                {
                    "kind": "method",
                    "name": "setName",
                    "return_type": "void",
                    "params": [{ "ty": "const std::string&" }],
                    "annotations": ["property"]
                }
            ]
        },
        {
            "kind": "enum",
            "name": "Status",
            "annotations": ["enum"],
            "enumerators": [
                { "label": "ACTIVE" },
                { "label": "INACTIVE", "value": 5 },
                { "label": "PENDING" }
            ]
        },
        {
            "kind": "function",
            "name": "spawn",
            "return_type": "void",
            "annotations": ["function"]
        }
    ]
}"#;

#[test]
fn generates_registration_source() {
    let test = CliTest::with_file("widget.decls.json", WIDGET_UNIT).unwrap();

    let output = test
        .generate_command()
        .args(["widget.decls.json", "--module", "game"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Generated"), "stdout: {stdout}");

    let generated = test.read_file("rivet_bindings.cpp").unwrap();
    assert!(generated.contains("void register_game_bindings(sol::state_view lua)"));
    assert!(generated.contains("sol::table ns_game = lua[\"game\"].get_or_create<sol::table>();"));
    assert!(generated.contains("ns_game.new_usertype<Widget>(\"Widget\","));
    assert!(generated.contains("sol::constructors<Widget()>()"));
    assert!(generated.contains("\"update\", &Widget::update"));
    assert!(generated.contains("\"name\", sol::property(&Widget::getName, &Widget::setName)"));
    assert!(generated.contains("ns_game.set_function(\"spawn\", &spawn);"));
    assert!(generated.contains("\"INACTIVE\", 5"));
    assert!(generated.contains("\"PENDING\", 6"));
}

#[test]
fn scans_the_source_root_when_no_units_are_given() {
    let test = CliTest::with_file("decls/widget.decls.json", WIDGET_UNIT).unwrap();

    let output = test.generate_command().output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join("rivet_bindings.cpp").exists());
}

#[test]
fn second_run_hits_the_cache_and_output_is_identical() {
    let test = CliTest::with_file("widget.decls.json", WIDGET_UNIT).unwrap();

    let first = test
        .generate_command()
        .arg("widget.decls.json")
        .output()
        .unwrap();
    assert_eq!(first.status.code(), Some(0));
    let first_output = test.read_file("rivet_bindings.cpp").unwrap();

    let second = test
        .generate_command()
        .arg("widget.decls.json")
        .output()
        .unwrap();
    assert_eq!(second.status.code(), Some(0));
    let second_output = test.read_file("rivet_bindings.cpp").unwrap();

    assert_eq!(first_output, second_output);
    let stdout = String::from_utf8(second.stdout).unwrap();
    assert!(stdout.contains("(1 cached)"), "stdout: {stdout}");
}

#[test]
fn no_incremental_skips_the_cache() {
    let test = CliTest::with_file("widget.decls.json", WIDGET_UNIT).unwrap();

    test.generate_command()
        .args(["widget.decls.json", "--no-incremental"])
        .output()
        .unwrap();
    assert!(!test.root().join(".rivet-cache").exists());
}

#[test]
fn zero_annotated_declarations_exits_one() {
    let unit = r#"{ "path": "empty.decls.json", "decls": [
        { "kind": "class", "name": "Plain", "annotations": [] }
    ] }"#;
    let test = CliTest::with_file("empty.decls.json", unit).unwrap();

    let output = test
        .generate_command()
        .arg("empty.decls.json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!test.root().join("rivet_bindings.cpp").exists());
}

#[test]
fn config_file_settings_apply() {
    let test = CliTest::with_file("decls/widget.decls.json", WIDGET_UNIT).unwrap();
    test.write_file(
        ".rivetrc.json",
        r#"{ "outputPath": "bindings/game.cpp", "moduleNamespace": "engine" }"#,
    )
    .unwrap();

    let output = test.generate_command().output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let generated = test.read_file("bindings/game.cpp").unwrap();
    assert!(generated.contains("void register_engine_bindings(sol::state_view lua)"));
}

#[test]
fn unsupported_operator_reports_info_in_verbose_mode() {
    let unit = r#"{ "path": "vec.decls.json", "decls": [
        {
            "kind": "class",
            "name": "Vec2",
            "annotations": ["class"],
            "members": [
                {
                    "kind": "method",
                    "name": "operator==",
                    "return_type": "bool",
                    "params": [{ "ty": "const Vec2&" }],
                    "annotations": []
                },
                {
                    "kind": "method",
                    "name": "operator!=",
                    "return_type": "bool",
                    "params": [{ "ty": "const Vec2&" }],
                    "annotations": []
                }
            ]
        }
    ] }"#;
    let test = CliTest::with_file("vec.decls.json", unit).unwrap();

    let output = test
        .generate_command()
        .args(["vec.decls.json", "--verbose"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("info[unsupported-operator]"), "stdout: {stdout}");

    let generated = test.read_file("rivet_bindings.cpp").unwrap();
    assert!(generated.contains("sol::meta_function::equal_to, &Vec2::operator=="));
    assert!(!generated.contains("operator!="));
}
