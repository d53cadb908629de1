use super::*;

fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}

const SERVER_CONFIG: &str = r#"# server config
server_config {
  server_endpoint: "tcp://127.0.0.1:5555"
  notify_endpoint: "tcp://127.0.0.1:5556"
}
preproc_config {
  dataset_im_paths: "<BASE_DIR>/server_data/dset_images.txt"
  dataset_im_base_path: "<DSET_DIR>"
  net_config: {
    model_file: "<BASE_DIR>/model_data/VGG_CNN_M_128.caffemodel"
    data_aug_type: ASPECT_CORNERS
  }
}
model_config {
  neg_im_paths: "<BASE_DIR>/server_data/neg_images.txt"
  max_retrieved: 50   
}
"#;

#[test]
fn leaf_value_is_exact() {
    let doc = ConfigDocument::parse("leaf: value\n").unwrap();
    assert_eq!(doc.get(&path("leaf")).unwrap(), "value");

    let doc = ConfigDocument::parse("leaf:    value   \t\r\n").unwrap();
    assert_eq!(doc.get(&path("leaf")).unwrap(), "value");
}

#[test]
fn value_without_trailing_newline() {
    let doc = ConfigDocument::parse("size: 5").unwrap();
    assert_eq!(doc.get(&path("size")).unwrap(), "5");
}

#[test]
fn nested_lookup_and_unqualified_lookup_agree() {
    let doc = ConfigDocument::parse("parent {\n  leaf: value\n}\n").unwrap();
    let qualified = doc.find(&path("parent.leaf")).unwrap();
    let bare = doc.find(&path("leaf")).unwrap();
    assert_eq!(qualified, bare);
    assert_eq!(doc.value_of(qualified), "value");
}

#[test]
fn parent_must_be_innermost_block() {
    let doc = ConfigDocument::parse(SERVER_CONFIG).unwrap();
    assert_eq!(
        doc.get(&path("net_config.data_aug_type")).unwrap(),
        "ASPECT_CORNERS"
    );
    assert_eq!(
        doc.get(&path("preproc_config.net_config.data_aug_type")).unwrap(),
        "ASPECT_CORNERS"
    );
    assert!(matches!(
        doc.get(&path("preproc_config.data_aug_type")),
        Err(PatchError::FieldNotFound { .. })
    ));
    assert!(matches!(
        doc.get(&path("server_config.max_retrieved")),
        Err(PatchError::FieldNotFound { .. })
    ));
    assert_eq!(doc.get(&path("model_config.max_retrieved")).unwrap(), "50");
}

#[test]
fn qualified_lookup_skips_earlier_unrelated_match() {
    let text = "a {\n  name: \"first\"\n}\nb {\n  name: \"second\"\n}\n";
    let doc = ConfigDocument::parse(text).unwrap();
    assert_eq!(doc.get(&path("name")).unwrap(), "\"first\"");
    assert_eq!(doc.get(&path("b.name")).unwrap(), "\"second\"");
}

#[test]
fn missing_leaf_is_not_found() {
    let doc = ConfigDocument::parse(SERVER_CONFIG).unwrap();
    let err = doc.get(&path("gpu_id")).unwrap_err();
    assert!(matches!(err, PatchError::FieldNotFound { ref field } if field == "gpu_id"));
    assert_eq!(err.to_string(), "Could not locate field gpu_id in config file");
}

#[test]
fn fields_enumerates_dotted_paths() {
    let doc = ConfigDocument::parse(SERVER_CONFIG).unwrap();
    let paths: Vec<String> = doc.fields().iter().map(Field::dotted_path).collect();
    assert_eq!(
        paths,
        [
            "server_config.server_endpoint",
            "server_config.notify_endpoint",
            "preproc_config.dataset_im_paths",
            "preproc_config.dataset_im_base_path",
            "preproc_config.net_config.model_file",
            "preproc_config.net_config.data_aug_type",
            "model_config.neg_im_paths",
            "model_config.max_retrieved",
        ]
    );
    assert_eq!(doc.fields()[7].key(), "max_retrieved");
}

#[test]
fn braces_colons_and_hashes_inside_strings_are_inert() {
    let text = "a {\n  pattern: \"x { y: } # z\"  # trailing comment\n  n: 1\n}\nleaf: 'it''s'\n";
    let doc = ConfigDocument::parse(text).unwrap();
    assert_eq!(doc.get(&path("a.pattern")).unwrap(), "\"x { y: } # z\"");
    assert_eq!(doc.get(&path("a.n")).unwrap(), "1");
    assert_eq!(doc.get(&path("leaf")).unwrap(), "'it''s'");
}

#[test]
fn single_line_blocks() {
    let doc = ConfigDocument::parse("outer { inner { k: 7 } j: \"q\" }\n").unwrap();
    assert_eq!(doc.get(&path("outer.inner.k")).unwrap(), "7");
    assert_eq!(doc.get(&path("outer.j")).unwrap(), "\"q\"");
}

#[test]
fn parse_errors_report_line() {
    let cases = [
        ("a {\n  b: 1\n", 1),
        ("a: 1\n}\n", 2),
        ("a: \"open\n", 1),
        ("a 1\n", 1),
        ("a:\nb: 2\n", 1),
        ("a: 1\n  = 2\n", 2),
    ];
    for (text, line) in cases {
        match ConfigDocument::parse(text) {
            Err(PatchError::Parse { line: got, .. }) => assert_eq!(got, line, "{:?}", text),
            other => panic!("expected parse error for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn invalid_field_paths() {
    for bad in ["", ".", "a..b", "a.", ".b"] {
        assert!(matches!(
            bad.parse::<FieldPath>(),
            Err(PatchError::InvalidPath(_))
        ));
    }
    assert_eq!(path("a.b.c").segments(), ["a", "b", "c"]);
}

#[test]
fn set_preserves_quoting() {
    let mut doc = ConfigDocument::parse("x: \"old\"\ny: 5\n").unwrap();
    doc.set(&path("x"), "new").unwrap();
    doc.set(&path("y"), "6").unwrap();
    assert_eq!(doc.text(), "x: \"new\"\ny: 6\n");
}

#[test]
fn set_escapes_quote_characters() {
    let mut doc = ConfigDocument::parse("p: \"a\"\n").unwrap();
    doc.set(&path("p"), r#"C:\data "v2""#).unwrap();
    assert_eq!(doc.get(&path("p")).unwrap(), r#""C:\\data \"v2\"""#);
}

#[test]
fn set_then_get_roundtrip() {
    let mut doc = ConfigDocument::parse(SERVER_CONFIG).unwrap();
    for value in ["1", "250", "ASPECT_CENTER", "with spaces"] {
        doc.set(&path("net_config.data_aug_type"), value).unwrap();
        assert_eq!(doc.get(&path("net_config.data_aug_type")).unwrap(), value);
    }
    doc.set(&path("server_config.server_endpoint"), "tcp://0.0.0.0:6000")
        .unwrap();
    assert_eq!(
        doc.get(&path("server_config.server_endpoint")).unwrap(),
        "\"tcp://0.0.0.0:6000\""
    );
    // untouched neighbours keep their values
    assert_eq!(doc.get(&path("model_config.max_retrieved")).unwrap(), "50");
}

#[test]
fn set_rejects_multiline_and_missing_fields() {
    let mut doc = ConfigDocument::parse("size: 5\n").unwrap();
    assert!(matches!(
        doc.set(&path("size"), "1\n2"),
        Err(PatchError::InvalidValue { .. })
    ));
    assert!(matches!(
        doc.set(&path("colour"), "blue"),
        Err(PatchError::FieldNotFound { .. })
    ));
    assert_eq!(doc.text(), "size: 5\n");
}

#[test]
fn set_unquoted_reads_back_or_falls_back_to_quotes() {
    let mut doc = ConfigDocument::parse("size: 5\nnext: 1\n").unwrap();
    doc.set(&path("size"), "-1").unwrap();
    assert_eq!(doc.get(&path("size")).unwrap(), "-1");

    for (value, stored) in [
        ("", "\"\""),
        ("a#b", "\"a#b\""),
        ("a}b", "\"a}b\""),
        ("x\"y", "\"x\\\"y\""),
        (" padded ", "\" padded \""),
    ] {
        let mut doc = ConfigDocument::parse("size: 5\nnext: 1\n").unwrap();
        doc.set(&path("size"), value).unwrap();
        assert_eq!(doc.get(&path("size")).unwrap(), stored, "value {:?}", value);
        assert_eq!(doc.get(&path("next")).unwrap(), "1");
    }
}

#[test]
fn set_inside_block_keeps_structure() {
    let mut doc = ConfigDocument::parse("a {\n  size: 5\n}\nb {\n  size: 6\n}\n").unwrap();
    doc.set(&path("a.size"), "x}").unwrap();
    assert_eq!(doc.text(), "a {\n  size: \"x}\"\n}\nb {\n  size: 6\n}\n");
    assert_eq!(doc.get(&path("b.size")).unwrap(), "6");
    assert_eq!(doc.fields().len(), 2);
}

#[test]
fn size_and_color_scenario() {
    let mut doc = ConfigDocument::parse("size: 5\ncolor: \"red\"\n").unwrap();
    assert_eq!(doc.get(&path("size")).unwrap(), "5");
    doc.set(&path("color"), "blue").unwrap();
    assert_eq!(doc.get(&path("color")).unwrap(), "\"blue\"");
    assert_eq!(doc.into_text(), "size: 5\ncolor: \"blue\"\n");
}
