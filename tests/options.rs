//! Integration tests for compile options loaded from TOML

use pretty_assertions::assert_eq;
use stache::{CompileOptions, OptionsError, Partials, TemplateCache, Value};

#[test]
fn test_options_from_file() {
    let path = std::env::temp_dir().join(format!("stache-options-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        tags = ["<%", "%>"]
        file = "mail.txt"
        preserve_whitespace = true
        partial_depth_limit = 4
        "#,
    )
    .expect("Should write options file");

    let options = CompileOptions::from_file(&path).expect("Should load options");
    std::fs::remove_file(&path).ok();

    assert_eq!(options.file_label(), "mail.txt");
    assert_eq!(options.partial_depth_limit, 4);

    let template = TemplateCache::new()
        .compile("Dear <%name%>,\n  <%#ps%>\nP.S.\n  <%/ps%>\n", &options)
        .expect("Should compile");
    let view = Value::from_iter([("name", Value::from("Kim")), ("ps", Value::from(true))]);
    assert_eq!(
        template.render(&view, &Partials::new()).unwrap(),
        "Dear Kim,\n  \nP.S.\n  \n"
    );
}

#[test]
fn test_missing_options_file() {
    let result = CompileOptions::from_file(std::path::Path::new("/nonexistent/stache.toml"));
    assert!(matches!(result, Err(OptionsError::IoError(_))));
}

#[test]
fn test_invalid_tags_in_toml() {
    let result = CompileOptions::from_toml_str(r#"tags = ["<% %>", "x"]"#);
    assert!(result.is_err());
}

#[test]
fn test_diagnostics_use_configured_file() {
    let options = CompileOptions::from_toml_str(r#"file = "views/broken.mustache""#)
        .expect("Should parse options");
    let err = TemplateCache::new()
        .compile("{{#open}}", &options)
        .expect_err("Should fail");
    assert_eq!(err.location.file, "views/broken.mustache");
}
