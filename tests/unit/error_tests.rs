use alert_genius::AppError;

#[test]
fn display_prefixes_each_kind() {
    let cases = [
        (AppError::Config("bad".into()), "config: bad"),
        (AppError::Validation("bad".into()), "validation: bad"),
        (AppError::NotFound("alert x".into()), "not found: alert x"),
        (AppError::AlreadyConsumed("log y".into()), "already consumed: log y"),
        (AppError::Generation("timeout".into()), "generation: timeout"),
        (AppError::Http("bind".into()), "http: bind"),
        (AppError::Io("disk".into()), "io: disk"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn io_errors_convert() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, AppError::Io(msg) if msg == "gone"));
}

#[test]
fn toml_errors_become_config_errors() {
    let parse: Result<toml::Value, _> = toml::from_str("= nope");
    let err: AppError = parse.unwrap_err().into();
    assert!(matches!(err, AppError::Config(msg) if msg.starts_with("invalid config:")));
}
