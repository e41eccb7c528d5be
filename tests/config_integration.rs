use std::path::PathBuf;

use zenmark::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".zenmarkrc");
    let content = r"
# comment
--sync-preview

--theme light
   
--export-dir=exports
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.sync_preview);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.export_dir, Some(PathBuf::from("exports")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".zenmarkrc");
    let content = "--no-watch\n--theme light\n--state-file shared.json\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "zenmark".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--no-persist".to_string(),
        "notes.md".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.no_watch, "file flags should remain enabled");
    assert!(effective.no_persist, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.state_file,
        Some(PathBuf::from("shared.json")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "zenmark".to_string(),
        "--theme=dark".to_string(),
        "--debug-log=events.log".to_string(),
        "--log-file=zenmark.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    assert_eq!(flags.log_file, Some(PathBuf::from("zenmark.log")));
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        no_watch: true,
        sync_preview: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        no_persist: true,
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.no_watch);
    assert!(merged.sync_preview);
    assert!(merged.no_persist);
    assert!(merged.perf);
}
