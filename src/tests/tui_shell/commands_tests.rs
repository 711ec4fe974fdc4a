use super::*;

#[test]
fn parses_version_commands() {
    assert_eq!(
        parse_command(":select latest").unwrap(),
        Command::Select(VersionToken::Latest)
    );
    assert_eq!(
        parse_command("v 3").unwrap(),
        Command::Select(VersionToken::Ordinal(3))
    );
    assert_eq!(parse_command("default 2").unwrap(), Command::MakeDefault(2));
    assert_eq!(
        parse_command(r#"comment 2 "first draft" ok"#).unwrap(),
        Command::Comment(2, "first draft ok".to_string())
    );
    assert_eq!(
        parse_command("login alice s3cret").unwrap(),
        Command::Login {
            user: "alice".into(),
            token: "s3cret".into(),
        }
    );
}

#[test]
fn reports_usage_and_unknown_commands() {
    let err = parse_command("login alice").unwrap_err().to_string();
    assert_eq!(err, "usage: login USER TOKEN");
    assert!(parse_command("hide two").is_err());
    assert!(parse_command("frobnicate").is_err());
    assert!(parse_command("select \"latest").is_err());
    assert!(parse_command("").is_err());
}

#[test]
fn suggestions_prefer_exact_then_prefix() {
    let names: Vec<&str> = suggestions("h").iter().map(|d| d.name).collect();
    assert_eq!(names[0], "help");
    assert!(names.contains(&"hide"));
    assert!(names.contains(&"hidden"));
    assert!(suggestions("save now").is_empty());
}
