use super::*;

#[test]
fn parse_roster_reads_canonical_entries() {
    let text = r#"[
        {"id":"A","identity":{"username":"ann","avatar_ref":"a1"},"position":{"x":0,"y":0}},
        {"id":"B","identity":{"username":"bo","avatar_ref":"b1"},"position":{"x":10,"y":10}}
    ]"#;
    let store = parse_roster(text).expect("roster");
    let ids: Vec<&str> = store.entries().map(|(id, _)| id).collect();
    assert_eq!(ids, ["A", "B"]);
    assert_eq!(store.get("B").map(|m| m.position), Some(Position::new(10.0, 10.0)));
}

#[test]
fn parse_roster_reads_legacy_entries() {
    let text = r#"[{"user":{"id":"313","username":"elly","avatar":"f00"},"position":{"x":4,"y":2}}]"#;
    let store = parse_roster(text).expect("roster");
    let member = store.get("313").expect("member");
    assert_eq!(member.identity.username, "elly");
    assert_eq!(member.identity.avatar_ref, "f00");
    assert_eq!(member.position, Position::new(4.0, 2.0));
}

#[test]
fn parse_roster_rejects_entry_without_position() {
    let text = r#"[{"id":"A","identity":{"username":"ann","avatar_ref":"a1"}}]"#;
    assert!(matches!(parse_roster(text), Err(RosterError::Json(_))));
}

#[test]
fn parse_roster_rejects_duplicates() {
    let text = r#"[
        {"id":"A","identity":{"username":"ann","avatar_ref":"a1"},"position":{"x":0,"y":0}},
        {"user":{"id":"A","username":"ann2"},"position":{"x":1,"y":1}}
    ]"#;
    assert!(matches!(parse_roster(text), Err(RosterError::Store(StoreError::DuplicateMember(_)))));
}

#[test]
fn load_roster_reports_missing_file() {
    let path = std::env::temp_dir().join("alignment-roster-does-not-exist.json");
    let err = load_roster(&path).expect_err("missing file");
    assert!(matches!(err, RosterError::Io { .. }));
    assert!(err.to_string().contains("alignment-roster-does-not-exist.json"));
}

#[test]
fn load_roster_reads_file() {
    let path = std::env::temp_dir().join(format!("alignment-roster-{}.json", std::process::id()));
    std::fs::write(&path, r#"[{"id":"A","identity":{"username":"ann","avatar_ref":"a1"},"position":{"x":3,"y":4}}]"#)
        .expect("write roster");
    let store = load_roster(&path).expect("roster");
    std::fs::remove_file(&path).expect("cleanup");
    assert_eq!(store.get("A").map(|m| m.position), Some(Position::new(3.0, 4.0)));
}
