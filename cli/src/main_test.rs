use super::*;
use client::{Identity, Member, MemberStore};

fn sample_view() -> View {
    let identity = |name: &str| Identity { username: name.into(), avatar_ref: format!("{name}-avatar") };
    let store = MemberStore::from_roster([
        Member::new("a", identity("ann"), Position::new(1.0, 2.0)),
        Member::new("b", identity("bob"), Position::new(3.0, 4.0)),
    ])
    .expect("unique roster");
    View { render_order: client::RenderOrder::from_store(&store), store, ..View::default() }
}

#[test]
fn parses_move_with_negative_coordinates() {
    let cli = Cli::try_parse_from(["alignment-cli", "--roster", "r.json", "move", "a", "-5", "12.5"])
        .expect("arguments should parse");
    assert_eq!(cli.roster, PathBuf::from("r.json"));
    match cli.command {
        Command::Move { id, x, y, connect_timeout_secs, linger_ms } => {
            assert_eq!(id, "a");
            assert!((x + 5.0).abs() < f64::EPSILON);
            assert!((y - 12.5).abs() < f64::EPSILON);
            assert_eq!(connect_timeout_secs, 10);
            assert_eq!(linger_ms, 250);
        }
        Command::Watch => panic!("expected move"),
    }
}

#[test]
fn parses_watch_with_host_override() {
    let cli = Cli::try_parse_from(["alignment-cli", "--roster", "r.json", "--host", "relay:9000", "watch"])
        .expect("arguments should parse");
    assert_eq!(cli.host.as_deref(), Some("relay:9000"));
    assert!(matches!(cli.command, Command::Watch));
}

#[test]
fn host_flag_overrides_config() {
    let config = client_config(Some("relay:9000".into()));
    assert_eq!(config.host, "relay:9000");
    assert!(config.endpoint().starts_with("ws://relay:9000/ws?sid="));
}

#[test]
fn snapshot_lists_members_in_roster_order() {
    let value = snapshot_json(&sample_view(), None);
    assert_eq!(value["state"], "Disconnected");
    assert_eq!(value["locked"], true);
    assert_eq!(value["top"], "b");
    assert_eq!(value["members"][0], json!({ "id": "a", "x": 1.0, "y": 2.0 }));
    assert_eq!(value["members"][1], json!({ "id": "b", "x": 3.0, "y": 4.0 }));
}

#[test]
fn snapshot_includes_avatar_urls_when_base_is_set() {
    let avatars = AvatarOptions { base: "https://cdn/avatars/".into(), size: 100 };
    let value = snapshot_json(&sample_view(), Some(&avatars));
    assert_eq!(value["members"][0]["avatar"], "https://cdn/avatars/a/ann-avatar.png?size=128");
    assert_eq!(value["members"][1]["avatar"], "https://cdn/avatars/b/bob-avatar.png?size=128");
}

#[test]
fn parses_avatar_options() {
    let cli = Cli::try_parse_from([
        "alignment-cli",
        "--roster",
        "r.json",
        "--avatar-base",
        "https://cdn/",
        "--avatar-size",
        "64",
        "watch",
    ])
    .expect("arguments should parse");
    assert_eq!(cli.avatar_base.as_deref(), Some("https://cdn/"));
    assert_eq!(cli.avatar_size, 64);
}
