use super::*;

fn sample() -> MoveFrame {
    MoveFrame::new("A", Position::new(5.0, 5.0))
}

#[test]
fn encode_decode_round_trip_preserves_frame() {
    let frame = MoveFrame::new("313032054172549120", Position::new(12.5, -3.25));
    let text = encode(&frame).expect("encode");
    assert_eq!(decode(&text).expect("decode"), frame);
}

#[test]
fn encode_writes_flat_shape_only() {
    let text = encode(&sample()).expect("encode");
    let value: Value = serde_json::from_str(&text).expect("json");
    let obj = value.as_object().expect("object");
    assert_eq!(obj.len(), 2);
    assert_eq!(obj["id"], "A");
    assert_eq!(obj["position"]["x"].as_f64(), Some(5.0));
    assert_eq!(obj["position"]["y"].as_f64(), Some(5.0));
    assert!(!obj.contains_key("sid"));
    assert!(!obj.contains_key("user"));
}

#[test]
fn encode_rejects_non_finite_position() {
    let frame = MoveFrame::new("A", Position::new(f64::NAN, 1.0));
    assert!(matches!(encode(&frame), Err(CodecError::NonFinitePosition)));
    let frame = MoveFrame::new("A", Position::new(1.0, f64::INFINITY));
    assert!(matches!(encode(&frame), Err(CodecError::NonFinitePosition)));
}

#[test]
fn decode_accepts_integer_coordinates() {
    let frame = decode(r#"{"id":"B","position":{"x":1,"y":1}}"#).expect("decode");
    assert_eq!(frame, MoveFrame::new("B", Position::new(1.0, 1.0)));
}

#[test]
fn decode_normalizes_legacy_user_shape() {
    let text = r#"{"user":{"id":"B","username":"elly","avatar":"abc"},"position":{"x":3,"y":4},"sid":918273}"#;
    let frame = decode(text).expect("decode");
    assert_eq!(frame, MoveFrame::new("B", Position::new(3.0, 4.0)));
}

#[test]
fn decode_prefers_flat_id_over_user_id() {
    let text = r#"{"id":"flat","user":{"id":"nested"},"position":{"x":0,"y":0}}"#;
    assert_eq!(decode(text).expect("decode").id, "flat");
}

#[test]
fn decode_ignores_unknown_fields() {
    let text = r#"{"id":"A","position":{"x":1,"y":2,"z":9},"room":"default","sid":7}"#;
    assert_eq!(decode(text).expect("decode"), MoveFrame::new("A", Position::new(1.0, 2.0)));
}

#[test]
fn decode_rejects_invalid_json() {
    assert!(matches!(decode("not json"), Err(CodecError::Json(_))));
}

#[test]
fn decode_rejects_non_object() {
    assert!(matches!(decode(r#""not json""#), Err(CodecError::NotAnObject)));
    assert!(matches!(decode("[1,2]"), Err(CodecError::NotAnObject)));
}

#[test]
fn decode_rejects_missing_position() {
    assert!(matches!(decode(r#"{"id":"B"}"#), Err(CodecError::MissingField("position"))));
}

#[test]
fn decode_rejects_missing_id() {
    let err = decode(r#"{"position":{"x":1,"y":1}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::MissingField("id")));
}

#[test]
fn decode_rejects_non_string_id() {
    let err = decode(r#"{"id":42,"position":{"x":1,"y":1}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidField("id")));

    let err = decode(r#"{"user":{"id":42},"position":{"x":1,"y":1}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidField("user.id")));

    let err = decode(r#"{"user":"B","position":{"x":1,"y":1}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidField("user")));
}

#[test]
fn decode_rejects_malformed_position() {
    for text in [
        r#"{"id":"B","position":{"x":1}}"#,
        r#"{"id":"B","position":{"x":"1","y":2}}"#,
        r#"{"id":"B","position":null}"#,
        r#"{"id":"B","position":"1,2"}"#,
    ] {
        let err = decode(text).expect_err("should fail");
        assert!(matches!(err, CodecError::InvalidPosition(_)), "{text}: {err}");
    }
}

#[test]
fn codec_error_messages_name_the_field() {
    assert_eq!(CodecError::MissingField("position").to_string(), "missing field `position`");
    assert_eq!(CodecError::InvalidField("id").to_string(), "field `id` has the wrong type");
}
