//! # Wire Format Expectations
//!
//! Exact byte layouts for schemas given in their JSON descriptor form. These
//! pin the format itself, independent of round-trip behaviour: word-group
//! order, fold order, endianness, varint tiers, mask chunking.

use packbytes::{Codec, Value};

fn codec(schema: &str) -> Codec {
    Codec::builder()
        .parse(schema)
        .unwrap_or_else(|e| panic!("schema {schema} rejected: {e}"))
}

fn json(text: &str) -> Value {
    Value::from_json(&serde_json::from_str(text).unwrap())
}

fn encode(schema: &str, data: &str) -> Vec<u8> {
    let mut codec = codec(schema);
    let value = json(data);
    let bytes = codec.encode(&value).unwrap().to_vec();
    assert_eq!(codec.decode(&bytes).unwrap(), value, "round trip of {data}");
    bytes
}

#[test]
fn packed_byte_then_plain_string() {
    let bytes = encode(
        r#"{"a": {"_type": "bits", "val": 3}, "b": {"_type": "bool"}, "c": {"_type": "string"}}"#,
        r#"{"a": 5, "b": true, "c": "hi"}"#,
    );
    assert_eq!(bytes, [0x0B, 0x02, b'h', b'i']);
}

#[test]
fn sixteen_bit_groups_precede_thirty_two_bit_groups() {
    let bytes = encode(
        r#"{
            "a": {"_type": "bits", "val": 3},
            "b": {"_type": "bool"},
            "c": {"_type": "bits", "val": 12},
            "d": {"_type": "bits", "val": 12},
            "e": {"_type": "bits", "val": 9}
        }"#,
        r#"{"a": 5, "b": true, "c": 2748, "d": 291, "e": 511}"#,
    );
    // u16 [e], then u32 [c d a b]
    assert_eq!(bytes, [0xFF, 0x01, 0x3B, 0x12, 0xBC, 0x0A]);
}

#[test]
fn split_word_emits_eight_bit_group_first() {
    let bytes = encode(
        r#"{
            "w": {"_type": "bits", "val": 10},
            "x": {"_type": "bits", "val": 6},
            "y": {"_type": "bits", "val": 4},
            "z": {"_type": "bits", "val": 2}
        }"#,
        r#"{"w": 1023, "x": 42, "y": 9, "z": 2}"#,
    );
    // u8 [y z], then u16 [w x]
    assert_eq!(bytes, [0x26, 0xEA, 0xFF]);
}

#[test]
fn plain_fields_follow_words_in_declaration_order() {
    let bytes = encode(
        r#"{
            "n": {"_type": "varint"},
            "flag": {"_type": "bool"},
            "wide": {"_type": "bits", "val": 32},
            "name": {"_type": "string"}
        }"#,
        r#"{"n": 200, "flag": true, "wide": 1, "name": "x"}"#,
    );
    assert_eq!(bytes, [0x01, 0x88, 0x03, 0x01, 0x00, 0x00, 0x00, 0x01, b'x']);
}

#[test]
fn varint_boundaries() {
    let schema = r#"{"_type": "varint"}"#;
    assert_eq!(encode(schema, "127"), [0x7F]);
    assert_eq!(encode(schema, "128"), [0x80, 0x02]);
    assert_eq!(encode(schema, "16383"), [0xBF, 0xFF]);
    assert_eq!(encode(schema, "16384"), [0xC0, 0x00, 0x01, 0x00]);
    assert_eq!(encode(schema, "1073741823"), [0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn floats_and_dates_are_little_endian() {
    assert_eq!(encode(r#"{"_type": "float", "val": 32}"#, "1.5"), [0x00, 0x00, 0xC0, 0x3F]);
    assert_eq!(
        encode(r#"{"_type": "float", "val": 64}"#, "-2.0"),
        [0, 0, 0, 0, 0, 0, 0, 0xC0]
    );

    let mut codec = codec(r#"{"_type": "date", "val": 32}"#);
    assert_eq!(codec.encode(&Value::Date(1.5)).unwrap(), &[0x00, 0x00, 0xC0, 0x3F]);
}

#[test]
fn enum_strings_store_indexes() {
    let schema = r#"{"_type": "string", "val": ["str1", "str2"]}"#;
    assert_eq!(encode(schema, r#""str2""#), [2]);
    assert_eq!(encode(schema, r#""""#), [0]);
}

#[test]
fn dense_array_of_two_bit_values() {
    let bytes = encode(
        r#"{"_type": "array", "val": {"_type": "bits", "val": 2}}"#,
        "[1, 2, 3, 0, 1, 2, 3, 0, 1]",
    );
    assert_eq!(bytes, [0x09, 0x6C, 0x6C, 0x01]);
}

#[test]
fn dense_array_of_three_bit_values_uses_sixteen_bit_words() {
    let bytes = encode(
        r#"{"_type": "array", "val": {"_type": "bits", "val": 3}, "length": 6}"#,
        "[7, 0, 7, 0, 7, 1]",
    );
    // five per u16: 111 000 111 000 111 = 0x71C7, then the partial word 001
    assert_eq!(bytes, [0xC7, 0x71, 0x01, 0x00]);
}

#[test]
fn fixed_array_has_no_length_prefix() {
    let bytes = encode(
        r#"{"_type": "array", "val": {"_type": "string"}, "length": 2}"#,
        r#"["a", ""]"#,
    );
    assert_eq!(bytes, [0x01, b'a', 0x00]);
}

#[test]
fn select_one_and_select_many() {
    let variants = r#"{"s1": null, "s2": {"_type": "bits", "val": 3}}"#;
    let one = format!(r#"{{"_type": "selectOne", "val": {variants}}}"#);
    let many = format!(r#"{{"_type": "selectMany", "val": {variants}}}"#);

    assert_eq!(encode(&one, r#"{"s2": 3}"#), [0x01, 0x03]);
    assert_eq!(encode(&one, r#"{"s1": null}"#), [0x00]);
    assert_eq!(encode(&many, r#"{"s2": 3}"#), [0x02, 0x03]);
    assert_eq!(encode(&many, r#"{"s1": null, "s2": 3}"#), [0x03, 0x03]);
}

#[test]
fn blob_prefixes() {
    let mut prefixed = codec(r#"{"_type": "blob"}"#);
    let bytes = prefixed.encode(&json("[0, 1]")).unwrap().to_vec();
    assert_eq!(bytes, [0x02, 0x00, 0x01]);
    assert_eq!(prefixed.decode(&bytes).unwrap(), Value::Blob(vec![0, 1]));

    let mut fixed = codec(r#"{"_type": "blob", "val": 3}"#);
    assert_eq!(fixed.encode(&Value::Blob(vec![9])).unwrap(), &[9, 0, 0]);
}
