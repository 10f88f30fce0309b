//! Tests for the codec module

use std::sync::Arc;

use super::*;
use crate::config::{MAX_ZERO_WIDTH_ELEMENTS, VARINT_MAX};
use crate::encoding::encode_varint;

fn codec(descriptor: Descriptor) -> Codec {
    compile(&descriptor).unwrap()
}

fn round_trip(codec: &mut Codec, value: &Value) -> Value {
    let bytes = codec.encode(value).unwrap().to_vec();
    codec.decode(&bytes).unwrap()
}

fn sample_object() -> Descriptor {
    Descriptor::object([
        ("a", Descriptor::bits(3)),
        ("b", Descriptor::Bool),
        ("c", Descriptor::string()),
    ])
}

#[test]
fn object_packs_narrow_fields_into_leading_byte() {
    let mut codec = codec(sample_object());
    let value = Value::object([("a", 5.into()), ("b", true.into()), ("c", "hi".into())]);

    let bytes = codec.encode(&value).unwrap();
    assert_eq!(bytes, &[0b1011, 0x02, b'h', b'i']);

    let decoded = codec.decode(&[0b1011, 0x02, b'h', b'i']).unwrap();
    let keys: Vec<&str> = decoded.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(decoded, value);
}

#[test]
fn decoded_object_follows_declaration_order_not_input_order() {
    let mut codec = codec(sample_object());
    let value = Value::object([("c", "x".into()), ("b", false.into()), ("a", 1.into())]);

    let decoded = round_trip(&mut codec, &value);
    let keys: Vec<&str> = decoded.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn bits_round_trip_extremes_for_every_width() {
    for width in 1..=32u32 {
        let mut codec = codec(Descriptor::bits(width));
        let max = ((1u64 << width) - 1) as i64;
        for value in [0, max] {
            assert_eq!(round_trip(&mut codec, &Value::Int(value)), Value::Int(value), "bits({width})");
        }
    }
}

#[test]
fn standalone_bits_use_little_endian_words() {
    let mut codec = codec(Descriptor::bits(16));
    assert_eq!(codec.encode(&Value::Int(0x1234)).unwrap(), &[0x34, 0x12]);

    let mut codec = super::compile(&Descriptor::bits(32)).unwrap();
    assert_eq!(
        codec.encode(&Value::Int(4_294_967_295)).unwrap(),
        &[0xFF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn varint_tiers_on_the_wire() {
    let mut codec = codec(Descriptor::Varint);
    let cases: [(i64, usize); 6] = [
        (0, 1),
        (127, 1),
        (128, 2),
        (16383, 2),
        (16384, 4),
        (VARINT_MAX as i64, 4),
    ];
    for (value, len) in cases {
        let bytes = codec.encode(&Value::Int(value)).unwrap().to_vec();
        assert_eq!(bytes.len(), len, "varint {value}");
        assert_eq!(codec.decode(&bytes).unwrap(), Value::Int(value));
    }
}

#[test]
fn varint_above_maximum_is_rejected() {
    let mut codec = codec(Descriptor::Varint);
    let err = codec.encode(&Value::Int(1_073_741_824)).unwrap_err();
    assert_eq!(err, EncodeError::VarintOverflow(1_073_741_824));
}

#[test]
fn negative_varint_encodes_as_zero() {
    let mut codec = codec(Descriptor::Varint);
    assert_eq!(codec.encode(&Value::Int(-9)).unwrap(), &[0]);
}

#[test]
fn enum_string_encodes_index() {
    let mut codec = codec(Descriptor::enumeration(["a", "b"]));
    assert_eq!(codec.encode(&"b".into()).unwrap(), &[2]);
    assert_eq!(codec.encode(&"".into()).unwrap(), &[0]);
    assert_eq!(codec.encode(&"zz".into()).unwrap(), &[0]);
    assert_eq!(round_trip(&mut codec, &"b".into()), Value::from("b"));
}

#[test]
fn enum_index_out_of_range_decodes_as_empty_string() {
    let codec = codec(Descriptor::enumeration(["a"]));
    assert_eq!(codec.decode(&[7]).unwrap(), Value::from(""));
}

#[test]
fn empty_string_is_a_single_zero_byte() {
    let mut codec = codec(Descriptor::string());
    assert_eq!(codec.encode(&"".into()).unwrap(), &[0]);
}

#[test]
fn floats_round_trip_at_their_width() {
    let mut codec = codec(Descriptor::float(16));
    assert_eq!(codec.encode(&Value::Float(1.0)).unwrap(), &[0x00, 0x3C]);
    assert_eq!(round_trip(&mut codec, &Value::Float(0.5)), Value::Float(0.5));

    let mut codec = super::compile(&Descriptor::float(32)).unwrap();
    assert_eq!(round_trip(&mut codec, &Value::Float(1.25)), Value::Float(1.25));

    let mut codec = super::compile(&Descriptor::float(64)).unwrap();
    assert_eq!(
        round_trip(&mut codec, &Value::Float(std::f64::consts::PI)),
        Value::Float(std::f64::consts::PI)
    );
}

#[test]
fn integer_input_is_accepted_for_floats_and_dates() {
    let mut codec = codec(Descriptor::float(32));
    assert_eq!(round_trip(&mut codec, &Value::Int(3)), Value::Float(3.0));

    let mut codec = super::compile(&Descriptor::Date(None)).unwrap();
    let millis = 1_700_000_000_000i64;
    assert_eq!(round_trip(&mut codec, &Value::Int(millis)), Value::Date(millis as f64));
}

#[test]
fn date_precision_sets_byte_width() {
    let mut codec = codec(Descriptor::date(32));
    assert_eq!(codec.encode(&Value::Date(1.5)).unwrap().len(), 4);

    let mut codec = super::compile(&Descriptor::Date(None)).unwrap();
    assert_eq!(codec.encode(&Value::Date(1.5)).unwrap().len(), 8);
}

#[test]
fn fixed_blob_pads_and_truncates() {
    let mut codec = codec(Descriptor::fixed_blob(3));
    assert_eq!(codec.encode(&Value::Blob(vec![0, 1])).unwrap(), &[0, 1, 0]);
    assert_eq!(codec.encode(&Value::Blob(vec![1, 2, 3, 4])).unwrap(), &[1, 2, 3]);
    assert_eq!(codec.decode(&[0, 1, 2]).unwrap(), Value::Blob(vec![0, 1, 2]));
}

#[test]
fn variable_blob_has_length_prefix() {
    let mut codec = codec(Descriptor::blob());
    assert_eq!(codec.encode(&Value::Blob(vec![0, 1])).unwrap(), &[2, 0, 1]);
    assert_eq!(
        codec.encode(&Value::array([Value::Int(7), Value::Int(255)])).unwrap(),
        &[2, 7, 255]
    );
    assert_eq!(codec.encode(&"ab".into()).unwrap(), &[2, b'a', b'b']);
}

#[test]
fn blob_rejects_non_byte_integers() {
    let mut codec = codec(Descriptor::blob());
    let err = codec.encode(&Value::array([Value::Int(256)])).unwrap_err();
    assert!(matches!(err, EncodeError::TypeMismatch { expected: "byte", .. }));
}

#[test]
fn dense_array_uses_varint_length_and_shared_words() {
    let mut codec = codec(Descriptor::array(Descriptor::bits(2)));
    let value = Value::array([1, 2, 3, 0, 1, 2, 3, 0, 1].map(Value::Int));

    let bytes = codec.encode(&value).unwrap().to_vec();
    assert_eq!(bytes, vec![9, 0b0110_1100, 0b0110_1100, 0b01]);
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn dense_arrays_round_trip_partial_words_for_every_packable_width() {
    for width in [1u32, 2, 3, 4, 5, 6, 9, 10] {
        let mut codec = codec(Descriptor::array(Descriptor::bits(width)));
        let modulus = 1i64 << width;
        for len in 0..=12i64 {
            let value = Value::array((0..len).map(|i| Value::Int((i * 7 + 3) % modulus)));
            assert_eq!(round_trip(&mut codec, &value), value, "bits({width}) x {len}");
        }
    }
}

#[test]
fn fixed_bool_array_packs_into_one_byte() {
    let mut codec = codec(Descriptor::fixed_array(Descriptor::Bool, 3));
    let value = Value::array([true, false, true].map(Value::Bool));
    assert_eq!(codec.encode(&value).unwrap(), &[0b101]);
    assert_eq!(round_trip(&mut codec, &value), value);
}

#[test]
fn enum_arrays_are_dense() {
    let mut codec = codec(Descriptor::array(Descriptor::enumeration(["x", "y", "z"])));
    let value = Value::array(["x", "z", "", "y"].map(Value::from));
    // 4 entries of 2 bits fit one byte after the length prefix
    assert_eq!(codec.encode(&value).unwrap().len(), 2);
    assert_eq!(round_trip(&mut codec, &value), value);
}

#[test]
fn fixed_array_length_mismatch_is_rejected() {
    let mut codec = codec(Descriptor::fixed_array(Descriptor::bits(3), 3));
    let err = codec
        .encode(&Value::array([Value::Int(1), Value::Int(2)]))
        .unwrap_err();
    assert_eq!(err, EncodeError::LengthMismatch { expected: 3, actual: 2 });
}

#[test]
fn wide_element_arrays_encode_each_element() {
    let mut codec = codec(Descriptor::array(Descriptor::bits(12)));
    let value = Value::array([Value::Int(4095), Value::Int(1)]);
    assert_eq!(codec.encode(&value).unwrap(), &[2, 0xFF, 0x0F, 0x01, 0x00]);
    assert_eq!(round_trip(&mut codec, &value), value);
}

#[test]
fn packed_value_out_of_range_names_the_field() {
    let mut codec = codec(sample_object());
    let value = Value::object([("a", 8.into())]);
    let err = codec.encode(&value).unwrap_err();
    assert_eq!(
        err,
        EncodeError::OutOfRange {
            field: "a".to_string(),
            value: 8,
            max: 7
        }
    );
    assert_eq!(err.to_string(), "field \"a\" with value 8 out of range [0 - 7]");
}

#[test]
fn negative_packed_value_is_out_of_range() {
    let mut codec = codec(sample_object());
    let err = codec.encode(&Value::object([("a", (-1).into())])).unwrap_err();
    assert!(matches!(err, EncodeError::OutOfRange { value: -1, .. }));
}

#[test]
fn missing_fields_encode_defaults() {
    let mut codec = codec(Descriptor::object([
        ("a", Descriptor::bits(3)),
        ("s", Descriptor::string()),
        ("list", Descriptor::array(Descriptor::bits(3))),
        ("pair", Descriptor::fixed_array(Descriptor::Bool, 2)),
        ("inner", Descriptor::object([("x", Descriptor::Varint)])),
        ("when", Descriptor::Date(None)),
    ]));

    let decoded = round_trip(&mut codec, &Value::object::<&str, _>([]));
    assert_eq!(
        decoded,
        Value::object([
            ("a", Value::Int(0)),
            ("s", Value::from("")),
            ("list", Value::array([])),
            ("pair", Value::array([Value::Bool(false), Value::Bool(false)])),
            ("inner", Value::object([("x", Value::Int(0))])),
            ("when", Value::Date(0.0)),
        ])
    );
}

#[test]
fn type_mismatch_reports_both_kinds() {
    let mut codec = codec(Descriptor::string());
    let err = codec.encode(&Value::Int(3)).unwrap_err();
    assert_eq!(
        err,
        EncodeError::TypeMismatch {
            expected: "string",
            found: "int"
        }
    );
}

#[test]
fn select_one_writes_index_then_payload() {
    let mut codec = codec(Descriptor::select_one([
        ("s1", Descriptor::Null),
        ("s2", Descriptor::bits(3)),
    ]));
    let value = Value::object([("s2", 3.into())]);
    assert_eq!(codec.encode(&value).unwrap(), &[1, 3]);
    assert_eq!(round_trip(&mut codec, &value), value);

    let value = Value::object([("s1", Value::Null)]);
    assert_eq!(codec.encode(&value).unwrap(), &[0]);
    assert_eq!(round_trip(&mut codec, &value), value);
}

#[test]
fn select_one_with_several_keys_uses_the_first() {
    let mut codec = codec(Descriptor::select_one([
        ("s1", Descriptor::Null),
        ("s2", Descriptor::bits(3)),
    ]));
    let value = Value::object([("s2", 3.into()), ("s1", Value::Null)]);
    let decoded = round_trip(&mut codec, &value);
    assert_eq!(decoded, Value::object([("s2", 3.into())]));
}

#[test]
fn select_one_errors() {
    let mut codec = codec(Descriptor::select_one([("s1", Descriptor::Null)]));
    assert_eq!(
        codec.encode(&Value::object::<&str, _>([])).unwrap_err(),
        EncodeError::EmptySelection
    );
    assert_eq!(
        codec.encode(&Value::object([("nope", Value::Null)])).unwrap_err(),
        EncodeError::UnknownVariant("nope".to_string())
    );
}

#[test]
fn select_one_rejects_out_of_range_index_on_decode() {
    let codec = codec(Descriptor::select_one([
        ("s1", Descriptor::Null),
        ("s2", Descriptor::Null),
    ]));
    let err = codec.decode(&[5]).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn select_many_writes_mask_then_present_payloads() {
    let mut codec = codec(Descriptor::select_many([
        ("s1", Descriptor::Null),
        ("s2", Descriptor::bits(3)),
    ]));
    let value = Value::object([("s2", 3.into())]);
    assert_eq!(codec.encode(&value).unwrap(), &[0b10, 3]);
    assert_eq!(round_trip(&mut codec, &value), value);

    let none = Value::object::<&str, _>([]);
    assert_eq!(codec.encode(&none).unwrap(), &[0]);
    assert_eq!(round_trip(&mut codec, &none), none);
}

#[test]
fn select_many_splits_masks_into_chunks_of_thirty_two() {
    let variants: Vec<(String, Descriptor)> = (0..40)
        .map(|i| (format!("v{i}"), Descriptor::bits(6)))
        .collect();
    let mut codec = codec(Descriptor::SelectMany(variants));

    let value = Value::object([("v0", 1.into()), ("v35", 2.into())]);
    let bytes = codec.encode(&value).unwrap().to_vec();
    assert_eq!(bytes, vec![0x01, 0x00, 0x00, 0x00, 0x08, 1, 2]);
    assert_eq!(codec.decode(&bytes).unwrap(), value);

    let all = Value::Object((0..40).map(|i| (format!("v{i}"), Value::Int(i % 64))).collect());
    assert_eq!(round_trip(&mut codec, &all), all);
}

#[test]
fn select_many_rejects_unknown_variant() {
    let mut codec = codec(Descriptor::select_many([("a", Descriptor::Null)]));
    let err = codec.encode(&Value::object([("b", Value::Null)])).unwrap_err();
    assert_eq!(err, EncodeError::UnknownVariant("b".to_string()));
}

#[test]
fn truncated_input_is_an_error() {
    let codec = codec(Descriptor::string());
    assert!(codec.decode(&[5, b'a']).is_err());
    assert!(codec.decode(&[]).is_err());
}

#[test]
fn huge_count_of_zero_width_elements_is_an_error() {
    let codec = codec(Descriptor::array(Descriptor::object::<&str, _>([])));
    let err = codec.decode(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
    assert!(err.to_string().contains("zero-width"), "{err}");

    let codec = self::codec(Descriptor::array(Descriptor::Null));
    assert!(codec.decode(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
}

#[test]
fn zero_width_elements_round_trip_up_to_the_limit() {
    let mut codec = codec(Descriptor::array(Descriptor::Null));
    let value = Value::array([Value::Null, Value::Null, Value::Null]);
    assert_eq!(codec.encode(&value).unwrap(), &[0x03]);
    assert_eq!(round_trip(&mut codec, &value), value);

    let mut bytes = [0u8; 4];
    encode_varint(MAX_ZERO_WIDTH_ELEMENTS as u32, &mut bytes);
    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.as_array().map(<[Value]>::len), Some(MAX_ZERO_WIDTH_ELEMENTS));

    encode_varint(MAX_ZERO_WIDTH_ELEMENTS as u32 + 1, &mut bytes);
    assert!(codec.decode(&bytes).is_err());
}

#[test]
fn zero_width_limit_is_shared_by_nested_arrays() {
    let codec = codec(Descriptor::array(Descriptor::fixed_array(Descriptor::Null, 1000)));
    assert!(codec.decode(&[10]).is_ok());
    assert!(codec.decode(&[100]).is_err());
}

#[test]
fn invalid_utf8_is_an_error() {
    let codec = codec(Descriptor::string());
    assert!(codec.decode(&[2, 0xFF, 0xFE]).is_err());
}

#[test]
fn encoding_past_initial_buffer_grows_it() {
    let mut codec = Codec::builder()
        .buffer_size(4)
        .compile(&Descriptor::string())
        .unwrap();
    let text = "x".repeat(1000);

    let bytes = codec.encode(&Value::from(text.as_str())).unwrap().to_vec();
    assert_eq!(bytes.len(), 1002);
    assert!(codec.buffer_capacity() >= 1002);
    assert_eq!(codec.decode(&bytes).unwrap(), Value::from(text.as_str()));
}

#[test]
fn buffer_is_reused_across_encodes() {
    let mut codec = codec(Descriptor::string());
    assert_eq!(codec.encode(&"long value".into()).unwrap().len(), 11);
    assert_eq!(codec.encode(&"a".into()).unwrap(), &[1, b'a']);
}

#[test]
fn shared_schema_encodes_identically() {
    let schema = Arc::new(schema::compile(&sample_object()).unwrap());
    let mut first = Codec::new(Arc::clone(&schema));
    let mut second = Codec::builder().buffer_size(8).build(Arc::clone(&schema));
    let value = Value::object([("a", 2.into()), ("b", false.into()), ("c", "ok".into())]);

    let owned = schema.encode_to_vec(&value).unwrap();
    assert_eq!(first.encode(&value).unwrap(), owned.as_slice());
    assert_eq!(second.encode(&value).unwrap(), owned.as_slice());
    assert_eq!(schema.decode(&owned).unwrap(), value);
}

#[test]
fn builder_parses_json_descriptors() {
    let mut codec = Codec::builder()
        .parse(r#"{"id": {"_type": "varint"}, "ok": {"_type": "bool"}}"#)
        .unwrap();
    let value = Value::object([("id", 300.into()), ("ok", true.into())]);
    assert_eq!(codec.encode(&value).unwrap(), &[0x01, 0xAC, 0x04]);
}

#[test]
fn compiled_schema_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledSchema>();
    assert_send_sync::<Codec>();
}
