//! Fuzz testing for encode/decode round trips.
//!
//! Arbitrary records are encoded against a fixed schema that exercises every
//! layout path (packed words, plain fields, dense and plain arrays, both
//! variant kinds) and must decode back to the same value.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use packbytes::config::VARINT_MAX;
use packbytes::{Descriptor, Value};

#[derive(Debug, Arbitrary)]
struct Record {
    flag: bool,
    small: u8,
    wide: u32,
    count: u32,
    ratio: f32,
    name: String,
    payload: Vec<u8>,
    levels: Vec<u8>,
    ids: Vec<u32>,
    pick: Option<u16>,
    extras: (Option<bool>, Option<String>),
}

impl Record {
    fn to_value(&self) -> Value {
        let pick = match self.pick {
            Some(n) => Value::object([("some", Value::Int(n as i64 % 1024))]),
            None => Value::object([("none", Value::Null)]),
        };
        let mut extras = Vec::new();
        if let Some(b) = self.extras.0 {
            extras.push(("on", Value::Bool(b)));
        }
        if let Some(s) = &self.extras.1 {
            extras.push(("note", Value::from(s.as_str())));
        }
        let ratio = if self.ratio.is_finite() { self.ratio } else { 0.0 };

        Value::object([
            ("flag", Value::Bool(self.flag)),
            ("small", Value::Int((self.small % 32) as i64)),
            ("wide", Value::Int(self.wide as i64)),
            ("count", Value::Int((self.count % (VARINT_MAX + 1)) as i64)),
            ("ratio", Value::Float(ratio as f64)),
            ("name", Value::from(self.name.as_str())),
            ("payload", Value::Blob(self.payload.clone())),
            ("levels", Value::array(self.levels.iter().map(|l| Value::Int((l % 8) as i64)))),
            ("ids", Value::array(self.ids.iter().map(|&i| Value::Int((i % (VARINT_MAX + 1)) as i64)))),
            ("pick", pick),
            ("extras", Value::object(extras)),
        ])
    }
}

fn schema() -> Descriptor {
    Descriptor::object([
        ("flag", Descriptor::Bool),
        ("small", Descriptor::bits(5)),
        ("wide", Descriptor::bits(32)),
        ("count", Descriptor::Varint),
        ("ratio", Descriptor::float(32)),
        ("name", Descriptor::string()),
        ("payload", Descriptor::blob()),
        ("levels", Descriptor::array(Descriptor::bits(3))),
        ("ids", Descriptor::array(Descriptor::Varint)),
        (
            "pick",
            Descriptor::select_one([("none", Descriptor::Null), ("some", Descriptor::bits(10))]),
        ),
        (
            "extras",
            Descriptor::select_many([("on", Descriptor::Bool), ("note", Descriptor::string())]),
        ),
    ])
}

fuzz_target!(|record: Record| {
    let Ok(mut codec) = packbytes::compile(&schema()) else {
        return;
    };
    let value = record.to_value();
    let bytes = codec.encode(&value).expect("valid record encodes").to_vec();
    let decoded = codec.decode(&bytes).expect("encoded record decodes");
    assert_eq!(decoded, value);
});
