//! Fuzz testing for the decoder.
//!
//! Builds an arbitrary schema, compiles it, and decodes arbitrary bytes
//! against it. Schemas the compiler rejects are skipped; every decode must
//! return a value or an error without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use packbytes::Descriptor;

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    schema: FuzzDescriptor,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum FuzzDescriptor {
    Null,
    Bool,
    Bits(u8),
    Varint,
    Float(u8),
    Date(Option<u8>),
    Text,
    Enum(Vec<String>),
    Blob(Option<u8>),
    Array(Box<FuzzDescriptor>, Option<u8>),
    Object(Vec<(String, FuzzDescriptor)>),
    SelectOne(Vec<(String, FuzzDescriptor)>),
    SelectMany(Vec<(String, FuzzDescriptor)>),
}

impl FuzzDescriptor {
    fn into_descriptor(self, depth: usize) -> Option<Descriptor> {
        if depth > 4 {
            return None;
        }
        let fields = |fields: Vec<(String, FuzzDescriptor)>| -> Option<Vec<(String, Descriptor)>> {
            fields
                .into_iter()
                .take(48)
                .map(|(name, d)| d.into_descriptor(depth + 1).map(|d| (name, d)))
                .collect()
        };
        Some(match self {
            FuzzDescriptor::Null => Descriptor::Null,
            FuzzDescriptor::Bool => Descriptor::Bool,
            FuzzDescriptor::Bits(w) => Descriptor::bits(w as u32),
            FuzzDescriptor::Varint => Descriptor::Varint,
            FuzzDescriptor::Float(w) => Descriptor::float(w as u32),
            FuzzDescriptor::Date(p) => Descriptor::Date(p.map(u32::from)),
            FuzzDescriptor::Text => Descriptor::string(),
            FuzzDescriptor::Enum(values) => Descriptor::enumeration(values),
            FuzzDescriptor::Blob(None) => Descriptor::blob(),
            FuzzDescriptor::Blob(Some(n)) => Descriptor::fixed_blob(n as usize),
            FuzzDescriptor::Array(element, length) => {
                let element = element.into_descriptor(depth + 1)?;
                match length {
                    Some(n) => Descriptor::fixed_array(element, (n % 16) as usize),
                    None => Descriptor::array(element),
                }
            }
            FuzzDescriptor::Object(f) => Descriptor::Object(fields(f)?),
            FuzzDescriptor::SelectOne(f) => Descriptor::SelectOne(fields(f)?),
            FuzzDescriptor::SelectMany(f) => Descriptor::SelectMany(fields(f)?),
        })
    }
}

fuzz_target!(|input: DecodeInput| {
    let Some(descriptor) = input.schema.into_descriptor(0) else {
        return;
    };
    let Ok(codec) = packbytes::compile(&descriptor) else {
        return;
    };
    let _ = codec.decode(&input.data);
});
