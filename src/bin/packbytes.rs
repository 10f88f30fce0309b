//! # packbytes CLI Entry Point
//!
//! Encodes JSON data against a JSON schema descriptor, decodes hex back to
//! JSON, and prints compiled layouts.
//!
//! ## Usage
//!
//! ```bash
//! # Encode data.json, printing hex
//! packbytes encode schema.json data.json
//!
//! # Decode hex, printing JSON
//! packbytes decode schema.json 0b026869
//!
//! # Show the compiled layout and word-groups
//! packbytes plan schema.json
//! ```
//!
//! Set `PACKBYTES_LOG=debug` (or `trace`) to see compiler and buffer events
//! on stderr.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use eyre::{bail, ensure, Result, WrapErr};
use packbytes::{schema, CompiledSchema, Descriptor, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PACKBYTES_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .try_init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" => print_usage(),
        "--version" | "-v" => println!("packbytes {}", env!("CARGO_PKG_VERSION")),
        "encode" => {
            let [schema_path, data_path] = operands::<2>(&args, "encode <SCHEMA> <DATA>")?;
            let schema = load_schema(schema_path)?;
            let text = fs::read_to_string(data_path)
                .wrap_err_with(|| format!("failed to read data file {:?}", data_path))?;
            let json: serde_json::Value = serde_json::from_str(&text)
                .wrap_err_with(|| format!("data file {:?} is not valid JSON", data_path))?;
            let bytes = schema.encode_to_vec(&Value::from_json(&json))?;
            println!("{}", to_hex(&bytes));
        }
        "decode" => {
            let [schema_path, hex] = operands::<2>(&args, "decode <SCHEMA> <HEX>")?;
            let schema = load_schema(schema_path)?;
            let bytes = from_hex(hex)?;
            let value = schema.decode(&bytes).wrap_err("failed to decode input")?;
            println!("{}", serde_json::to_string_pretty(&value.to_json())?);
        }
        "plan" => {
            let [schema_path] = operands::<1>(&args, "plan <SCHEMA>")?;
            println!("{}", load_schema(schema_path)?);
        }
        arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
        other => bail!("Unknown command: {}", other),
    }
    Ok(())
}

fn operands<'a, const N: usize>(args: &'a [String], usage: &str) -> Result<[&'a str; N]> {
    let rest: Vec<&str> = args[1..].iter().map(String::as_str).collect();
    match <[&str; N]>::try_from(rest) {
        Ok(operands) => Ok(operands),
        Err(_) => bail!("usage: packbytes {}", usage),
    }
}

fn load_schema(path: impl AsRef<Path>) -> Result<CompiledSchema> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read schema file {:?}", path))?;
    let descriptor = Descriptor::parse(&text)
        .wrap_err_with(|| format!("invalid schema in {:?}", path))?;
    Ok(schema::compile(&descriptor)?)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

fn from_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    ensure!(text.is_ascii(), "hex input contains non-ASCII characters");
    ensure!(text.len() % 2 == 0, "hex input has odd length {}", text.len());
    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16)
                .wrap_err_with(|| format!("invalid hex byte {:?} at offset {}", &text[i..i + 2], i))
        })
        .collect()
}

fn print_usage() {
    println!("packbytes - Schema-driven compact binary serialization");
    println!();
    println!("USAGE:");
    println!("    packbytes <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    encode <SCHEMA> <DATA>    Encode a JSON data file, print hex");
    println!("    decode <SCHEMA> <HEX>     Decode hex bytes, print JSON");
    println!("    plan <SCHEMA>             Print the compiled layout");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help                Print help information");
    println!("    -v, --version             Print version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    PACKBYTES_LOG             Log filter, e.g. debug or packbytes=trace");
    println!();
    println!("EXAMPLES:");
    println!("    packbytes encode schema.json data.json");
    println!("    packbytes decode schema.json 0b026869");
}
