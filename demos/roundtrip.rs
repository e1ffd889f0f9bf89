//! Compiles a schema, builds a query frame for a (mode, pid), and — if a
//! response payload is given — builds the matching response frame and
//! decodes it back to an SI value. Mirrors the query/response/parse loop
//! the original project's own `test/can.c` exercised, re-expressed as a
//! binary instead of a test file.

use clap::Parser;
use obdcodec::{Context, Frame};

/// Parses a decimal or `0x`-prefixed hex integer, matching the same
/// convention the schema format itself uses for mode/pid keys.
fn parse_int<T>(s: &str) -> Result<T, String>
where
    T: TryFrom<u32>,
{
    let trimmed = s.trim();
    let hex = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"));
    let value = match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => trimmed.parse::<u32>(),
    }
    .map_err(|e| e.to_string())?;
    T::try_from(value).map_err(|_| format!("`{s}` out of range"))
}

#[derive(Parser)]
#[command(about = "Round-trip an OBD-II query/response through a schema")]
struct Args {
    /// Path to a schema YAML file.
    #[arg(long)]
    schema: String,

    /// OBD-II mode, e.g. 1 or 0x01.
    #[arg(long, value_parser = parse_int::<u8>)]
    mode: u8,

    /// OBD-II parameter id, e.g. 12 or 0x0c.
    #[arg(long, value_parser = parse_int::<u16>)]
    pid: u16,

    /// Response payload bytes, hex-encoded, e.g. 4d82.
    #[arg(long)]
    payload: Option<String>,
}

fn print_frame(label: &str, frame: &Frame) {
    println!(
        "{label}: id=0x{:03x} dlc={} data={:02x?}",
        frame.id, frame.dlc, frame.data
    );
}

fn decode_hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("invalid hex payload"))
        .collect()
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let ctx = match Context::compile(&args.schema) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("failed to compile schema: {err}");
            std::process::exit(1);
        }
    };

    let query = match ctx.make_query(args.mode, args.pid) {
        Ok(frame) => frame,
        Err(err) => {
            eprintln!("failed to build query: {err}");
            std::process::exit(1);
        }
    };
    print_frame("query", &query);

    let Some(payload_hex) = args.payload else {
        return;
    };
    let payload = decode_hex(&payload_hex);

    let response = match ctx.make_response(args.mode, args.pid, &payload) {
        Ok(frame) => frame,
        Err(err) => {
            eprintln!("failed to build response: {err}");
            std::process::exit(1);
        }
    };
    print_frame("response", &response);

    match ctx.parse_response(&response) {
        Ok(value) => println!("decoded value: {value}"),
        Err(err) => {
            eprintln!("failed to parse response: {err}");
            std::process::exit(1);
        }
    }
}
