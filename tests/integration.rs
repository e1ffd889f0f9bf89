use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;

use obdcodec::frame::{self, PAD_BYTE};
use obdcodec::{Context, Error};

struct Fixture {
    path: PathBuf,
}

impl Fixture {
    fn new(contents: &str, name: &str) -> Self {
        let mut path = std::env::temp_dir();
        path.push(format!("obdcodec-it-{}-{}.yaml", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        Self { path }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

const SCHEMA: &str = r#"
endian: big
modepid:
  0x01:
    0x0c:
      name: Engine RPM
      bytes: 2
      raw-unit: rpm
      si-unit: rad/s
      expr: { type: float, val: "(256*A + B) / 4" }
    0x0d:
      name: Vehicle Speed
      bytes: 1
      raw-unit: km/h
      si-unit: m/s
      expr: { type: float, val: "A" }
    0x0f:
      name: Intake Air Temperature
      bytes: 1
      raw-unit: celsius
      si-unit: K
      expr: { type: float, val: "A" }
    0x10:
      name: MAF
      bytes: 2
      raw-unit: g/s
      si-unit: kg/s
      expr: { type: float, val: "(256*A + B) / 100" }
"#;

#[test]
fn scenario_query_maf() {
    let fixture = Fixture::new(SCHEMA, "query-maf");
    let ctx = Context::compile(&fixture.path).unwrap();
    let query = ctx.make_query(0x01, 0x10).unwrap();
    assert_eq!(query.id, 0x7DF);
    assert_eq!(query.dlc, 8);
    assert_eq!(query.data, [2, 0x01, 0x10, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC]);
}

#[test]
fn scenario_response_and_parse_maf() {
    let fixture = Fixture::new(SCHEMA, "response-maf");
    let ctx = Context::compile(&fixture.path).unwrap();
    let response = ctx.make_response(0x01, 0x10, &[0xCD, 0xAB]).unwrap();
    assert_eq!(response.id, 0x7E8);
    assert_eq!(
        response.data,
        [4, 0x41, 0x10, 0xCD, 0xAB, 0xCC, 0xCC, 0xCC]
    );

    let (mode, pid) = ctx.parse_headers(&response).unwrap();
    assert_eq!((mode, pid), (0x01, 0x10));

    let value = ctx.parse_response(&response).unwrap();
    assert!((value - 0.526_51).abs() < 1e-3);
}

#[test]
fn scenario_rpm_conversion() {
    let fixture = Fixture::new(SCHEMA, "rpm");
    let ctx = Context::compile(&fixture.path).unwrap();
    let response = ctx.make_response(0x01, 0x0c, &[77, 130]).unwrap();
    let value = ctx.parse_response(&response).unwrap();
    assert!((value - 519.462_345).abs() < 1e-2);
}

#[test]
fn scenario_speed_conversion() {
    let fixture = Fixture::new(SCHEMA, "speed");
    let ctx = Context::compile(&fixture.path).unwrap();
    let response = ctx.make_response(0x01, 0x0d, &[60]).unwrap();
    let value = ctx.parse_response(&response).unwrap();
    assert!((value - 16.666_666).abs() < 1e-3);
}

#[test]
fn scenario_mismatched_pci_length_is_invalid_data_bytes() {
    let fixture = Fixture::new(SCHEMA, "bad-pci");
    let ctx = Context::compile(&fixture.path).unwrap();
    let mut response = ctx.make_response(0x01, 0x10, &[0xCD, 0xAB]).unwrap();
    response.data[0] = 1;
    assert!(matches!(
        ctx.parse_response(&response),
        Err(Error::Codec(obdcodec::CodecError::InvalidDataBytes { .. }))
    ));
}

#[test]
fn round_trip_header_across_mode_classes() {
    let fixture = Fixture::new(SCHEMA, "header-rt");
    let ctx = Context::compile(&fixture.path).unwrap();
    for (mode, pid) in [(0x01u8, 0x0cu16), (0x01, 0x0d), (0x22, 0x1234)] {
        let query = frame::make_query_noctx(ctx.big_endian(), mode, pid).unwrap();
        let (m, p) = frame::parse_headers_noctx(&query, ctx.big_endian()).unwrap();
        assert_eq!((m, p), (mode, pid));
    }
}

#[test]
fn context_free_functions_match_context_methods() {
    let fixture = Fixture::new(SCHEMA, "ctxfree");
    let ctx = Context::compile(&fixture.path).unwrap();

    let via_ctx = ctx.make_query(0x01, 0x0c).unwrap();
    let via_free = frame::make_query_noctx(ctx.big_endian(), 0x01, 0x0c).unwrap();
    assert_eq!(via_ctx.data, via_free.data);
    assert_eq!(via_ctx.id, via_free.id);

    let via_ctx = ctx.make_response(0x01, 0x0c, &[1, 2]).unwrap();
    let via_free = frame::make_response_noctx(ctx.big_endian(), 0x01, 0x0c, &[1, 2]).unwrap();
    assert_eq!(via_ctx.data, via_free.data);
}

#[test]
fn padding_is_always_the_pad_byte() {
    let fixture = Fixture::new(SCHEMA, "padding");
    let ctx = Context::compile(&fixture.path).unwrap();
    let query = ctx.make_query(0x01, 0x0d).unwrap();
    assert!(query.data[3..].iter().all(|&b| b == PAD_BYTE));
}

#[test]
fn for_each_matches_pid_count_and_break_stops_early() {
    let fixture = Fixture::new(SCHEMA, "foreach");
    let ctx = Context::compile(&fixture.path).unwrap();

    let mut total = 0;
    ctx.for_each(|_, _, _| {
        total += 1;
        ControlFlow::Continue(())
    });
    assert_eq!(total, ctx.pid_count());

    let mut seen = 0;
    ctx.for_each(|_, _, _| {
        seen += 1;
        ControlFlow::Break(())
    });
    assert_eq!(seen, 1);
}

#[test]
fn compile_drop_loop_does_not_panic() {
    let fixture = Fixture::new(SCHEMA, "drop-loop");
    for _ in 0..16 {
        let ctx = Context::compile(&fixture.path).unwrap();
        assert_eq!(ctx.pid_count(), 4);
    }
}

#[test]
fn bare_filename_without_separator_resolves_against_default_dir() {
    let err = Context::compile("engine.yaml").unwrap_err();
    assert!(matches!(err, Error::Schema(obdcodec::SchemaError::CannotOpenFile(_))));
}
