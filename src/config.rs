//! Compile-time configuration (§4.9).

/// Default directory `Context::compile` resolves bare schema filenames
/// against. Override at build time by exporting `OBDCODEC_SCHEMA_DIR`
/// before invoking `cargo build`.
pub const DEFAULT_SCHEMA_DIR: &str = match option_env!("OBDCODEC_SCHEMA_DIR") {
    Some(dir) => dir,
    None => "/etc/obdcodec/schemas",
};
