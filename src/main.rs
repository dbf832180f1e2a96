//! protoc-gen-spanner-queries
//!
//! A protoc plugin that generates Spanner query builders from service method
//! names. Reads a `CodeGeneratorRequest` from stdin and writes a
//! `CodeGeneratorResponse` to stdout, following the protoc plugin protocol.
//!
//! Usage:
//!   protoc --spanner-queries_out=. --spanner-queries_opt=enable=pkg.Service proto/*.proto

use protoc_gen_spanner_queries::{generator, runtime};
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the response; diagnostics go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = runtime::run(generator::generate_from_bytes) {
        eprintln!("protoc-gen-spanner-queries: {e}");
        std::process::exit(1);
    }
}
