//! Generation pipeline.
//!
//! One request is processed in a single pass: every file descriptor is
//! ingested into a file model sharing one type registry, then — only after
//! ingestion has finished for the whole batch — each file resolves its
//! import requirements, and finally the renderer produces output for the
//! direct targets. The first error aborts the run; no partial output is
//! returned alongside a failure.

use crate::error::Result;
use crate::file::SchemaFile;
use crate::options;
use crate::registry::TypeRegistry;
use crate::render::Renderer;
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use std::collections::HashSet;

/// Decode a request from raw bytes, derive the enabled-service set from its
/// options and parameter, and run generation.
pub fn generate_from_bytes(input: &[u8]) -> Result<CodeGeneratorResponse> {
    let request = CodeGeneratorRequest::decode(input)?;
    let enabled = options::enabled_services(input)?;
    generate(&request, &enabled)
}

/// Run the pipeline over an already decoded request.
///
/// `enabled` is the opaque predicate input: the fully qualified names of
/// services whose methods are generation candidates.
pub fn generate(
    request: &CodeGeneratorRequest,
    enabled: &HashSet<String>,
) -> Result<CodeGeneratorResponse> {
    let renderer = Renderer::new();
    let mut registry = TypeRegistry::new();

    let targets: HashSet<&str> = request
        .file_to_generate
        .iter()
        .map(String::as_str)
        .collect();

    // One file model per distinct descriptor name; later duplicates ignored.
    let mut files: Vec<SchemaFile> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for desc in &request.proto_file {
        if !seen.insert(desc.name().to_string()) {
            continue;
        }
        let is_dependency = !targets.contains(desc.name());
        files.push(SchemaFile::new(desc.clone(), is_dependency));
    }

    tracing::debug!(
        files = files.len(),
        targets = targets.len(),
        "ingesting descriptor set"
    );

    for file in &mut files {
        file.ingest(&mut registry, enabled)?;
    }
    registry.resolve_field_dependencies();

    for file in &mut files {
        file.resolve_imports(&mut registry)?;
    }

    let mut generated = Vec::new();
    for file in files.iter().filter(|f| !f.is_dependency()) {
        let content = renderer.render(file, &registry)?;
        generated.push(File {
            name: Some(file.generated_file_name()),
            content: Some(content),
            ..Default::default()
        });
    }

    Ok(CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: generated,
        ..Default::default()
    })
}
