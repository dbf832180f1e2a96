//! Service enablement.
//!
//! Only services that opt in produce generated code. The opt-in is the
//! custom bool extension `spanner_queries.enabled` on
//! `google.protobuf.ServiceOptions`. Extension values survive only in the
//! unknown fields of the typed request, so the descriptor pool is decoded
//! from the raw request bytes rather than rebuilt from `prost-types`
//! structs. The plugin parameter can force services on with
//! `enable=<fully.qualified.Service>` entries.

use crate::error::Result;
use prost::Message;
use prost_reflect::DescriptorPool;
use std::collections::HashSet;

/// Fully qualified name of the service opt-in extension.
pub const SERVICE_ENABLED_EXTENSION: &str = "spanner_queries.enabled";

/// Partial mirror of `CodeGeneratorRequest` that keeps file descriptors as
/// raw bytes so extension data is preserved for the descriptor pool.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    /// Files the compiler asked us to generate for
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Plugin parameter string
    #[prost(string, optional, tag = "2")]
    pub parameter: ::core::option::Option<::prost::alloc::string::String>,
    /// Undecoded file descriptors
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// Compute the set of enabled fully qualified service names for a request.
pub fn enabled_services(input: &[u8]) -> Result<HashSet<String>> {
    let raw = RawCodeGeneratorRequest::decode(input)?;

    let mut enabled = HashSet::new();
    if let Some(parameter) = raw.parameter.as_deref() {
        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if let Some(name) = part.strip_prefix("enable=") {
                enabled.insert(name.to_string());
            }
        }
    }

    let pool = build_descriptor_pool(&raw)?;
    match pool.get_extension_by_name(SERVICE_ENABLED_EXTENSION) {
        Some(ext) => {
            for service in pool.services() {
                let options = service.options();
                if options.has_extension(&ext)
                    && options.get_extension(&ext).as_bool().unwrap_or(false)
                {
                    enabled.insert(service.full_name().to_string());
                }
            }
        }
        None => {
            tracing::debug!(
                extension = SERVICE_ENABLED_EXTENSION,
                "opt-in extension not present in descriptor set"
            );
        }
    }

    tracing::debug!(services = enabled.len(), "computed enabled service set");
    Ok(enabled)
}

fn build_descriptor_pool(request: &RawCodeGeneratorRequest) -> Result<DescriptorPool> {
    let set = RawFileDescriptorSet {
        file: request.proto_file.clone(),
    };
    Ok(DescriptorPool::decode(set.encode_to_vec().as_slice())?)
}
