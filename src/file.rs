//! Per-file model.
//!
//! A `SchemaFile` wraps one file descriptor from the request with the state
//! the pipeline accumulates for it: its enabled methods, its own import
//! table, and whether it is a direct generation target or was only pulled in
//! as a dependency.

use crate::error::{Error, Result};
use crate::imports::ImportTable;
use crate::method::MethodEntry;
use crate::package::PackageIdentity;
use crate::registry::TypeRegistry;
use prost_types::FileDescriptorProto;
use std::collections::HashSet;

/// Extension swap applied to input file names.
const PROTO_EXTENSION: &str = ".proto";
const GENERATED_EXTENSION: &str = ".persist.go";

/// One input schema file and the generation state attached to it.
#[derive(Debug)]
pub struct SchemaFile {
    desc: FileDescriptorProto,
    imports: ImportTable,
    methods: Vec<MethodEntry>,
    is_dependency: bool,
}

impl SchemaFile {
    /// Wrap a descriptor. `is_dependency` marks files that are present only
    /// because something they define is referenced.
    pub fn new(desc: FileDescriptorProto, is_dependency: bool) -> Self {
        SchemaFile {
            desc,
            imports: ImportTable::new(),
            methods: Vec::new(),
            is_dependency,
        }
    }

    /// Original descriptor file name.
    pub fn orig_name(&self) -> &str {
        self.desc.name()
    }

    /// Declared proto package.
    pub fn package(&self) -> &str {
        self.desc.package()
    }

    /// Generated file name: the schema extension replaced, nothing else.
    pub fn generated_file_name(&self) -> String {
        match self.desc.name().strip_suffix(PROTO_EXTENSION) {
            Some(stem) => format!("{stem}{GENERATED_EXTENSION}"),
            None => format!("{}{GENERATED_EXTENSION}", self.desc.name()),
        }
    }

    /// Derived package identity for this file.
    pub fn identity(&self) -> PackageIdentity {
        let package_override = self
            .desc
            .options
            .as_ref()
            .and_then(|opts| opts.go_package.as_deref());
        PackageIdentity::derive(package_override, self.desc.package())
    }

    /// Whether this file is only a transitive dependency.
    pub fn is_dependency(&self) -> bool {
        self.is_dependency
    }

    /// Enabled methods collected by `ingest`.
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Import table accumulated by `resolve_imports`.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Scan the descriptor: register every local message and enum with the
    /// registry, and collect the methods of enabled services.
    ///
    /// `enabled` holds fully qualified service names; methods of services not
    /// in the set are silently excluded. A method of an enabled service whose
    /// name fails the grammar is an error.
    pub fn ingest(&mut self, registry: &mut TypeRegistry, enabled: &HashSet<String>) -> Result<()> {
        registry.register_file(self.orig_name(), self.identity());

        for message in &self.desc.message_type {
            registry.register_message(self.desc.package(), message, self.desc.name());
        }
        for enum_desc in &self.desc.enum_type {
            registry.register_enum(self.desc.package(), enum_desc, self.desc.name());
        }

        for service in &self.desc.service {
            let full_name = if self.desc.package().is_empty() {
                service.name().to_string()
            } else {
                format!("{}.{}", self.desc.package(), service.name())
            };
            if !enabled.contains(&full_name) {
                continue;
            }
            for method in &service.method {
                self.methods.push(MethodEntry::from_descriptor(method)?);
            }
        }

        tracing::debug!(
            file = %self.orig_name(),
            methods = self.methods.len(),
            "ingested schema file"
        );
        Ok(())
    }

    /// Resolve this file's import requirements against the registry.
    ///
    /// For each enabled method's input and output type, every file that
    /// defines or transitively depends on the type — excluding this file —
    /// contributes its package identity to the import table. Must run only
    /// after `ingest` has completed for every file in the batch.
    pub fn resolve_imports(&mut self, registry: &mut TypeRegistry) -> Result<()> {
        let own_name = self.orig_name().to_string();
        let type_refs: Vec<String> = self
            .methods
            .iter()
            .flat_map(|m| [m.input_type().to_string(), m.output_type().to_string()])
            .collect();

        for type_ref in type_refs {
            let required: Vec<String> = match registry.lookup(&type_ref) {
                Some(entry) => entry.required_files().iter().cloned().collect(),
                None => {
                    return Err(Error::UnresolvedType {
                        qualified_name: type_ref.trim_start_matches('.').to_string(),
                        referrer: own_name,
                    })
                }
            };
            registry.mark_referenced(&type_ref, &own_name);

            for dep_file in required {
                if dep_file == own_name {
                    continue;
                }
                let identity = registry.file_identity(&dep_file).cloned().ok_or_else(|| {
                    Error::CodeGen(format!("no package identity recorded for file {dep_file}"))
                })?;
                self.imports.get_or_add(&identity.name, &identity.path);
            }
        }

        tracing::debug!(
            file = %own_name,
            imports = self.imports.len(),
            "resolved import table"
        );
        Ok(())
    }
}
