//! Global type registry.
//!
//! One registry is shared by every file model for the duration of a run. It
//! records every message and enum across the whole descriptor set, keyed by
//! fully qualified name, along with each file's package identity. Types must
//! be registered before any method referencing them is resolved; the
//! generator enforces that barrier.

use crate::package::PackageIdentity;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto};
use std::collections::{BTreeMap, BTreeSet};

/// One declared field of a registered message.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Declared field name
    pub name: String,
    /// Wire type of the field
    pub kind: Type,
    /// Qualified type name for message/enum fields, empty otherwise
    pub type_name: String,
    /// Whether the field is repeated
    pub repeated: bool,
}

impl FieldInfo {
    fn from_descriptor(desc: &FieldDescriptorProto) -> Self {
        FieldInfo {
            name: desc.name().to_string(),
            kind: desc.r#type(),
            type_name: desc.type_name().to_string(),
            repeated: desc.label() == Label::Repeated,
        }
    }
}

/// A registered message or enum type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    qualified_name: String,
    file: String,
    fields: Vec<FieldInfo>,
    required_files: BTreeSet<String>,
    referenced_by: BTreeSet<String>,
}

impl TypeEntry {
    /// Fully qualified name, without a leading dot.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Name of the file that defines this type.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Declared fields, in declaration order; empty for enums.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Files that must be imported to reference this type: the defining file
    /// plus, after dependency resolution, the files its fields pull in.
    pub fn required_files(&self) -> &BTreeSet<String> {
        &self.required_files
    }

    /// Files whose methods reference this type.
    pub fn referenced_by(&self) -> &BTreeSet<String> {
        &self.referenced_by
    }
}

/// Run-scoped table of every type and file identity in the descriptor set.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeEntry>,
    files: BTreeMap<String, PackageIdentity>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Record a file's derived package identity.
    pub fn register_file(&mut self, file: &str, identity: PackageIdentity) {
        self.files.insert(file.to_string(), identity);
    }

    /// Package identity of a previously registered file.
    pub fn file_identity(&self, file: &str) -> Option<&PackageIdentity> {
        self.files.get(file)
    }

    /// Register a message declared in `file`, recursing into nested messages
    /// and enums. `prefix` is the enclosing scope (proto package for
    /// top-level messages).
    pub fn register_message(&mut self, prefix: &str, desc: &DescriptorProto, file: &str) {
        let qualified = qualify(prefix, desc.name());
        let fields = desc.field.iter().map(FieldInfo::from_descriptor).collect();
        self.insert(qualified.clone(), file, fields);
        for nested in &desc.nested_type {
            self.register_message(&qualified, nested, file);
        }
        for nested in &desc.enum_type {
            self.register_enum(&qualified, nested, file);
        }
    }

    /// Register an enum declared in `file`.
    pub fn register_enum(&mut self, prefix: &str, desc: &EnumDescriptorProto, file: &str) {
        let qualified = qualify(prefix, desc.name());
        self.insert(qualified, file, Vec::new());
    }

    fn insert(&mut self, qualified: String, file: &str, fields: Vec<FieldInfo>) {
        if self.types.contains_key(&qualified) {
            // Qualified names are unique across a run; keep the first entry.
            tracing::debug!(name = %qualified, "duplicate type registration ignored");
            return;
        }
        let mut required_files = BTreeSet::new();
        required_files.insert(file.to_string());
        self.types.insert(
            qualified.clone(),
            TypeEntry {
                qualified_name: qualified,
                file: file.to_string(),
                fields,
                required_files,
                referenced_by: BTreeSet::new(),
            },
        );
    }

    /// Look up a type by qualified name; a leading dot is tolerated.
    pub fn lookup(&self, qualified_name: &str) -> Option<&TypeEntry> {
        self.types.get(qualified_name.trim_start_matches('.'))
    }

    /// Record that `file` references the given type.
    pub fn mark_referenced(&mut self, qualified_name: &str, file: &str) {
        if let Some(entry) = self.types.get_mut(qualified_name.trim_start_matches('.')) {
            entry.referenced_by.insert(file.to_string());
        }
    }

    /// Propagate field-type dependencies: a message that embeds a type from
    /// another file also requires that file's import. Runs to a fixpoint so
    /// chains of embedded types are covered. Must run after every file has
    /// been ingested.
    pub fn resolve_field_dependencies(&mut self) {
        loop {
            let mut additions: Vec<(String, Vec<String>)> = Vec::new();
            for (name, entry) in &self.types {
                for field in &entry.fields {
                    if field.type_name.is_empty() {
                        continue;
                    }
                    if let Some(dep) = self.lookup(&field.type_name) {
                        let missing: Vec<String> = dep
                            .required_files
                            .difference(&entry.required_files)
                            .cloned()
                            .collect();
                        if !missing.is_empty() {
                            additions.push((name.clone(), missing));
                        }
                    }
                }
            }
            if additions.is_empty() {
                break;
            }
            for (name, files) in additions {
                if let Some(entry) = self.types.get_mut(&name) {
                    entry.required_files.extend(files);
                }
            }
        }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            field: fields,
            ..Default::default()
        }
    }

    fn message_field(name: &str, type_name: &str) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            r#type: Some(Type::Message as i32),
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register_message("bob", &message("Bob", vec![]), "bob.proto");

        let entry = registry.lookup("bob.Bob").unwrap();
        assert_eq!(entry.qualified_name(), "bob.Bob");
        assert_eq!(entry.file(), "bob.proto");
        assert!(entry.required_files().contains("bob.proto"));
    }

    #[test]
    fn test_lookup_tolerates_leading_dot() {
        let mut registry = TypeRegistry::new();
        registry.register_message("bob", &message("Bob", vec![]), "bob.proto");
        assert!(registry.lookup(".bob.Bob").is_some());
    }

    #[test]
    fn test_lookup_miss() {
        let registry = TypeRegistry::new();
        assert!(registry.lookup(".missing.Type").is_none());
    }

    #[test]
    fn test_nested_types_are_registered() {
        let mut registry = TypeRegistry::new();
        let outer = DescriptorProto {
            name: Some("Outer".to_string()),
            nested_type: vec![message("Inner", vec![])],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Kind".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        registry.register_message("pkg", &outer, "pkg.proto");

        assert!(registry.lookup("pkg.Outer").is_some());
        assert!(registry.lookup("pkg.Outer.Inner").is_some());
        assert!(registry.lookup("pkg.Outer.Kind").is_some());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = TypeRegistry::new();
        registry.register_message("bob", &message("Bob", vec![]), "a.proto");
        registry.register_message("bob", &message("Bob", vec![]), "b.proto");
        assert_eq!(registry.lookup("bob.Bob").unwrap().file(), "a.proto");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mark_referenced_accumulates() {
        let mut registry = TypeRegistry::new();
        registry.register_message("bob", &message("Bob", vec![]), "bob.proto");
        registry.mark_referenced(".bob.Bob", "svc.proto");
        registry.mark_referenced(".bob.Bob", "svc.proto");
        registry.mark_referenced(".bob.Bob", "other.proto");

        let referenced = registry.lookup("bob.Bob").unwrap().referenced_by();
        assert_eq!(referenced.len(), 2);
        assert!(referenced.contains("svc.proto"));
    }

    #[test]
    fn test_field_dependencies_propagate_transitively() {
        let mut registry = TypeRegistry::new();
        registry.register_message("a", &message("A", vec![]), "a.proto");
        registry.register_message(
            "b",
            &message("B", vec![message_field("a", ".a.A")]),
            "b.proto",
        );
        registry.register_message(
            "c",
            &message("C", vec![message_field("b", ".b.B")]),
            "c.proto",
        );
        registry.resolve_field_dependencies();

        let c = registry.lookup("c.C").unwrap();
        assert!(c.required_files().contains("c.proto"));
        assert!(c.required_files().contains("b.proto"));
        assert!(c.required_files().contains("a.proto"));
    }
}
