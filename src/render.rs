//! Output rendering.
//!
//! A `Renderer` is a pure function from a fully ingested, import-resolved
//! file model to generated text: the same model always yields byte-identical
//! output. The template state is built once per run and passed explicitly to
//! keep rendering testable and safe across parallel invocations.

use crate::error::{Error, Result};
use crate::file::SchemaFile;
use crate::method::{to_upper_camel, MethodEntry, Verb};
use crate::registry::{FieldInfo, TypeRegistry};
use prost_types::field_descriptor_proto::Type;

/// Tool name stamped into the generated-file header.
const GENERATOR_NAME: &str = "protoc-gen-spanner-queries";

/// Compiled file template. Constructed once per run; read-only afterwards.
#[derive(Debug)]
pub struct Renderer {
    header: String,
}

impl Renderer {
    /// Compile the template.
    pub fn new() -> Self {
        Renderer {
            header: format!("// Code generated by {GENERATOR_NAME}. DO NOT EDIT.\n"),
        }
    }

    /// Render one generated file for a resolved schema file.
    pub fn render(&self, file: &SchemaFile, registry: &TypeRegistry) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.header);
        out.push_str(&format!("// source: {}\n", file.orig_name()));
        out.push('\n');
        out.push_str(&format!("package {}\n", file.identity().name));
        out.push('\n');
        out.push_str("import (\n");
        for entry in file.imports().iter() {
            out.push_str(&format!("\t{} \"{}\"\n", entry.name, entry.path));
        }
        out.push_str(")\n");

        if file.methods().is_empty() {
            return Ok(out);
        }

        out.push('\n');
        for method in file.methods() {
            let params = accessor_fields(method, registry, file.orig_name())?;
            match method.verb() {
                Verb::Insert => render_insert(&mut out, method, &params),
                Verb::Delete => render_delete(&mut out, method, &params),
                Verb::Select => render_select(&mut out, method, &params),
            }
        }
        out.push('\n');
        for method in file.methods() {
            let params = accessor_fields(method, registry, file.orig_name())?;
            render_params_interface(&mut out, method, &params);
        }

        Ok(out)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

/// The parameter-object fields a builder shape actually reads:
/// every field for inserts, the last field for range deletes, the first
/// repeated field (if any) for selects.
fn accessor_fields(
    method: &MethodEntry,
    registry: &TypeRegistry,
    referrer: &str,
) -> Result<Vec<FieldInfo>> {
    let entry = registry
        .lookup(method.input_type())
        .ok_or_else(|| Error::UnresolvedType {
            qualified_name: method.input_type().trim_start_matches('.').to_string(),
            referrer: referrer.to_string(),
        })?;

    match method.verb() {
        Verb::Insert => Ok(entry.fields().to_vec()),
        Verb::Delete => {
            let bound = entry.fields().last().cloned().ok_or_else(|| {
                Error::CodeGen(format!(
                    "delete builder {}: parameter type {} declares no fields",
                    method.name(),
                    entry.qualified_name()
                ))
            })?;
            Ok(vec![bound])
        }
        Verb::Select => Ok(entry
            .fields()
            .iter()
            .find(|f| f.repeated)
            .cloned()
            .into_iter()
            .collect()),
    }
}

fn render_insert(out: &mut String, method: &MethodEntry, fields: &[FieldInfo]) {
    let name = method.name();
    out.push_str(&format!(
        "func {name}(req {name}Params) *spanner.Mutation {{\n"
    ));
    out.push_str(&format!(
        "\treturn spanner.InsertMap(\"{}\", map[string]interface{{}}{{\n",
        method.table_name()
    ));
    let width = fields
        .iter()
        .map(|f| f.name.len() + 3) // two quotes and a colon
        .max()
        .unwrap_or(0);
    for field in fields {
        let key = format!("\"{}\":", field.name);
        out.push_str(&format!(
            "\t\t{key:<width$} req.Get{}(),\n",
            to_upper_camel(&field.name)
        ));
    }
    out.push_str("\t})\n}\n");
}

fn render_delete(out: &mut String, method: &MethodEntry, fields: &[FieldInfo]) {
    let name = method.name();
    let label = method.entity_label();
    // accessor_fields guarantees exactly one bound field for deletes
    let bound = fields
        .first()
        .map(|f| to_upper_camel(&f.name))
        .unwrap_or_default();
    out.push_str(&format!(
        "func {name}(req {name}Params) *spanner.Mutation {{\n"
    ));
    out.push_str(&format!(
        "\treturn spanner.Delete(\"{}\", spanner.KeyRange{{\n",
        method.table_name()
    ));
    out.push_str("\t\tStart: spanner.Key{\n");
    out.push_str(&format!("\t\t\t\"{label}\",\n"));
    out.push_str("\t\t},\n");
    out.push_str("\t\tEnd: spanner.Key{\n");
    out.push_str(&format!("\t\t\t\"{label}\",\n"));
    out.push_str(&format!("\t\t\treq.Get{bound}(),\n"));
    out.push_str("\t\t},\n");
    out.push_str("\t\tKind: spanner.ClosedOpen,\n");
    out.push_str("\t})\n}\n");
}

fn render_select(out: &mut String, method: &MethodEntry, fields: &[FieldInfo]) {
    let name = method.name();
    let table = method.table_name();
    out.push_str(&format!(
        "func {name}(req {name}Params) spanner.Statement {{\n"
    ));
    out.push_str("\treturn spanner.Statement{\n");
    match fields.first() {
        Some(field) => {
            let column = field.name.strip_suffix('s').unwrap_or(&field.name);
            out.push_str(&format!(
                "\t\tSQL: \"SELECT * FROM {table} WHERE {column} IN UNNEST(@{})\",\n",
                field.name
            ));
            out.push_str("\t\tParams: map[string]interface{}{\n");
            out.push_str(&format!(
                "\t\t\t\"@{}\": req.Get{}(),\n",
                field.name,
                to_upper_camel(&field.name)
            ));
            out.push_str("\t\t},\n");
        }
        None => {
            out.push_str(&format!("\t\tSQL:    \"SELECT * from {table}\",\n"));
            out.push_str("\t\tParams: map[string]interface{}{},\n");
        }
    }
    out.push_str("\t}\n}\n");
}

fn render_params_interface(out: &mut String, method: &MethodEntry, fields: &[FieldInfo]) {
    out.push_str(&format!("type {}Params interface {{\n", method.name()));
    for field in fields {
        out.push_str(&format!(
            "\tGet{}() {}\n",
            to_upper_camel(&field.name),
            go_type(field)
        ));
    }
    out.push_str("}\n");
}

/// Map a proto field to the accessor's declared type. Message, enum, and
/// group fields surface as `interface{}`.
fn go_type(field: &FieldInfo) -> String {
    let base = match field.kind {
        Type::Double => "float64",
        Type::Float => "float32",
        Type::Int64 | Type::Sfixed64 | Type::Sint64 => "int64",
        Type::Uint64 | Type::Fixed64 => "uint64",
        Type::Int32 | Type::Sfixed32 | Type::Sint32 => "int32",
        Type::Uint32 | Type::Fixed32 => "uint32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Bytes => "[]byte",
        Type::Message | Type::Enum | Type::Group => "interface{}",
    };
    if field.repeated {
        format!("[]{base}")
    } else {
        base.to_string()
    }
}
