//! Method name grammar.
//!
//! Service method names encode the desired database operation:
//! `<Type>From<Verb><Entity>Query`, e.g. `BobFromPutBobsQuery`. The left
//! segment names the parameter/result marker, the verb selects the builder
//! shape, and the remaining entity token supplies the target table and the
//! query's logical name. The first `From` occurrence is authoritative.

use crate::error::{Error, Result};
use prost_types::MethodDescriptorProto;

/// Builder shape selector, recognized as a method name prefix after `From`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `Put` / `Insert`: single-row insert from a field map
    Insert,
    /// `Delete`: half-open key-range deletion
    Delete,
    /// `Get` / `Select`: parameterized read statement
    Select,
}

/// Recognized verb spellings, tried in order against the post-`From` segment.
const VERBS: [(&str, Verb); 5] = [
    ("Put", Verb::Insert),
    ("Insert", Verb::Insert),
    ("Delete", Verb::Delete),
    ("Get", Verb::Select),
    ("Select", Verb::Select),
];

/// Structured result of parsing a method name against the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTokens {
    /// Left segment before `From` (the parameter/result marker)
    pub entity: String,
    /// Recognized verb
    pub verb: Verb,
    /// Entity token between the verb and the trailing `Query`
    pub query: String,
}

impl MethodTokens {
    /// Parse a declared method name.
    ///
    /// Rejects, with an error naming the method, any name that lacks `From`,
    /// has an empty left segment, does not start with a recognized verb after
    /// `From`, or does not end in a non-empty `<Entity>Query` token.
    pub fn parse(name: &str) -> Result<Self> {
        let split = name.find("From").ok_or_else(|| Error::MalformedMethodName {
            method: name.to_string(),
        })?;
        let entity = &name[..split];
        let segment = &name[split + "From".len()..];
        if entity.is_empty() || segment.is_empty() {
            return Err(Error::MalformedMethodName {
                method: name.to_string(),
            });
        }

        let (verb, rest) = VERBS
            .iter()
            .find_map(|(prefix, verb)| segment.strip_prefix(prefix).map(|rest| (*verb, rest)))
            .ok_or_else(|| Error::UnrecognizedVerb {
                method: name.to_string(),
                segment: segment.to_string(),
            })?;

        let query = rest
            .strip_suffix("Query")
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::MalformedMethodName {
                method: name.to_string(),
            })?;

        Ok(MethodTokens {
            entity: entity.to_string(),
            verb,
            query: query.to_string(),
        })
    }
}

/// One enabled service method, decomposed and ready for shape selection.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    name: String,
    tokens: MethodTokens,
    input_type: String,
    output_type: String,
}

impl MethodEntry {
    /// Build an entry from a method descriptor, parsing its declared name.
    pub fn from_descriptor(desc: &MethodDescriptorProto) -> Result<Self> {
        let tokens = MethodTokens::parse(desc.name())?;
        Ok(MethodEntry {
            name: desc.name().to_string(),
            tokens,
            input_type: desc.input_type().to_string(),
            output_type: desc.output_type().to_string(),
        })
    }

    /// Raw declared name, used as the generated function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed grammar tokens.
    pub fn tokens(&self) -> &MethodTokens {
        &self.tokens
    }

    /// Builder shape selector.
    pub fn verb(&self) -> Verb {
        self.tokens.verb
    }

    /// Qualified name of the parameter message (leading dot as sent by protoc).
    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    /// Qualified name of the result message.
    pub fn output_type(&self) -> &str {
        &self.output_type
    }

    /// Singular entity label, e.g. `Bob` for `...PutBobsQuery`.
    ///
    /// The query token with one trailing `s` trimmed; used as the leading
    /// key component of range deletes.
    pub fn entity_label(&self) -> &str {
        self.tokens
            .query
            .strip_suffix('s')
            .unwrap_or(&self.tokens.query)
    }

    /// Target table identifier: snake-cased singular label plus `_table`.
    pub fn table_name(&self) -> String {
        format!("{}_table", to_snake_case(self.entity_label()))
    }
}

/// CamelCase to snake_case.
pub(crate) fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, ch) in input.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// snake_case to UpperCamelCase, used for accessor names.
pub(crate) fn to_upper_camel(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for part in input.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
