//! Error taxonomy for the generation pipeline.
//!
//! Library code reports failures as values; only the binary decides to
//! terminate the process.

use thiserror::Error;

/// Errors that can occur while turning a code generator request into
/// generated query builders.
#[derive(Error, Debug)]
pub enum Error {
    /// A method references a type that is absent from the type registry.
    ///
    /// This is fatal for the whole run: emitting code for it would reference
    /// imports that do not exist.
    #[error("unresolved type reference `{qualified_name}` (referenced from {referrer})")]
    UnresolvedType {
        /// Fully qualified name of the missing type
        qualified_name: String,
        /// File (or other context) that referenced the type
        referrer: String,
    },

    /// A method name does not match the `<Type>From<Verb><Entity>Query` grammar.
    #[error("malformed method name `{method}`: expected the form `<Type>From<Verb><Entity>Query`")]
    MalformedMethodName {
        /// The offending method name
        method: String,
    },

    /// The segment after `From` does not start with a recognized verb.
    #[error("unrecognized verb in method `{method}`: `{segment}` does not start with Put, Insert, Delete, Get, or Select")]
    UnrecognizedVerb {
        /// The offending method name
        method: String,
        /// The segment that failed verb recognition
        segment: String,
    },

    /// Failed to decode the protobuf request envelope.
    #[error("failed to decode code generator request: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The request's descriptor set did not form a valid descriptor pool.
    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// General code generation failure.
    #[error("code generation failed: {0}")]
    CodeGen(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_type_names_the_missing_type() {
        let err = Error::UnresolvedType {
            qualified_name: "bob.Bob".to_string(),
            referrer: "bob.proto".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bob.Bob"));
        assert!(msg.contains("bob.proto"));
    }

    #[test]
    fn test_malformed_method_name_names_the_method() {
        let err = Error::MalformedMethodName {
            method: "DoStuff".to_string(),
        };
        assert!(err.to_string().contains("DoStuff"));
    }
}
