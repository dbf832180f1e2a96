//! Plugin protocol envelope.
//!
//! A protoc plugin reads one complete `CodeGeneratorRequest` from stdin and
//! writes one complete `CodeGeneratorResponse` to stdout. The processor
//! receives the raw request bytes so option extensions survive decoding.

use crate::error::Error;
use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use std::io::{Read, Write};

/// Run a processor over stdin/stdout.
pub fn run<TFunc>(process: TFunc) -> Result<(), Box<dyn std::error::Error>>
where
    TFunc: FnOnce(&[u8]) -> Result<CodeGeneratorResponse, Error>,
{
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with_io(stdin.lock(), stdout.lock(), process)
}

/// Run a processor over arbitrary reader/writer pairs.
pub fn run_with_io<TReader, TWriter, TFunc>(
    mut reader: TReader,
    mut writer: TWriter,
    process: TFunc,
) -> Result<(), Box<dyn std::error::Error>>
where
    TReader: Read,
    TWriter: Write,
    TFunc: FnOnce(&[u8]) -> Result<CodeGeneratorResponse, Error>,
{
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let response = process(&input)?;

    let mut output = Vec::new();
    response.encode(&mut output)?;

    writer.write_all(&output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::compiler::code_generator_response::File;
    use prost_types::compiler::CodeGeneratorRequest;

    fn create_sample_request() -> CodeGeneratorRequest {
        CodeGeneratorRequest {
            file_to_generate: vec!["bob.proto".to_string()],
            parameter: Some("enable=bob.Bobs".to_string()),
            ..Default::default()
        }
    }

    fn create_sample_response() -> CodeGeneratorResponse {
        CodeGeneratorResponse {
            file: vec![File {
                name: Some("bob.persist.go".to_string()),
                content: Some("// generated".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_run_with_io_success() {
        let mut input = Vec::new();
        let mut output = Vec::new();

        let request = create_sample_request();
        request.encode(&mut input).unwrap();

        let result = run_with_io(&input[..], &mut output, |bytes| {
            let decoded = CodeGeneratorRequest::decode(bytes).unwrap();
            assert_eq!(decoded.file_to_generate, vec!["bob.proto".to_string()]);
            Ok(create_sample_response())
        });
        assert!(result.is_ok(), "run_with_io should succeed");

        let response = CodeGeneratorResponse::decode(&output[..]).unwrap();
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].name(), "bob.persist.go");
        assert_eq!(response.file[0].content(), "// generated");
    }

    #[test]
    fn test_run_with_io_processor_error() {
        let mut input = Vec::new();
        let mut output = Vec::new();

        let request = create_sample_request();
        request.encode(&mut input).unwrap();

        let result = run_with_io(&input[..], &mut output, |_bytes| {
            Err(Error::CodeGen("processing failed".to_string()))
        });
        assert!(
            result.is_err(),
            "run_with_io should fail when processor fails"
        );
        assert!(output.is_empty(), "no output should be written on failure");
    }

    #[test]
    fn test_run_with_io_empty_input() {
        let input: &[u8] = &[];
        let mut output = Vec::new();

        let result = run_with_io(input, &mut output, |bytes| {
            assert!(bytes.is_empty());
            Ok(create_sample_response())
        });
        assert!(result.is_ok());

        let response = CodeGeneratorResponse::decode(&output[..]).unwrap();
        assert_eq!(response.file.len(), 1);
    }

    #[test]
    fn test_run_with_io_multiple_files() {
        let mut input = Vec::new();
        let mut output = Vec::new();

        let request = create_sample_request();
        request.encode(&mut input).unwrap();

        let result = run_with_io(&input[..], &mut output, |_bytes| {
            Ok(CodeGeneratorResponse {
                file: vec![
                    File {
                        name: Some("a.persist.go".to_string()),
                        content: Some("a".to_string()),
                        ..Default::default()
                    },
                    File {
                        name: Some("b.persist.go".to_string()),
                        content: Some("b".to_string()),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })
        });
        assert!(result.is_ok(), "run_with_io should succeed");

        let response = CodeGeneratorResponse::decode(&output[..]).unwrap();
        assert_eq!(response.file.len(), 2);
        assert_eq!(response.file[0].name(), "a.persist.go");
        assert_eq!(response.file[1].name(), "b.persist.go");
    }
}
