#![deny(missing_docs)]

//! # Contract Checks
//!
//! Runs `request` / `response` checks for a captured message body and
//! renders the outcome.

use crate::error::{CliError, CliResult};
use clap::Args;
use colored::Colorize;
use oasguard_core::{OpenApiValidator, ValidatorError, APPLICATION_JSON};
use std::fs;
use std::path::PathBuf;

/// Arguments for validating a captured request body.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Path template as declared in the contract (e.g. `/orders/{id}`).
    #[clap(long)]
    pub path: String,

    /// HTTP method.
    #[clap(long)]
    pub method: String,

    /// File holding the captured request body.
    #[clap(long)]
    pub body: PathBuf,

    /// Content type the body was sent with.
    #[clap(long, default_value = APPLICATION_JSON)]
    pub content_type: String,
}

/// Arguments for validating a captured response body.
#[derive(Args, Debug)]
pub struct ResponseArgs {
    /// Path template as declared in the contract (e.g. `/orders/{id}`).
    #[clap(long)]
    pub path: String,

    /// HTTP method.
    #[clap(long)]
    pub method: String,

    /// Response status code.
    #[clap(long)]
    pub status: u16,

    /// File holding the captured response body.
    #[clap(long)]
    pub body: PathBuf,

    /// Content type the body was served with.
    #[clap(long, default_value = APPLICATION_JSON)]
    pub content_type: String,
}

/// Validates a request body file against the contract.
pub fn request(validator: &OpenApiValidator, args: &RequestArgs) -> CliResult<()> {
    let body = fs::read(&args.body)?;
    validator.validate_request_with(&body, &args.path, &args.method, &args.content_type)?;
    println!(
        "{} {} {} request body conforms to the contract",
        "ok:".green().bold(),
        args.method.to_uppercase(),
        args.path
    );
    Ok(())
}

/// Validates a response body file against the contract.
pub fn response(validator: &OpenApiValidator, args: &ResponseArgs) -> CliResult<()> {
    let body = fs::read(&args.body)?;
    validator.validate_response_with(
        &body,
        &args.path,
        &args.method,
        args.status,
        &args.content_type,
    )?;
    println!(
        "{} {} {} {} response body conforms to the contract",
        "ok:".green().bold(),
        args.method.to_uppercase(),
        args.path,
        args.status
    );
    Ok(())
}

/// Renders a failed check.
///
/// Routing mismatches (the route is not declared in the contract) and
/// conformance mismatches (the body violates the declared schema) are
/// reported distinctly; the former usually means the check is
/// misconfigured, the latter a real contract violation.
pub fn report(err: &CliError) {
    match err {
        CliError::Validator(
            ValidatorError::InvalidRequest(failure) | ValidatorError::InvalidResponse(failure),
        ) => {
            eprintln!(
                "{} message body does not conform to the contract ({} violation(s)):",
                "error:".red().bold(),
                failure.violations.len()
            );
            for violation in &failure.violations {
                let property = if violation.property.is_empty() {
                    "(root)"
                } else {
                    violation.property.as_str()
                };
                eprintln!("  {} {}", property.blue().bold(), violation.message);
            }
        }
        CliError::Validator(inner) if inner.is_routing_mismatch() => {
            eprintln!(
                "{} route not declared in the contract: {}",
                "error:".red().bold(),
                inner
            );
        }
        other => eprintln!("{} {}", "error:".red().bold(), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONTRACT: &str = r#"
openapi: 3.0.0
info:
  title: Fixture
  version: 1.0.0
paths:
  /orders:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required: [id]
              properties:
                id:
                  type: integer
"#;

    fn body_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_request_check_passes() {
        let validator = OpenApiValidator::from_document("fixture.yaml", CONTRACT).unwrap();
        let body = body_file(r#"{"id": 1}"#);
        let args = RequestArgs {
            path: "/orders".into(),
            method: "POST".into(),
            body: body.path().to_path_buf(),
            content_type: APPLICATION_JSON.into(),
        };
        assert!(request(&validator, &args).is_ok());
    }

    #[test]
    fn test_request_check_surfaces_conformance_failure() {
        let validator = OpenApiValidator::from_document("fixture.yaml", CONTRACT).unwrap();
        let body = body_file(r#"{"id": "x"}"#);
        let args = RequestArgs {
            path: "/orders".into(),
            method: "POST".into(),
            body: body.path().to_path_buf(),
            content_type: APPLICATION_JSON.into(),
        };
        let err = request(&validator, &args).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validator(ValidatorError::InvalidRequest(_))
        ));
    }
}
