//! Validate a JSON payload against a named knowledge-base schema.
//!
//! Prints the normalised record on success. On failure prints the problem
//! body listing every violation and exits non-zero.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use kb_schemas::{RegistryError, SchemaName, ValidateSettings, validate_named};
use ortho_config::OrthoConfig;
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// What the run prints and whether the payload was accepted.
#[derive(Debug)]
struct Outcome {
    body: Value,
    accepted: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "kb-validate: {err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<ExitCode> {
    let settings = ValidateSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    init_tracing(settings.json_logs);

    let mut out = io::stdout().lock();
    if settings.list {
        write_schema_names(&mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let schema = settings.schema_name().map_err(io::Error::other)?;
    let raw = read_input(settings.input_path())?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|error| io::Error::other(format!("parse input as JSON: {error}")))?;

    let outcome = outcome_for(validate_named(schema.name(), &payload))?;
    writeln!(out, "{}", render(&outcome.body, settings.pretty)?)?;
    Ok(if outcome.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(json_logs: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = result {
        warn!(%error, "tracing init failed");
    }
}

fn write_schema_names(mut out: impl Write) -> io::Result<()> {
    for schema in SchemaName::all() {
        writeln!(out, "{schema}")?;
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    if let Some(input) = path {
        fs::read_to_string(input).map_err(|error| {
            io::Error::other(format!("read input {}: {error}", input.display()))
        })
    } else {
        let mut raw = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut raw)
            .map_err(|error| io::Error::other(format!("read standard input: {error}")))?;
        Ok(raw)
    }
}

fn outcome_for(result: Result<Value, RegistryError>) -> io::Result<Outcome> {
    match result {
        Ok(record) => Ok(Outcome {
            body: record,
            accepted: true,
        }),
        Err(RegistryError::Invalid(errors)) => Ok(Outcome {
            body: errors.to_problem(),
            accepted: false,
        }),
        Err(error) => Err(io::Error::other(error)),
    }
}

fn render(body: &Value, pretty: bool) -> io::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(body)
    } else {
        serde_json::to_string(body)
    };
    rendered.map_err(|error| io::Error::other(format!("render output: {error}")))
}
