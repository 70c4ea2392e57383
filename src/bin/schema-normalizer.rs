//! # Schema Normalizer
//!
//! Command-line utility that turns a source's discovered schema listing into
//! the normalized account schema the connector works with.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-normalizer schemas.json
//! ```
//!
//! The input is the JSON array of schema documents reported for a source
//! (`account`, `group`, ...). The normalized account schema is printed to
//! stdout as JSON, followed on stderr by a summary and the schemas the
//! account schema references.
//!
//! ## Exit Codes
//!
//! - `0`: The account schema was normalized
//! - `1`: The file could not be read or holds no usable account schema
//!
//! Set `RUST_LOG=debug` for normalization details.

use iga_connector::schema::{
    Schema, SourceSchemaDocument, normalize_account_schema, referenced_schemas,
    select_account_schema,
};
use std::env;
use std::fs;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <schemas.json>", args[0]);
        process::exit(1);
    }

    let path = &args[1];
    let documents = match load_documents(path) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("❌ Cannot load {}: {}", path, e);
            process::exit(1);
        }
    };

    let schema = match select_account_schema(&documents).and_then(normalize_account_schema) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Cannot serialize schema: {}", e);
            process::exit(1);
        }
    }

    print_summary(&schema, &documents);
}

fn load_documents(path: &str) -> Result<Vec<SourceSchemaDocument>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn print_summary(schema: &Schema, documents: &[SourceSchemaDocument]) {
    eprintln!("✓ Account schema normalized");
    eprintln!("  Identity attribute: {}", schema.identity_attribute);
    eprintln!("  Display attribute: {}", schema.display_attribute);
    eprintln!(
        "  Group attribute: {}",
        schema.group_attribute.as_deref().unwrap_or("(none)")
    );
    eprintln!("  Attributes: {}", schema.attributes.len());

    let entitlements: Vec<&str> = schema
        .attributes
        .iter()
        .filter(|attr| attr.is_entitlement)
        .map(|attr| attr.name.as_str())
        .collect();
    if !entitlements.is_empty() {
        eprintln!("  Entitlement attributes: {}", entitlements.join(", "));
    }

    let referenced = referenced_schemas(documents);
    if !referenced.is_empty() {
        eprintln!("  Referenced schemas:");
        for doc in referenced {
            eprintln!("    - {} ({})", doc.name, doc.id.as_deref().unwrap_or_default());
        }
    }
}
