//! Address Validation Example
//!
//! Demonstrates checking user input against the IPv4 and IPv6 literal grammars
//! before anything is looked up.
//!
//! # Feature Requirements
//!
//! This example only requires the `lens-core` feature, which has no network
//! dependencies.
//!
//! # Running
//!
//! ```bash
//! cargo run --example validate_lens --features lens-core
//! ```

use ipgeo::lens::validate::{detect_format, is_valid_ip_format, FormatCheck, FORMAT_ALERT};

fn main() -> anyhow::Result<()> {
    let inputs = [
        "192.168.1.1",
        "01.2.3.4",
        "999.1.1.1",
        "::1",
        "2606:4700:4700::1111",
        "12345::",
        "::ffff:1.2.3.4",
        "localhost",
    ];

    println!("{:<24} {:<7} Format", "Input", "Valid");
    for input in inputs {
        let format = detect_format(input)
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<7} {}", input, is_valid_ip_format(input), format);
    }

    // Anything the validator rejects is blocked with the same notification
    if !is_valid_ip_format("999.1.1.1") {
        println!("\nSubmitting 999.1.1.1 shows: {}", FORMAT_ALERT);
    }

    // FormatCheck is the serializable verdict used by `ipgeo validate`
    let checks: Vec<FormatCheck> = inputs.iter().map(|s| FormatCheck::new(s)).collect();
    println!("\n{}", serde_json::to_string_pretty(&checks)?);

    Ok(())
}
