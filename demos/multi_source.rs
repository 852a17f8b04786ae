// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-source configuration example.
//!
//! This example demonstrates:
//! - Loading an INI file, environment variables and command-line arguments
//! - How higher priority sources override lower priority ones
//! - INI root sections and `[DEFAULT]` inheritance
//! - A namespace validator that types every `*.port`
//!
//! To run this example:
//! ```bash
//! # Environment variables override the INI file
//! export TREECFG_DEMO_NAME="EnvApp"
//! export TREECFG_DEMO_DATABASE__HOST="db.example.com"
//!
//! # CLI args override both
//! cargo run --example multi_source --features ini,env,cli -- \
//!   --name=CliApp --app.port=9000
//! ```

use std::env;
use treecfg::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== treecfg: Multi-Source Example ===\n");

    let ini_content = r#"
[DEFAULT]
timeout = 30

[main]
name = IniApp
version = 1.0.0

[app]
port = 8080
environment = production

[database]
host = localhost
port = 5432
timeout = 5
"#;

    let temp_file = tempfile::Builder::new().suffix(".ini").tempfile()?;
    std::fs::write(temp_file.path(), ini_content)?;

    println!("Created temporary INI file at: {:?}\n", temp_file.path());

    let types = TypeTable::new()
        .with("*.port", ValueType::Integer)?
        .with("*timeout", ValueType::Integer)?;

    // Priority order (highest to lowest):
    //   1. CLI arguments (priority 3)
    //   2. Environment variables (priority 2)
    //   3. INI file (priority 1)
    println!("Building the store from three sources:");
    println!("  1. CLI arguments (priority 3) - highest");
    println!("  2. Environment variables (priority 2)");
    println!("  3. INI file (priority 1) - lowest\n");

    let store = StoreBuilder::new()
        .with_validator(None, type_validator(types, true))
        .with_ini_file(temp_file.path(), ["main"])?
        .with_env_prefix("TREECFG_DEMO_")
        .with_cli_args(env::args().skip(1).collect::<Vec<_>>())
        .build()?;

    println!("=== Configuration Values ===\n");

    println!("--- name ([main] is a root section) ---");
    print_value(&store, "name");
    println!("  Env var: TREECFG_DEMO_NAME (if set)");
    println!("  CLI arg: --name=<value> (if provided)");

    println!("\n--- app.port ---");
    print_value(&store, "app.port");
    println!("  CLI arg: --app.port=<value> (if provided)");

    println!("\n--- database.host ---");
    print_value(&store, "database.host");
    println!("  Env var: TREECFG_DEMO_DATABASE__HOST (if set)");

    println!("\n--- timeout ([DEFAULT] is inherited) ---");
    print_value(&store, "timeout");
    print_value(&store, "app.timeout");
    print_value(&store, "database.timeout");

    println!("\n--- app (as a tree) ---");
    match store.get_tree("app") {
        Ok(tree) => println!("  {}", tree),
        Err(e) => println!("  ✗ {}", e),
    }

    println!("\n=== Precedence Summary ===");
    println!("Sources load lowest priority first, so the last write wins:");
    println!("  • CLI arguments ALWAYS win (priority 3)");
    println!("  • Environment variables override the INI file (priority 2)");
    println!("  • The INI file has the lowest priority (priority 1)");

    Ok(())
}

/// Prints a value, or why it is missing.
fn print_value(store: &ConfigStore, key: &str) {
    match store.get(key) {
        Ok(value) => println!("  {} = {} ({})", key, value, value.value_type()),
        Err(e) => println!("  ✗ {}", e),
    }
}
