// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for treecfg.
//!
//! This example demonstrates:
//! - Building a store from defaults and environment variables
//! - Attaching a type table so values are cast on the way in
//! - Reading values, scopes and trees
//! - What a rejected value looks like
//!
//! To run this example:
//! ```bash
//! # Set some environment variables (`__` separates namespaces)
//! export TREECFG_DEMO_APP__NAME="MyApplication"
//! export TREECFG_DEMO_DATABASE__PORT="5432"
//! export TREECFG_DEMO_DEBUG="yes"
//! export TREECFG_DEMO_API__TIMEOUT="30.5"
//!
//! # Run the example
//! cargo run --example basic_usage --features env
//! ```

use treecfg::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== treecfg: Basic Usage ===\n");

    // Keys without a rule pass through unchanged (relaxed).
    let types = TypeTable::new()
        .with("app.name", ValueType::NonEmptyString)?
        .with("database.port", ValueType::Integer)?
        .with("debug", ValueType::Bool)?
        .with("api.*", ValueType::Float)?;

    let mut store = ConfigStore::builder()
        .with_validator(None, type_validator(types, true))
        .with_value("app.name", "DefaultApp")
        .with_value("database.port", 3000)
        .with_value("debug", false)
        .with_value("api.timeout", 10)
        .with_env_prefix("TREECFG_DEMO_")
        .build()?;

    println!("Store built from defaults and TREECFG_DEMO_* variables.\n");

    // Example 1: Typed values
    println!("--- Example 1: Typed Values ---");
    for key in ["app.name", "database.port", "debug", "api.timeout"] {
        let value = store.get(key)?;
        println!("✓ {} = {} ({})", key, value, value.value_type());
    }

    // Example 2: Defaults for missing keys
    println!("\n--- Example 2: Optional Configuration with Defaults ---");
    let log_level = store.get_or("log.level", "info");
    println!("log.level = {} (from TREECFG_DEMO_LOG__LEVEL or default)", log_level);

    // Example 3: Scopes
    println!("\n--- Example 3: Scopes ---");
    let database = store.scope("database");
    println!("database children: {:?}", database.children(false)?);
    println!("database.port via scope: {}", database.get("port")?);

    // Example 4: Rejected values leave the store unchanged
    println!("\n--- Example 4: Validation ---");
    match store.set("database.port", "not-a-number") {
        Ok(()) => println!("✗ value was accepted"),
        Err(e) => println!("✓ rejected: {}", e),
    }
    println!("database.port is still {}", store.get("database.port")?);

    // Example 5: The whole store as a tree
    println!("\n--- Example 5: Tree ---");
    println!("{}", store.tree());

    println!("\n=== Example Complete ===");
    println!("\nTip: Try setting different environment variables and running again!");
    println!("  export TREECFG_DEMO_DATABASE__PORT=eighty   # fails the build");
    println!("  export TREECFG_DEMO_DEBUG=maybe             # fails the build");

    Ok(())
}
