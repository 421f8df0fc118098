//! Engine demo: describe a schema, validate and clean a few orders
//!
//! Run with `RUST_LOG=debug` to see schema compilation.

use serde_json::json;
use simple_schema::{
    CleanOptions, Constraints, FieldDefinition, SchemaDefinition, SchemaType, SimpleSchema,
    ValidationOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🦀 simple-schema Demo");
    println!("=====================\n");

    let item = SimpleSchema::new(
        SchemaDefinition::new()
            .field(
                "stockType",
                FieldDefinition::new(SchemaType::String)
                    .with(Constraints::new().allowed_values([json!("skis"), json!("ski-boots")])),
            )
            .field(
                "barcode",
                FieldDefinition::new(SchemaType::String)
                    .with(Constraints::new().reg_ex(regex::Regex::new(r"[a-z]{2,3}-\d{6}")?)),
            ),
    )?;

    let order = SimpleSchema::new(
        SchemaDefinition::new()
            .field(
                "orderId",
                FieldDefinition::new(SchemaType::String).with(Constraints::new().min(1.0)),
            )
            .field("index", SchemaType::Integer)
            .field(
                "inventory",
                FieldDefinition::new(SchemaType::Array).with(Constraints::new().max_count(3)),
            )
            .field("inventory.$", SchemaType::Schema(item)),
    )?;

    println!("📝 Validation");
    println!("-------------");
    let validator = order.validator(ValidationOptions::default());
    let samples = [
        json!({ "orderId": "213", "index": 0, "inventory": [{ "stockType": "skis", "barcode": "sk-000001" }] }),
        json!({ "orderId": "", "index": 0, "inventory": [] }),
        json!({ "orderId": "1", "index": 0.5, "inventory": [] }),
        json!({ "orderId": "1", "index": 0, "inventory": [{ "stockType": "snowboard", "barcode": "sb-000001" }] }),
    ];
    for sample in &samples {
        match validator.validate(sample) {
            Ok(()) => println!("  ✅ {}", sample),
            Err(errors) => println!("  ❌ {} → {}", sample, errors),
        }
    }

    println!("\n🧹 Cleaning");
    println!("-----------");
    let raw = json!({ "orderId": " 42 ", "index": "3", "inventory": [], "note": "dropped" });
    let cleaned = order.clean(&raw, &CleanOptions::default());
    println!("  {} → {}", raw, cleaned);

    let validator = order.validator(ValidationOptions::new().clean(true));
    println!(
        "  cleaned before validation: {}",
        if validator.is_valid(&raw) { "✅ valid" } else { "❌ invalid" }
    );

    println!("\n✅ Demo completed successfully!");
    Ok(())
}
