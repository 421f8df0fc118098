//! Annotated DTOs: register a kit update request and validate a few payloads
//!
//! Run with `RUST_LOG=debug` to see schema registration and resolution.

use regex::Regex;
use serde_json::{json, Value};
use simple_schema_decorators::{
    get_schema, get_validator, Annotated, Constraints, CustomContext, ErrorType, Members,
    SchemaBuilder, SchemaType, ValidationOptions, SCHEMA_STORE,
};

struct InventoryItem;

impl Annotated for InventoryItem {
    fn annotate(schema: &mut SchemaBuilder) {
        schema
            .field::<String>("stockType")
            .allowed_values(["skis", "ski-boots"]);
        schema
            .field::<String>("barcode")
            .reg_ex(Regex::new(r"[a-z]{2,3}-\d{6}").expect("valid barcode pattern"))
            .custom(barcode_prefix);
        schema.field::<String>("displayName").optional();
    }
}

fn barcode_prefix(ctx: &CustomContext<'_>) -> Option<ErrorType> {
    let barcode = ctx.value?.as_str()?;
    let prefix = match ctx.sibling_field("stockType").value?.as_str()? {
        "skis" => "sk-",
        "ski-boots" => "bt-",
        _ => return Some(ErrorType::NotAllowed),
    };
    if barcode.starts_with(prefix) {
        None
    } else {
        Some(ErrorType::FailedRegularExpression)
    }
}

struct UpdateKitDto;

impl Annotated for UpdateKitDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<String>("orderId").min(1);
        schema.field::<f64>("index").integer();
        schema.field::<Vec<InventoryItem>>("inventory").max_count(3);
        schema
            .field::<[f64; 2]>("coordinates")
            .members(Members::field(
                SchemaType::Number,
                Constraints::new().min(-180.0).max(180.0),
            ))
            .min_count(2)
            .max_count(2)
            .optional();
    }
}

struct UrgentKitDto;

impl Annotated for UrgentKitDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<UpdateKitDto>();
        schema.field::<String>("deadline").min(10);
        schema.field::<Vec<InventoryItem>>("inventory").max_count(1);
    }
}

fn report(title: &str, samples: &[Value], validate: impl Fn(&Value) -> Result<(), String>) {
    println!("{}", title);
    println!("{}", "-".repeat(title.chars().count()));
    for sample in samples {
        match validate(sample) {
            Ok(()) => println!("  ✅ {}", sample),
            Err(message) => println!("  ❌ {} → {}", sample, message),
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🦀 simple-schema-decorators Demo");
    println!("================================\n");

    let kit = get_validator::<UpdateKitDto>(ValidationOptions::default())?;
    let skis = json!({ "stockType": "skis", "barcode": "sk-000001" });
    report(
        "📝 UpdateKitDto",
        &[
            json!({ "orderId": "213", "index": 0, "inventory": [skis.clone()], "coordinates": [2.35, 48.85] }),
            json!({ "orderId": "", "index": 0, "inventory": [] }),
            json!({ "orderId": "1", "index": 0.5, "inventory": [] }),
            json!({ "orderId": "1", "index": 0, "inventory": [{ "stockType": "skis", "barcode": "bt-000001" }] }),
            json!({ "orderId": "1", "index": 0, "inventory": [], "coordinates": [0, 190] }),
        ],
        |input| kit.validate(input).map_err(|errors| errors.to_string()),
    );

    let urgent = get_validator::<UrgentKitDto>(ValidationOptions::default())?;
    report(
        "⏰ UrgentKitDto (extends UpdateKitDto)",
        &[
            json!({ "orderId": "7", "index": 1, "inventory": [skis.clone()], "deadline": "2026-12-01" }),
            json!({ "orderId": "7", "index": 1, "inventory": [skis.clone(), skis], "deadline": "2026-12-01" }),
            json!({ "orderId": "7", "index": 1, "inventory": [] }),
        ],
        |input| urgent.validate(input).map_err(|errors| errors.to_string()),
    );

    println!("🔎 Resolved keys");
    println!("----------------");
    let schema = get_schema::<UrgentKitDto>()?;
    for key in schema.keys() {
        println!("  {} ({})", key, schema.label(key).unwrap_or_default());
    }

    println!("\n📦 Registered classes: {:?}", SCHEMA_STORE.registered_classes());

    Ok(())
}
