//! Integration tests for annotated types: registration, inheritance,
//! nested resolution and validation messages

use regex::Regex;
use serde_json::{json, Value};
use simple_schema_decorators::{
    annotations, get_schema, get_validator, validator_of, Annotated, CleanOptions, Constraints,
    CustomContext, DecoratorError, ErrorType, Members, SchemaBuilder, SchemaType,
    ValidationOptions, Validator,
};

fn pattern_for_stock_type(stock_type: &str) -> Option<&'static str> {
    match stock_type {
        "skis" => Some(r"sk-\d{6}"),
        "snowboard" => Some(r"sb-\d{6}"),
        "ski-boots" => Some(r"bt-\d{6}"),
        "snowboard-boots" => Some(r"btd-\d{6}"),
        "helmet" => Some(r"hm-\d{6}"),
        _ => None,
    }
}

/// Barcode must match the pattern of the stock type it is listed with
fn barcode_matches_stock_type(ctx: &CustomContext<'_>) -> Option<ErrorType> {
    let barcode = ctx.value?.as_str()?;
    let inventory = ctx.field("inventory").value?.as_array()?;

    let stock_type = inventory
        .iter()
        .find(|item| item.get("barcode").and_then(Value::as_str) == Some(barcode))
        .and_then(|item| item.get("stockType"))
        .and_then(Value::as_str);
    let stock_type = match stock_type {
        Some(stock_type) => stock_type,
        None => return Some(ErrorType::Required),
    };
    let pattern = match pattern_for_stock_type(stock_type) {
        Some(pattern) => pattern,
        None => return Some(ErrorType::NotAllowed),
    };

    if Regex::new(pattern).unwrap().is_match(barcode) {
        None
    } else {
        Some(ErrorType::FailedRegularExpression)
    }
}

struct InventoryItem;

impl Annotated for InventoryItem {
    fn annotate(schema: &mut SchemaBuilder) {
        schema
            .field::<String>("stockType")
            .allowed_values(["skis", "ski-boots"]);
        schema
            .field::<String>("barcode")
            .reg_ex(Regex::new(r"[a-z]{2,3}-\d{6}").unwrap())
            .custom(barcode_matches_stock_type);
        schema.field::<String>("displayName").declare();
    }
}

struct UpdateKitDto;

impl Annotated for UpdateKitDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<String>("orderId").min(1);
        schema.field::<f64>("index").integer();
        schema
            .field::<Vec<InventoryItem>>("inventory")
            .members(Members::class::<InventoryItem>())
            .max_count(3);
        schema
            .field::<Option<[f64; 2]>>("coordinates")
            .members(Members::field(
                SchemaType::Number,
                Constraints::new().min(-180.0).max(180.0),
            ))
            .min_count(2)
            .max_count(2)
            .optional();
    }
}

fn kit_validator() -> Validator {
    get_validator::<UpdateKitDto>(ValidationOptions::default()).unwrap()
}

fn item(stock_type: &str, barcode: &str) -> Value {
    json!({ "stockType": stock_type, "barcode": barcode, "displayName": "hello" })
}

fn message(validator: &Validator, input: Value) -> String {
    validator.validate(&input).unwrap_err().to_string()
}

#[test]
fn test_index_must_be_integer() {
    let input = json!({ "orderId": "213", "index": 0.5, "inventory": [] });
    assert_eq!(message(&kit_validator(), input), "Index must be an integer");
}

#[test]
fn test_order_id_min_length() {
    let input = json!({ "orderId": "", "index": 1, "inventory": [] });
    assert_eq!(
        message(&kit_validator(), input),
        "Order ID must be at least 1 characters"
    );
}

#[test]
fn test_inventory_max_count() {
    let input = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [
            item("skis", "sk-000001"),
            item("skis", "sk-000001"),
            item("skis", "sk-000001"),
            item("skis", "sk-000001"),
        ]
    });
    assert_eq!(
        message(&kit_validator(), input),
        "You cannot specify more than 3 values"
    );
}

#[test]
fn test_member_not_in_allowed_values() {
    let input = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [item("snowboard", "sk-000001")]
    });
    let errors = kit_validator().validate(&input).unwrap_err();

    assert_eq!(errors.to_string(), "snowboard is not an allowed value");
    assert_eq!(errors.errors[0].name, "inventory.0.stockType");
    assert_eq!(errors.errors[0].error_type, ErrorType::NotAllowed);
}

#[test]
fn test_member_regex_mismatch() {
    let input = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [item("skis", "s-000001")]
    });
    assert_eq!(
        message(&kit_validator(), input),
        "Barcode failed regular expression validation"
    );
}

#[test]
fn test_primitive_member_constraints() {
    let validator = kit_validator();

    let valid = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [item("skis", "sk-000001")],
        "coordinates": [0, 0]
    });
    assert!(validator.validate(&valid).is_ok());

    let out_of_range = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [item("skis", "sk-000001")],
        "coordinates": [0, 190]
    });
    assert_eq!(message(&validator, out_of_range), "Coordinates cannot exceed 180");

    let too_few = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [],
        "coordinates": [0]
    });
    assert_eq!(message(&validator, too_few), "You must specify at least 2 values");
}

#[test]
fn test_custom_validator_sees_root_object() {
    let input = json!({
        "orderId": "0",
        "index": 1,
        "inventory": [item("skis", "ss-000001")]
    });
    let errors = kit_validator().validate(&input).unwrap_err();

    assert_eq!(
        errors.to_string(),
        "Barcode failed regular expression validation"
    );
    assert_eq!(errors.errors[0].name, "inventory.0.barcode");
    assert_eq!(errors.errors[0].value, Some(json!("ss-000001")));
}

#[test]
fn test_all_errors_are_collected() {
    let input = json!({ "orderId": "", "index": 0.5, "inventory": [], "extra": true });
    let errors = kit_validator().validate(&input).unwrap_err();

    assert_eq!(errors.len(), 3);
    assert!(errors.has_field_errors("orderId"));
    assert!(errors.has_field_errors("index"));
    assert!(errors.has_error_type(&ErrorType::KeyNotInSchema));
    assert_eq!(errors.to_string(), "Order ID must be at least 1 characters");
}

#[test]
fn test_keys_option_restricts_validation() {
    let only_order_id =
        get_validator::<UpdateKitDto>(ValidationOptions::new().keys(["orderId"])).unwrap();
    assert!(only_order_id.validate(&json!({ "orderId": "x" })).is_ok());

    let only_stock_type =
        get_validator::<UpdateKitDto>(ValidationOptions::new().keys(["inventory.$.stockType"]))
            .unwrap();
    let input = json!({ "inventory": [item("skis", "bad"), item("helmet", "bad")] });
    let errors = only_stock_type.validate(&input).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].name, "inventory.1.stockType");
}

#[test]
fn test_get_validator_is_idempotent() {
    let first = kit_validator();
    let second = kit_validator();
    let input = json!({ "orderId": "", "index": 1, "inventory": [] });

    assert_eq!(
        first.validate(&input).unwrap_err(),
        second.validate(&input).unwrap_err()
    );
    assert!(!first.schema().ptr_eq(second.schema()));
}

struct GeoJsonPointDto;

impl Annotated for GeoJsonPointDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema
            .field::<String>("type")
            .allowed_values(["Point"])
            .default_value("Point");
        schema
            .field::<[f64; 2]>("coordinates")
            .members(Members::field(
                SchemaType::Number,
                Constraints::new().min(-180.0).max(180.0),
            ))
            .min_count(2)
            .max_count(2);
    }
}

struct Accommodation;

impl Annotated for Accommodation {
    fn annotate(schema: &mut SchemaBuilder) {
        // location is a single object, so the members annotation is ignored
        schema
            .field::<GeoJsonPointDto>("location")
            .members(Members::class::<GeoJsonPointDto>())
            .min_count(1)
            .max_count(1);
    }
}

#[test]
fn test_nested_class_validates() {
    let validator = get_validator::<Accommodation>(ValidationOptions::default()).unwrap();
    let input = json!({ "location": { "type": "Point", "coordinates": [0, 0] } });
    assert!(validator.validate(&input).is_ok());
}

#[test]
fn test_nested_class_reports_nested_label() {
    let validator = get_validator::<Accommodation>(ValidationOptions::default()).unwrap();
    let errors = validator
        .validate(&json!({ "location": { "coordinates": [0, 0] } }))
        .unwrap_err();

    assert_eq!(errors.to_string(), "Type is required");
    assert_eq!(errors.errors[0].name, "location.type");
}

#[test]
fn test_members_on_non_list_are_ignored() {
    let schema = get_schema::<Accommodation>().unwrap();
    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["location"]);
    assert!(matches!(
        schema.get("location").unwrap().ty,
        SchemaType::Schema(_)
    ));
}

#[test]
fn test_nested_default_value_applied_when_cleaning() {
    let validator = get_validator::<Accommodation>(ValidationOptions::new().clean(true)).unwrap();
    assert!(validator
        .validate(&json!({ "location": { "coordinates": ["1.5", "2"] } }))
        .is_ok());
}

struct OneOfDto;

impl Annotated for OneOfDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema
            .field::<Value>("someUnionType")
            .one_of([SchemaType::String, SchemaType::Number]);
    }
}

#[test]
fn test_one_of() {
    let validator = get_validator::<OneOfDto>(ValidationOptions::default()).unwrap();

    assert_eq!(
        message(&validator, json!({ "someUnionType": true })),
        "Some union type must be of type String"
    );
    assert!(validator.validate(&json!({ "someUnionType": "string" })).is_ok());
    assert!(validator.validate(&json!({ "someUnionType": 5 })).is_ok());
}

struct ConstantDto;

impl Annotated for ConstantDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema
            .field::<String>("stringConstant")
            .constant("hello")
            .optional();
        schema.field::<i64>("numberConstant").constant(5).optional();
    }
}

#[test]
fn test_constants() {
    let validator = get_validator::<ConstantDto>(ValidationOptions::default()).unwrap();

    assert!(validator.validate(&json!({ "stringConstant": "hello" })).is_ok());
    assert_eq!(
        message(&validator, json!({ "stringConstant": "world" })),
        "world is not an allowed value"
    );
    assert!(validator.validate(&json!({ "numberConstant": 5 })).is_ok());
    assert_eq!(
        message(&validator, json!({ "numberConstant": 6 })),
        "6 is not an allowed value"
    );
}

struct NumberDto;

impl Annotated for NumberDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<f64>("number").min(5).max(10);
    }
}

#[test]
fn test_number_bounds() {
    let validator = get_validator::<NumberDto>(ValidationOptions::default()).unwrap();

    assert_eq!(
        message(&validator, json!({ "number": 4 })),
        "Number must be at least 5"
    );
    assert_eq!(
        message(&validator, json!({ "number": 11 })),
        "Number cannot exceed 10"
    );
    assert!(validator.validate(&json!({ "number": 6 })).is_ok());
}

#[derive(serde::Serialize)]
struct WithCustomPotato {
    vegetable: String,
}

impl Annotated for WithCustomPotato {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<String>("vegetable").custom(|ctx| {
            if ctx.value.and_then(Value::as_str) == Some("potato") {
                None
            } else {
                Some("should be potato".into())
            }
        });
    }
}

#[test]
fn test_custom_predicate_from_instance() {
    let potato = WithCustomPotato {
        vegetable: "potato".to_string(),
    };
    let validator = validator_of(&potato, ValidationOptions::default()).unwrap();
    assert!(validator
        .validate(&serde_json::to_value(&potato).unwrap())
        .is_ok());

    let carrot = WithCustomPotato {
        vegetable: "carrot".to_string(),
    };
    let errors = validator
        .validate(&serde_json::to_value(&carrot).unwrap())
        .unwrap_err();
    assert_eq!(errors.to_string(), "vegetable is invalid");
    assert_eq!(
        errors.errors[0].error_type,
        ErrorType::Custom("should be potato".to_string())
    );
}

struct BaseDto;

impl Annotated for BaseDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<String>("name").min(2);
        schema.field::<f64>("age").min(0).max(150);
    }
}

struct AdminDto;

impl Annotated for AdminDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<BaseDto>();
        schema.field::<f64>("age").max(99);
        schema
            .field::<String>("role")
            .allowed_values(["admin", "owner"]);
    }
}

#[test]
fn test_subclass_inherits_parent_fields() {
    let admin = get_validator::<AdminDto>(ValidationOptions::default()).unwrap();

    assert_eq!(
        message(&admin, json!({ "age": 30, "role": "admin" })),
        "Name is required"
    );
    assert_eq!(
        message(&admin, json!({ "name": "A", "age": 30, "role": "admin" })),
        "Name must be at least 2 characters"
    );
    assert!(admin
        .validate(&json!({ "name": "Ada", "age": 30, "role": "owner" }))
        .is_ok());
}

#[test]
fn test_subclass_overrides_single_kind() {
    let admin = get_validator::<AdminDto>(ValidationOptions::default()).unwrap();

    assert_eq!(
        message(&admin, json!({ "name": "Ada", "age": 120, "role": "admin" })),
        "Age cannot exceed 99"
    );
    assert_eq!(
        message(&admin, json!({ "name": "Ada", "age": -1, "role": "admin" })),
        "Age must be at least 0"
    );
}

#[test]
fn test_parent_is_unaffected_by_subclass() {
    let base = get_validator::<BaseDto>(ValidationOptions::default()).unwrap();

    assert!(base.validate(&json!({ "name": "Ada", "age": 120 })).is_ok());
    assert_eq!(
        message(&base, json!({ "name": "Ada", "age": 30, "role": "admin" })),
        "role is not allowed by the schema"
    );
}

struct ProductDto;

impl Annotated for ProductDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<f64>("code").integer();
    }
}

struct LegacyProductDto;

impl Annotated for LegacyProductDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<ProductDto>();
        schema.field::<String>("code").declare();
    }
}

struct DiscountedProductDto;

impl Annotated for DiscountedProductDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<ProductDto>();
        schema.field::<f64>("discount").exclusive_min().min(0).max(1).exclusive_max();
    }
}

#[test]
fn test_subclass_retypes_inherited_field() {
    let legacy = get_validator::<LegacyProductDto>(ValidationOptions::default()).unwrap();
    assert!(legacy.validate(&json!({ "code": "abc" })).is_ok());
    assert_eq!(
        message(&legacy, json!({ "code": 3 })),
        "Code must be of type String"
    );

    let product = get_validator::<ProductDto>(ValidationOptions::default()).unwrap();
    assert!(product.validate(&json!({ "code": 3 })).is_ok());
    assert_eq!(
        message(&product, json!({ "code": "abc" })),
        "Code must be of type Integer"
    );
}

#[test]
fn test_subclass_keeps_untouched_inherited_type() {
    let discounted =
        get_validator::<DiscountedProductDto>(ValidationOptions::default()).unwrap();
    assert_eq!(
        message(&discounted, json!({ "code": 1.5, "discount": 0.5 })),
        "Code must be an integer"
    );
}

#[test]
fn test_exclusive_bounds() {
    let discounted =
        get_validator::<DiscountedProductDto>(ValidationOptions::default()).unwrap();

    assert!(discounted.validate(&json!({ "code": 1, "discount": 0.25 })).is_ok());
    assert_eq!(
        message(&discounted, json!({ "code": 1, "discount": 0 })),
        "Discount must be greater than 0"
    );
    assert_eq!(
        message(&discounted, json!({ "code": 1, "discount": 1 })),
        "Discount must be less than 1"
    );
}

struct SizeDto;

impl Annotated for SizeDto {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.annotate::<String>(
            "size",
            [
                annotations::allowed_values(["s", "m"]),
                annotations::allowed_values(["l"]),
            ],
        );
    }
}

#[test]
fn test_repeated_kind_overwrites_instead_of_merging() {
    let validator = get_validator::<SizeDto>(ValidationOptions::default()).unwrap();

    assert!(validator.validate(&json!({ "size": "l" })).is_ok());
    assert_eq!(
        message(&validator, json!({ "size": "m" })),
        "m is not an allowed value"
    );
}

struct IntegerFirst;

impl Annotated for IntegerFirst {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<f64>("count").integer().min(1);
    }
}

struct IntegerLast;

impl Annotated for IntegerLast {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<f64>("count").min(1).integer();
    }
}

#[test]
fn test_explicit_type_wins_regardless_of_order() {
    for validator in [
        get_validator::<IntegerFirst>(ValidationOptions::default()).unwrap(),
        get_validator::<IntegerLast>(ValidationOptions::default()).unwrap(),
    ] {
        assert_eq!(
            message(&validator, json!({ "count": 1.5 })),
            "Count must be an integer"
        );
        assert_eq!(
            message(&validator, json!({ "count": 0 })),
            "Count must be at least 1"
        );
        assert!(validator.validate(&json!({ "count": 3 })).is_ok());
    }
}

struct CycleA;
struct CycleB;

impl Annotated for CycleA {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<CycleB>();
        schema.field::<String>("a").declare();
    }
}

impl Annotated for CycleB {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.extends::<CycleA>();
        schema.field::<String>("b").declare();
    }
}

#[test]
fn test_inheritance_cycle_is_reported() {
    let error = get_schema::<CycleA>().unwrap_err();
    assert_eq!(
        error,
        DecoratorError::InheritanceCycle {
            class: "CycleA",
            chain: vec!["CycleA", "CycleB", "CycleA"],
        }
    );
    assert_eq!(
        error.to_string(),
        "Inheritance cycle while building schema for 'CycleA': CycleA -> CycleB -> CycleA"
    );
}

struct Profile;

impl Annotated for Profile {
    fn annotate(schema: &mut SchemaBuilder) {
        schema.field::<String>("nickname").min(3);
        schema
            .field::<String>("status")
            .allowed_values(["active", "inactive"])
            .default_value("active");
        schema.field::<String>("slug").auto_value(|ctx| {
            ctx.sibling_field("nickname")
                .value
                .and_then(Value::as_str)
                .map(|nickname| json!(nickname.trim().to_lowercase()))
        });
        schema.field::<String>("motto").trim(false).optional();
    }
}

#[test]
fn test_cleaning_applies_annotated_values() {
    let schema = get_schema::<Profile>().unwrap();
    let cleaned = schema.clean(
        &json!({ "nickname": "  Ada  ", "motto": "  stay  ", "unknown": 1 }),
        &CleanOptions::default(),
    );

    assert_eq!(
        cleaned,
        json!({
            "nickname": "Ada",
            "motto": "  stay  ",
            "status": "active",
            "slug": "ada"
        })
    );
}

#[test]
fn test_clean_before_validate() {
    let strict = get_validator::<Profile>(ValidationOptions::default()).unwrap();
    let cleaning = get_validator::<Profile>(ValidationOptions::new().clean(true)).unwrap();
    let input = json!({ "nickname": "Ada" });

    assert_eq!(message(&strict, input.clone()), "Status is required");
    assert!(cleaning.validate(&input).is_ok());
}
