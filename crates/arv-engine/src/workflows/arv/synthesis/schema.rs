use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// JSON schema for `T` in the shape strict structured-output endpoints expect:
/// closed objects, every property required, no `$schema`/`definitions`.
pub(crate) fn strict_schema<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();
    close_objects(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("definitions");
        map.remove("title");
    }

    value
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(properties)) = map.get("properties") {
                    let required = properties
                        .keys()
                        .map(|key| Value::String(key.clone()))
                        .collect();
                    map.insert("required".to_string(), Value::Array(required));
                }
            }
            for (_, nested) in map.iter_mut() {
                close_objects(nested);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}
