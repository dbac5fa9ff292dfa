use crate::interpreter::Environment;
use crate::Value;

/// `nothing` maps to null; non-finite numbers have no JSON form and become null too.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nothing => serde_json::Value::Null,
        Value::Bool(flag) => serde_json::Value::Bool(*flag),
        Value::Number(number) => {
            if number.fract() == 0.0 && number.abs() < 1e15 {
                serde_json::Value::from(*number as i64)
            } else {
                serde_json::Number::from_f64(*number)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::String(text) => serde_json::Value::String(text.to_string()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
    }
}

/// Variables as a JSON object, in the order they were first assigned.
pub fn environment_to_json(env: &Environment) -> serde_json::Value {
    let variables = env
        .variables()
        .iter()
        .map(|(name, value)| (name.clone(), value_to_json(value)))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(variables)
}
