use serde_json::Value;

/// Masks credentials and personal identifiers in JSON payloads before they
/// reach the logs.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_credential_field(key) {
                    redact_value(val)
                } else if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

/// Never partially shown.
fn is_credential_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "confirm_password" | "current_password" | "new_password" | "otp" | "otp_code"
    )
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "access_token" | "refresh_token" | "token" | "authorization" | "phone_number" | "nim"
    )
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        _ => Value::String("****".to_string()),
    }
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(mask_secret(s)),
        Value::Null => Value::Null,
        _ => Value::String("****".to_string()),
    }
}

/// Keeps the first and last four characters of long secrets.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}
