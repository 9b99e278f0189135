use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

pub enum Formatter {
    Str(String),
}

/// Replaces the `$N` placeholders of `parser` with the `N`-th argument.
pub fn formatter(mut parser: String, args: &[Formatter]) -> String {
    for (index, value) in args.iter().enumerate() {
        match value {
            Formatter::Str(s) => {
                parser = parser.replace(format!("${}", index).as_str(), s);
            },
        }
    }
    parser
}

/// Table names end up inside DDL, so only plain identifiers are accepted.
pub fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 64
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Upstream sends quotes either as preformatted strings or as raw numbers.
/// Both are kept in their textual form, `null` becomes `None`.
pub fn string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Null => Ok(None),
        other => Err(de::Error::custom(format!(
            "expected a string or a number, found {}",
            other
        ))),
    }
}
