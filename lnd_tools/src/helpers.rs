use serde::{de, Deserialize, Deserializer};

/// True if `s` is a 32-byte payment hash in hex, which is the form LND expects in invoice lookup paths.
pub fn is_payment_hash_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// LND's JSON gateway encodes int64 fields as strings. Plain numbers are accepted as well.
pub fn i64_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }
    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::Int(v) => Ok(v),
        StringOrInt::String(s) if s.is_empty() => Ok(0),
        StringOrInt::String(s) => s.parse::<i64>().map_err(de::Error::custom),
    }
}
