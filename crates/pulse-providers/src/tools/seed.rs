//! Semilla determinista para los datos simulados.
//!
//! Los argumentos se serializan en JSON canónico (claves ordenadas) y se
//! hashean con BLAKE3; así dos llamadas con los mismos argumentos, en
//! cualquier orden de claves, producen los mismos valores.

use std::collections::BTreeMap;

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> = map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Generador de valores reproducibles a partir de `(tool, args)`.
pub struct Seed {
    digest: [u8; 32],
}

impl Seed {
    pub fn new(tool: &str, args: &Value) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(tool.as_bytes());
        hasher.update(b"\0");
        hasher.update(to_canonical_json(args).as_bytes());
        Self { digest: *hasher.finalize().as_bytes() }
    }

    /// Valor en `[0, 1)` derivado del byte-par `slot` (0..16).
    pub fn unit(&self, slot: usize) -> f64 {
        let i = (slot % 16) * 2;
        let raw = u16::from_be_bytes([self.digest[i], self.digest[i + 1]]);
        f64::from(raw) / 65_536.0
    }

    /// Entero en `[lo, hi]`.
    pub fn range(&self, slot: usize, lo: i64, hi: i64) -> i64 {
        let span = (hi - lo + 1) as f64;
        lo + (self.unit(slot) * span).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorts_keys() {
        let a = json!({"b": 1, "a": {"d": [1, 2], "c": "x"}});
        assert_eq!(to_canonical_json(&a), r#"{"a":{"c":"x","d":[1,2]},"b":1}"#);
    }

    #[test]
    fn seed_ignores_key_order_and_stays_in_range() {
        let s1 = Seed::new("t", &json!({"x": 1, "y": 2}));
        let s2 = Seed::new("t", &json!({"y": 2, "x": 1}));
        for slot in 0..16 {
            assert_eq!(s1.unit(slot), s2.unit(slot));
            let v = s1.range(slot, 10, 20);
            assert!((10..=20).contains(&v));
        }
    }
}
