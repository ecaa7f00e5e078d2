use serde_json::{json, Value};

use super::seed::Seed;
use super::{required_str, SimulatedTool};

/// Tendencias de búsqueda/reportes de salud por palabras clave y región.
pub struct HealthTrendsTool;

impl SimulatedTool for HealthTrendsTool {
    fn name(&self) -> &'static str {
        "analyze_health_trends"
    }

    fn description(&self) -> &'static str {
        "Trend scores for health-related keywords in a region"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": {"type": "array", "items": {"type": "string"}, "description": "Symptoms or conditions"},
                "region": {"type": "string"}
            },
            "required": ["keywords", "region"]
        })
    }

    fn run(&self, args: &Value) -> Result<Value, String> {
        let region = required_str(args, "region")?;
        let keywords: Vec<String> = match args.get("keywords") {
            Some(Value::Array(items)) => items.iter().filter_map(|k| k.as_str()).map(str::to_string).collect(),
            Some(Value::String(single)) => single.split(',').map(|k| k.trim().to_string()).collect(),
            _ => return Err("missing required argument 'keywords'".to_string()),
        };
        let keywords: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
        if keywords.is_empty() {
            return Err("argument 'keywords' must contain at least one keyword".to_string());
        }

        let mut total_change = 0;
        let rows: Vec<Value> = keywords.iter()
                                       .map(|k| {
                                           let seed = Seed::new(self.name(),
                                                                &json!({"keyword": k.to_lowercase(),
                                                                        "region": region.to_lowercase()}));
                                           let change_pct = seed.range(0, -30, 80);
                                           total_change += change_pct;
                                           json!({"keyword": k,
                                                  "trend_score": seed.range(1, 0, 100),
                                                  "change_pct": change_pct})
                                       })
                                       .collect();
        let avg_change = total_change / rows.len() as i64;
        let overall = if avg_change > 20 {
            "rising"
        } else if avg_change < -10 {
            "falling"
        } else {
            "stable"
        };
        Ok(json!({
            "region": region,
            "keywords": rows,
            "overall_trend": overall,
            "simulated": true
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comma_separated_keywords() {
        let v = HealthTrendsTool.run(&json!({"keywords": "asthma, cough", "region": "north"})).unwrap();
        assert_eq!(v["keywords"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_keywords_are_rejected() {
        assert!(HealthTrendsTool.run(&json!({"keywords": [], "region": "north"})).is_err());
    }
}
