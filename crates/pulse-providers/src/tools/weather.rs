use serde_json::{json, Value};

use super::seed::Seed;
use super::{required_str, SimulatedTool};

/// Clima y calidad del aire por ubicación.
pub struct WeatherAqiTool;

fn aqi_category(aqi: i64) -> &'static str {
    match aqi {
        i64::MIN..=50 => "good",
        51..=100 => "satisfactory",
        101..=200 => "moderate",
        201..=300 => "poor",
        301..=400 => "very_poor",
        _ => "severe",
    }
}

impl SimulatedTool for WeatherAqiTool {
    fn name(&self) -> &'static str {
        "get_weather_aqi"
    }

    fn description(&self) -> &'static str {
        "Current weather conditions and air quality index (AQI) for a location"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "City or district name"}
            },
            "required": ["location"]
        })
    }

    fn run(&self, args: &Value) -> Result<Value, String> {
        let location = required_str(args, "location")?;
        let seed = Seed::new(self.name(), &json!({"location": location.to_lowercase()}));
        let aqi = seed.range(0, 30, 450);
        let pollutant = ["PM2.5", "PM10", "O3", "NO2"][seed.range(1, 0, 3) as usize];
        Ok(json!({
            "location": location,
            "temperature_c": seed.range(2, 8, 42),
            "humidity_pct": seed.range(3, 20, 95),
            "aqi": aqi,
            "aqi_category": aqi_category(aqi),
            "dominant_pollutant": pollutant,
            "simulated": true
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_the_scale() {
        assert_eq!(aqi_category(10), "good");
        assert_eq!(aqi_category(150), "moderate");
        assert_eq!(aqi_category(250), "poor");
        assert_eq!(aqi_category(999), "severe");
    }

    #[test]
    fn same_location_same_reading() {
        let a = WeatherAqiTool.run(&json!({"location": "Delhi"})).unwrap();
        let b = WeatherAqiTool.run(&json!({"location": "delhi"})).unwrap();
        assert_eq!(a["aqi"], b["aqi"]);
        assert_eq!(a["location"], "Delhi");
    }
}
