//! Herramientas simuladas invocables por el modelo.
//!
//! El registro es fijo (clima/AQI, capacidad hospitalaria, tendencias). La
//! selección de herramienta la decide el modelo, así que `invoke` nunca
//! falla: un nombre desconocido devuelve `"Tool not found"` y unos argumentos
//! inválidos devuelven un JSON `{"error": ...}`.

mod hospital;
pub mod seed;
mod trends;
mod weather;

use serde_json::{json, Value};
use tracing::{debug, warn};

pub use hospital::HospitalCapacityTool;
pub use trends::HealthTrendsTool;
pub use weather::WeatherAqiTool;

use crate::agent::ToolSchema;

/// Resultado literal para nombres fuera del registro.
pub const TOOL_NOT_FOUND: &str = "Tool not found";

/// Contrato de una herramienta simulada.
pub trait SimulatedTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema de los argumentos.
    fn parameters(&self) -> Value;
    /// Ejecuta con argumentos ya decodificados. `Err` lleva un mensaje para
    /// el modelo, no aborta el paso.
    fn run(&self, args: &Value) -> Result<Value, String>;
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing required argument '{key}'"))
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn SimulatedTool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ToolRegistry {
    /// Registro con las tres herramientas.
    pub fn standard() -> Self {
        Self { tools: vec![Box::new(WeatherAqiTool), Box::new(HospitalCapacityTool), Box::new(HealthTrendsTool)] }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Esquemas de función para ofrecer al modelo.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema { name: t.name().to_string(),
                                  description: t.description().to_string(),
                                  parameters: t.parameters() })
            .collect()
    }

    /// Despacha `name` con `arguments_json` y devuelve el resultado serializado.
    pub fn invoke(&self, name: &str, arguments_json: &str) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!(tool = name, "model requested an unknown tool");
            return TOOL_NOT_FOUND.to_string();
        };

        let args: Value = if arguments_json.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(arguments_json) {
                Ok(v) => v,
                Err(e) => return json!({"error": format!("invalid arguments: {e}")}).to_string(),
            }
        };

        debug!(tool = name, "invoking tool");
        match tool.run(&args) {
            Ok(result) => result.to_string(),
            Err(message) => json!({"error": message}).to_string(),
        }
    }
}
