//! Instrucciones de cada paso.
//!
//! Las salidas previas se incrustan como secciones etiquetadas; una sección
//! ausente simplemente no aparece.

use crate::chain::StepOutputChain;

fn section(title: &str, body: Option<&str>) -> Option<String> {
    body.map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| format!("## {title}\n{b}"))
}

fn compose(role: &str, sections: Vec<Option<String>>, task: &str) -> String {
    let mut parts = vec![role.to_string()];
    parts.extend(sections.into_iter().flatten());
    parts.push(task.to_string());
    parts.join("\n\n")
}

const ROLE: &str = "You are a public-health analyst helping a hospital network anticipate demand and \
                    communicate risk to the public.";

pub fn realtime_analysis(context_summary: &str) -> String {
    compose(ROLE,
            vec![section("Retrieved context", Some(context_summary))],
            "Analyse the current situation for the user's question. Use the available tools to fetch \
             live weather/air quality, hospital capacity and health-trend signals when they are relevant. \
             Answer with a concise situation analysis.")
}

pub fn predictions(chain: &StepOutputChain, realtime_analysis: &str) -> String {
    compose(ROLE,
            vec![section("Retrieved context", chain.context_summary().as_deref()),
                 section("Real-time analysis", Some(realtime_analysis))],
            "Predict the likely health impacts and hospital demand over the next 7 days. Give expected \
             patient volumes by department where possible.")
}

pub fn recommendations(chain: &StepOutputChain, predictions: &str) -> String {
    compose(ROLE,
            vec![section("Real-time analysis", chain.realtime_analysis.as_deref()),
                 section("Predictions", Some(predictions))],
            "Recommend concrete operational actions for hospital administrators: staffing, bed management \
             and supplies.")
}

pub fn public_alerts(chain: &StepOutputChain, recommendations: &str) -> String {
    compose(ROLE,
            vec![section("Predictions", chain.predictions.as_deref()),
                 section("Recommendations", Some(recommendations))],
            "Draft short public health alerts for residents, in plain language, with clear protective actions.")
}

/// El paso conversacional usa cualquier subconjunto disponible.
pub fn conversational(chain: &StepOutputChain) -> String {
    compose("You are a friendly public-health assistant answering a user directly.",
            vec![section("Retrieved context", chain.context_summary().as_deref()),
                 section("Real-time analysis", chain.realtime_analysis.as_deref()),
                 section("Predictions", chain.predictions.as_deref()),
                 section("Recommendations", chain.recommendations.as_deref()),
                 section("Public alerts", chain.public_alerts.as_deref())],
            "Reply to the user's message conversationally in a few short paragraphs, grounded only in the \
             information above. If little information is available, say so and give general guidance.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_outputs_are_omitted() {
        let chain = StepOutputChain { predictions: Some("ER +20%".into()),
                                      ..StepOutputChain::default() };
        let text = conversational(&chain);
        assert!(text.contains("## Predictions\nER +20%"));
        assert!(!text.contains("## Real-time analysis"));
        assert!(!text.contains("## Retrieved context"));
    }

    #[test]
    fn predecessor_output_is_embedded() {
        let text = recommendations(&StepOutputChain::default(), "surge expected");
        assert!(text.contains("## Predictions\nsurge expected"));
    }
}
