use crate::conf::ScenarioConfig;
use std::fmt::Debug;

/// Decides which scenario a raw log line belongs to.
///
/// `None` sends the line to the store's default scenario.
pub trait Classifier: Debug + Send + Sync {
    fn classify(&self, line: &str) -> Option<&str>;
}

/// Routes a line to the first scenario with a marker contained in it.
///
/// Scenarios are checked in configuration order.
#[derive(Debug, Clone, Default)]
pub struct MarkerClassifier {
    rules: Vec<MarkerRule>,
}

#[derive(Debug, Clone)]
struct MarkerRule {
    scenario: String,
    markers: Vec<String>,
}

impl MarkerClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(scenarios: &[ScenarioConfig]) -> Self {
        let mut classifier = Self::new();
        for scenario in scenarios {
            classifier.add_rule(&scenario.id, &scenario.markers);
        }
        classifier
    }

    /// Add a rule. Empty markers are ignored; a scenario without markers is
    /// never selected by this classifier.
    pub fn add_rule(&mut self, scenario: &str, markers: &[String]) {
        let markers: Vec<String> = markers.iter().filter(|m| !m.is_empty()).cloned().collect();
        if markers.is_empty() {
            return;
        }

        self.rules.push(MarkerRule {
            scenario: scenario.to_string(),
            markers,
        });
    }
}

impl Classifier for MarkerClassifier {
    fn classify(&self, line: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.markers.iter().any(|m| line.contains(m.as_str())))
            .map(|rule| rule.scenario.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::MonitorConfig;

    #[test]
    fn default_markers_route_known_tests() {
        let c = MarkerClassifier::from_config(&MonitorConfig::default().scenarios);

        assert_eq!(c.classify("=== PI Detailed Test === {}"), Some("pi_detailed"));
        assert_eq!(c.classify(r#"pi_test2: {"event":"x"}"#), Some("pi_test2"));
        assert_eq!(c.classify(r#"{"event":"lock_released","pid":1}"#), None);
    }

    #[test]
    fn first_matching_scenario_wins() {
        let mut c = MarkerClassifier::new();
        c.add_rule("a", &["shared".to_string()]);
        c.add_rule("b", &["shared".to_string(), "only_b".to_string()]);

        assert_eq!(c.classify("shared only_b"), Some("a"));
        assert_eq!(c.classify("only_b"), Some("b"));
    }

    #[test]
    fn empty_markers_never_match() {
        let mut c = MarkerClassifier::new();
        c.add_rule("x", &[String::new()]);

        assert_eq!(c.classify("anything"), None);
    }
}
