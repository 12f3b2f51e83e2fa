use crate::dim::{get_dimension, DimError, Quantity, UnitFormatter};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ProblemOutcome {
    pub name: String,
    pub title: String,
    /// Whether the problem names its own result unit
    pub pinned: bool,
    pub result: Result<Quantity, DimError>,
}

/// Results of one pass over a notebook, in problem order
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub outcomes: Vec<ProblemOutcome>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn result(&self, name: &str) -> Option<&Quantity> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.result.as_ref().ok())
    }
}

#[derive(Serialize)]
struct ReportJson<'a> {
    title: &'a str,
    results: Vec<EntryJson<'a>>,
}

#[derive(Serialize)]
struct EntryJson<'a> {
    name: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    magnitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Plain-text report: one "name = magnitude unit" line per problem
pub fn format_text(report: &Report, formatter: &UnitFormatter) -> String {
    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');

    for outcome in &report.outcomes {
        out.push('\n');
        out.push_str(&format!("# {}\n", outcome.title));
        match &outcome.result {
            Ok(value) => {
                let shown = formatter.preferred(Some(outcome.name.as_str()), value, outcome.pinned);
                out.push_str(&format!("{} = {}\n", outcome.name, formatter.display(&shown)));
            }
            Err(e) => out.push_str(&format!("{}: error: {}\n", outcome.name, e)),
        }
    }

    out
}

pub fn format_json(report: &Report, formatter: &UnitFormatter) -> Result<String, serde_json::Error> {
    let results = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(value) => {
                let shown = formatter.preferred(Some(outcome.name.as_str()), value, outcome.pinned);
                EntryJson {
                    name: &outcome.name,
                    title: &outcome.title,
                    magnitude: Some(shown.magnitude),
                    unit: Some(shown.unit.to_string()),
                    display: Some(formatter.display(&shown)),
                    dimension: Some(get_dimension(&shown)),
                    error: None,
                }
            }
            Err(e) => EntryJson {
                name: &outcome.name,
                title: &outcome.title,
                magnitude: None,
                unit: None,
                display: None,
                dimension: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    serde_json::to_string_pretty(&ReportJson {
        title: &report.title,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::{parse_quantity, parse_unit, UnitPreferences};
    use crate::formula::evaluator::Evaluator;
    use crate::notebook::builtin_notebook;

    fn builtin_report() -> Report {
        let notebook = builtin_notebook().unwrap();
        Evaluator::for_notebook(&notebook).run(&notebook)
    }

    #[test]
    fn test_text_report_lines() {
        let text = format_text(&builtin_report(), &UnitFormatter::default());
        assert!(text.starts_with("Precious-metal demand of PEM electrolysis\n"));
        assert!(text.contains("max_deployment_rate_pem_cathode = 246 GW/yr\n"));
        assert!(text.contains("years_to_world_capacity_2030_cathode = 6.0976 yr\n"));
        assert!(text.contains("max_deployment_rate_pem_anode = 12.3 GW/yr\n"));
        assert!(text.contains("years_to_world_capacity_2030_anode = 121.95 yr\n"));
    }

    #[test]
    fn test_text_report_errors() {
        let report = Report {
            title: "t".to_string(),
            outcomes: vec![ProblemOutcome {
                name: "bad".to_string(),
                title: "Bad".to_string(),
                pinned: false,
                result: parse_quantity("1 kg + 1 GW"),
            }],
        };
        assert_eq!(report.failures(), 1);
        let text = format_text(&report, &UnitFormatter::default());
        assert!(text.contains("bad: error: Dimension mismatch in addition"));

        let json = format_json(&report, &UnitFormatter::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value["results"][0];
        assert_eq!(entry["name"], "bad");
        assert!(entry["error"]
            .as_str()
            .unwrap()
            .starts_with("Dimension mismatch in addition"));
        assert!(entry.get("magnitude").is_none());
        assert!(entry.get("unit").is_none());
    }

    #[test]
    fn test_json_report() {
        let mut preferences = UnitPreferences::default();
        preferences
            .overrides
            .insert("max_deployment_rate_pem_anode".to_string(), parse_unit("MW/d").unwrap());
        let json = format_json(&builtin_report(), &UnitFormatter::new(preferences)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["unit"], "GW/yr");
        assert_eq!(results[0]["dimension"], "deployment_rate");
        assert_eq!(results[1]["display"], "6.0976 yr");
        assert_eq!(results[2]["unit"], "MW/d");
        assert!(results[0].get("error").is_none());
    }
}
