//! Fixture-driven conversion cases.
//!
//! Runs every case in tests/cases.json. Each case may override any
//! boolean option; the rest keep their defaults.

use litmark::{Options, to_html_with_options};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    input: String,
    expected: String,
    #[serde(default)]
    options: CaseOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseOptions {
    breaks_enabled: Option<bool>,
    markup_escaped: Option<bool>,
    urls_linked: Option<bool>,
    strict_mode: Option<bool>,
    safe_mode: Option<bool>,
    liturgical_elements: Option<bool>,
    liturgical_markup: Option<bool>,
    suppress_alleluia: Option<bool>,
}

impl CaseOptions {
    fn to_options(&self) -> Options {
        let defaults = Options::default();
        Options {
            breaks_enabled: self.breaks_enabled.unwrap_or(defaults.breaks_enabled),
            markup_escaped: self.markup_escaped.unwrap_or(defaults.markup_escaped),
            urls_linked: self.urls_linked.unwrap_or(defaults.urls_linked),
            strict_mode: self.strict_mode.unwrap_or(defaults.strict_mode),
            safe_mode: self.safe_mode.unwrap_or(defaults.safe_mode),
            liturgical_elements: self.liturgical_elements.unwrap_or(defaults.liturgical_elements),
            liturgical_markup: self.liturgical_markup.unwrap_or(defaults.liturgical_markup),
            suppress_alleluia: self.suppress_alleluia.unwrap_or(defaults.suppress_alleluia),
            ..defaults
        }
    }
}

fn load_cases() -> Vec<Case> {
    let json = fs::read_to_string("tests/cases.json").expect("Failed to read tests/cases.json");
    serde_json::from_str(&json).expect("Failed to parse cases.json")
}

#[test]
fn all_cases_pass() {
    let _ = env_logger::builder().is_test(true).try_init();
    let cases = load_cases();
    assert!(!cases.is_empty());

    let failures: Vec<String> = cases
        .iter()
        .filter_map(|case| {
            let actual = to_html_with_options(&case.input, &case.options.to_options());
            (actual != case.expected).then(|| {
                format!(
                    "{}\n  input:    {:?}\n  expected: {:?}\n  actual:   {:?}",
                    case.name, case.input, case.expected, actual
                )
            })
        })
        .collect();

    assert!(failures.is_empty(), "{} case(s) failed:\n{}", failures.len(), failures.join("\n"));
}

#[test]
fn case_names_are_unique() {
    let cases = load_cases();
    let mut names: Vec<&str> = cases.iter().map(|case| case.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), cases.len());
}
