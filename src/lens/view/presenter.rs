//! Result presenter
//!
//! Turns a [`LookupView`] into the panel a front end should draw, and formats
//! that panel for the terminal.

use super::state::{LookupView, Toggle};
use crate::lens::lookup::LookupRecord;
use crate::lens::utils::OutputFormat;
use serde::Serialize;

const MISSING_VALUE: &str = "N/A";

/// One labeled field of the result panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct ResultField {
    #[cfg_attr(feature = "display", tabled(skip))]
    pub key: &'static str,
    #[cfg_attr(feature = "display", tabled(rename = "Field"))]
    pub label: &'static str,
    #[cfg_attr(feature = "display", tabled(rename = "Value"))]
    pub value: String,
}

/// What the result area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    /// Nothing to show (idle, loading, or a stale result)
    Empty,
    Error { message: String },
    Result {
        fields: Vec<ResultField>,
        toggle: Toggle,
    },
}

fn field(key: &'static str, label: &'static str, value: Option<String>) -> ResultField {
    ResultField {
        key,
        label,
        value: value.unwrap_or_else(|| MISSING_VALUE.to_string()),
    }
}

/// Fields of a record: five by default, seven when expanded
pub fn record_fields(record: &LookupRecord, expanded: bool) -> Vec<ResultField> {
    let mut fields = vec![
        field("country_name", "Country", record.country_name.clone()),
        field("city", "City", record.city.clone()),
        field("version", "IP Version", record.version.clone()),
        field("latitude", "Latitude", record.latitude.map(|v| v.to_string())),
        field(
            "longitude",
            "Longitude",
            record.longitude.map(|v| v.to_string()),
        ),
    ];
    if expanded {
        fields.push(field("currency", "Currency", record.currency.clone()));
        fields.push(field(
            "country_capital",
            "Country Capital",
            record.country_capital.clone(),
        ));
    }
    fields
}

/// Build the panel for the current view state
pub fn render(view: &LookupView) -> Panel {
    if let Some(message) = view.error() {
        return Panel::Error {
            message: message.to_string(),
        };
    }
    match (view.visible_result(), view.toggle()) {
        (Some(record), Some(toggle)) => Panel::Result {
            fields: record_fields(record, view.is_expanded()),
            toggle,
        },
        _ => Panel::Empty,
    }
}

/// Shown fields as a flat JSON object keyed by response field name
pub fn fields_as_json(fields: &[ResultField]) -> serde_json::Value {
    let map = fields
        .iter()
        .map(|f| (f.key.to_string(), serde_json::Value::String(f.value.clone())))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}

/// Format a panel for terminal output
///
/// The toggle control is not part of the output; interactive front ends render
/// it themselves from the panel's `toggle`.
pub fn format_panel(panel: &Panel, format: OutputFormat) -> String {
    match panel {
        Panel::Empty => String::new(),
        Panel::Error { message } => match format {
            f if f.is_json() => serde_json::json!({ "error": message }).to_string(),
            _ => message.clone(),
        },
        Panel::Result { fields, .. } => format_fields(fields, format),
    }
}

fn format_fields(fields: &[ResultField], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            #[cfg(feature = "display")]
            {
                use tabled::settings::Style;
                use tabled::Table;
                Table::new(fields).with(Style::rounded()).to_string()
            }
            #[cfg(not(feature = "display"))]
            {
                // Fall back to labeled lines when display feature is not enabled
                format_fields(fields, OutputFormat::Text)
            }
        }
        OutputFormat::Markdown => {
            #[cfg(feature = "display")]
            {
                use tabled::settings::Style;
                use tabled::Table;
                Table::new(fields).with(Style::markdown()).to_string()
            }
            #[cfg(not(feature = "display"))]
            {
                format_fields(fields, OutputFormat::Text)
            }
        }
        OutputFormat::Text => fields
            .iter()
            .map(|f| format!("{}: {}", f.label, f.value))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json | OutputFormat::JsonLine => fields_as_json(fields).to_string(),
        OutputFormat::JsonPretty => {
            serde_json::to_string_pretty(&fields_as_json(fields)).unwrap_or_default()
        }
        OutputFormat::Psv => {
            let header = fields.iter().map(|f| f.key).collect::<Vec<_>>().join("|");
            let row = fields
                .iter()
                .map(|f| f.value.as_str())
                .collect::<Vec<_>>()
                .join("|");
            format!("{}\n{}", header, row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::lookup::{LookupFailure, LookupOutcome};
    use crate::lens::view::fixtures::record;
    use crate::lens::view::ViewEvent;

    fn loaded_view(query: &str, ip: &str) -> LookupView {
        let mut view = LookupView::new();
        view.apply(ViewEvent::InputChanged(ip.to_string()));
        view.apply(ViewEvent::Submit);
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record(ip, Some(37.4), Some(-122.1))),
        });
        view.apply(ViewEvent::InputChanged(query.to_string()));
        view
    }

    #[test]
    fn test_default_and_expanded_fields() {
        let mut view = loaded_view("8.8.8.8", "8.8.8.8");
        let Panel::Result { fields, toggle } = render(&view) else {
            panic!("expected result panel");
        };
        assert_eq!(toggle, Toggle::SeeMore);
        let labels: Vec<_> = fields.iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            vec!["Country", "City", "IP Version", "Latitude", "Longitude"]
        );
        assert_eq!(fields[3].value, "37.4");
        assert_eq!(fields[4].value, "-122.1");

        view.apply(ViewEvent::ShowMore);
        let Panel::Result { fields, toggle } = render(&view) else {
            panic!("expected result panel");
        };
        assert_eq!(toggle, Toggle::SeeLess);
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[5].value, "USD");
        assert_eq!(fields[6].label, "Country Capital");
    }

    #[test]
    fn test_stale_or_empty_query_renders_nothing() {
        assert_eq!(render(&loaded_view("8.8.4.4", "8.8.8.8")), Panel::Empty);
        assert_eq!(render(&loaded_view("", "8.8.8.8")), Panel::Empty);
        assert_eq!(render(&LookupView::new()), Panel::Empty);
    }

    #[test]
    fn test_error_panel() {
        let mut view = LookupView::new();
        view.apply(ViewEvent::InputChanged("1.2.3.4".to_string()));
        view.apply(ViewEvent::Submit);
        assert_eq!(render(&view), Panel::Empty);

        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupFailure::ServiceError("Invalid IP".to_string()).into(),
        });
        let panel = render(&view);
        assert_eq!(
            panel,
            Panel::Error {
                message: "Invalid IP".to_string()
            }
        );
        assert_eq!(format_panel(&panel, OutputFormat::Text), "Invalid IP");
        assert_eq!(
            format_panel(&panel, OutputFormat::Json),
            r#"{"error":"Invalid IP"}"#
        );
    }

    #[test]
    fn test_missing_values() {
        let mut rec = record("8.8.8.8", None, None);
        rec.city = None;
        let fields = record_fields(&rec, false);
        assert_eq!(fields[1].value, MISSING_VALUE);
        assert_eq!(fields[3].value, MISSING_VALUE);
    }

    #[test]
    fn test_format_fields() {
        let fields = record_fields(&record("8.8.8.8", Some(37.4), Some(-122.1)), false);

        let text = format_fields(&fields, OutputFormat::Text);
        assert!(text.starts_with("Country: United States\nCity: Mountain View"));

        let json: serde_json::Value =
            serde_json::from_str(&format_fields(&fields, OutputFormat::Json)).unwrap();
        assert_eq!(json["city"], "Mountain View");
        assert_eq!(json["latitude"], "37.4");
        assert!(json.get("currency").is_none());

        let psv = format_fields(&fields, OutputFormat::Psv);
        assert_eq!(
            psv.lines().next(),
            Some("country_name|city|version|latitude|longitude")
        );

        let table = format_fields(&fields, OutputFormat::Table);
        assert!(table.contains("Mountain View"));
    }
}
