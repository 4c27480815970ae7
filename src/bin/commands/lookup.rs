use super::{lookup_wait, map_json, map_lines, wait_with_spinner};
use clap::Args;
use ipgeo::lens::lookup::{GeoSource, LookupLens};
use ipgeo::lens::map::{MapBinder, MapSettings, TileMap};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::lens::validate::{is_valid_ip_format, FORMAT_ALERT};
use ipgeo::lens::view::presenter::{fields_as_json, format_panel};
use ipgeo::lens::view::{LookupSession, Panel};
use ipgeo::IpgeoConfig;
use json_to_table::json_to_table;
use serde_json::json;

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    /// IP address to look up, e.g. "8.8.8.8" or "2606:4700:4700::1111"
    #[clap(value_name = "IP")]
    pub query: String,

    /// Also show currency and country capital
    #[clap(short, long)]
    pub more: bool,

    /// Print the unclassified service response
    #[clap(long)]
    pub raw: bool,
}

pub fn run(config: &IpgeoConfig, args: LookupArgs, output_format: OutputFormat) -> bool {
    let LookupArgs { query, more, raw } = args;

    if let Some(problem) = query_problem(&query) {
        eprintln!("ERROR: {}", problem);
        return false;
    }

    let lens = LookupLens::from_config(config);

    if raw {
        return print_raw(&lens, &query, output_format);
    }

    let binder = MapBinder::new(TileMap::new(), MapSettings::from(config));
    let mut session = LookupSession::new(lens, binder);

    session.input(&query);
    let alerts = session.submit();
    if !alerts.is_empty() {
        for alert in alerts {
            eprintln!("ERROR: {}", alert);
        }
        return false;
    }

    if !wait_with_spinner(&mut session, lookup_wait(config.timeout())) {
        eprintln!("ERROR: lookup for {} timed out", query);
        return false;
    }

    if more {
        session.show_more();
    }

    let panel = session.panel();
    match &panel {
        Panel::Empty => {
            let resolved = session
                .view()
                .result()
                .map(|r| r.ip.clone())
                .unwrap_or_default();
            eprintln!(
                "ERROR: service answered for {} instead of {}",
                resolved, query
            );
            false
        }
        Panel::Error { message } => {
            eprintln!("ERROR: {}", message);
            false
        }
        Panel::Result { fields, .. } => {
            let map = session.visible_map();
            if output_format.is_json() {
                let mut value = fields_as_json(fields);
                value["ip"] = json!(query);
                value["map"] = map.map(map_json).unwrap_or(serde_json::Value::Null);
                let output = match output_format {
                    OutputFormat::JsonPretty => serde_json::to_string_pretty(&value),
                    _ => serde_json::to_string(&value),
                };
                match output {
                    Ok(s) => println!("{}", s),
                    Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
                }
            } else {
                println!("{}", format_panel(&panel, output_format));
                if let Some(map) = map {
                    if output_format != OutputFormat::Psv {
                        println!();
                        for line in map_lines(map) {
                            println!("{}", line);
                        }
                    }
                }
            }
            true
        }
    }
}

/// Problems caught before anything is submitted
fn query_problem(query: &str) -> Option<&'static str> {
    match query.trim().is_empty() {
        true => Some("no IP address given"),
        false => None,
    }
}

fn print_raw<S: GeoSource>(lens: &LookupLens<S>, query: &str, output_format: OutputFormat) -> bool {
    if !is_valid_ip_format(query) {
        eprintln!("ERROR: {}", FORMAT_ALERT);
        return false;
    }

    let resp = match lens.source().fetch(query) {
        Ok(resp) => resp,
        Err(e) => {
            eprintln!("ERROR: unable to get ip information: {e}");
            return false;
        }
    };

    let json_value = json!(&resp);
    if output_format.is_json() {
        if let Err(e) = serde_json::to_writer_pretty(std::io::stdout(), &json_value) {
            eprintln!("Error writing JSON to stdout: {}", e);
        }
        println!();
    } else {
        let mut table = json_to_table(&json_value);
        table.collapse();
        println!("{}", table);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_problem() {
        assert_eq!(query_problem(""), Some("no IP address given"));
        assert_eq!(query_problem("  "), Some("no IP address given"));
        assert_eq!(query_problem("8.8.8.8"), None);
        // malformed input is left to the validator
        assert_eq!(query_problem("999.1.1.1"), None);
    }
}
