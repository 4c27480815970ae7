use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    #[serde(flatten)]
    settings: &'a IpgeoConfig,
}

pub fn run(config: &IpgeoConfig, output_format: OutputFormat) -> bool {
    let config_info = ConfigInfo {
        config_file: IpgeoConfig::config_file_path(),
        settings: config,
    };

    let serialized = match output_format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&config_info),
        f if f.is_json() => serde_json::to_string(&config_info),
        _ => {
            println!("ipgeo Configuration");
            println!("===================\n");
            println!("{}", config.summary());
            eprintln!();
            eprintln!("Tips:");
            eprintln!("  Override any setting with an IPGEO_ environment variable, e.g. IPGEO_MAP_ZOOM=10");
            return true;
        }
    };

    match serialized {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Error serializing config info: {}", e);
            false
        }
    }
}
