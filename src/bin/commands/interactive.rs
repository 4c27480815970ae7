use super::{lookup_wait, map_lines, wait_with_spinner};
use clap::Args;
use ipgeo::lens::lookup::LookupLens;
use ipgeo::lens::map::{MapBinder, MapSettings, TileMap};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::lens::view::presenter::format_panel;
use ipgeo::lens::view::{LookupSession, Panel};
use ipgeo::IpgeoConfig;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::debug;

const HELP: &str = "\
Enter an IPv4 or IPv6 address to look it up.
  :more    show currency and country capital
  :less    hide them again
  :clear   clear the input and the result
  :help    show this help
  :quit    leave (Ctrl-D works too)
An empty line clears, like erasing the input box.";

/// Arguments for the Interactive command
#[derive(Args)]
pub struct InteractiveArgs {
    /// Look this address up before the first prompt
    #[clap(value_name = "IP")]
    pub initial: Option<String>,

    /// Hide the map summary under results
    #[clap(long)]
    pub no_map: bool,
}

enum Command<'a> {
    Lookup(&'a str),
    More,
    Less,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    match line {
        "" | ":clear" => Command::Clear,
        ":more" => Command::More,
        ":less" => Command::Less,
        ":help" | "?" => Command::Help,
        ":quit" | ":q" | ":exit" => Command::Quit,
        cmd if cmd.starts_with(':') => Command::Unknown(cmd),
        query => Command::Lookup(query),
    }
}

pub fn run(config: &IpgeoConfig, args: InteractiveArgs, output_format: OutputFormat) -> bool {
    let InteractiveArgs { initial, no_map } = args;

    let lens = LookupLens::from_config(config);
    let binder = MapBinder::new(TileMap::new(), MapSettings::from(config));
    let mut session = LookupSession::new(lens, binder);
    let timeout = lookup_wait(config.timeout());

    eprintln!("ipgeo interactive lookup, type :help for commands");

    if let Some(query) = initial {
        lookup(&mut session, &query, timeout);
        show(&session, output_format, no_map);
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("ip> ");
        if let Err(e) = std::io::stderr().flush() {
            eprintln!("ERROR: {}", e);
            return false;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("ERROR: unable to read input: {}", e);
                return false;
            }
            None => break,
        };

        // pick up lookups that outlived their spinner
        while session.next_completion(Duration::ZERO) {}

        match parse_line(&line) {
            Command::Quit => break,
            Command::Help => {
                eprintln!("{}", HELP);
                continue;
            }
            Command::Unknown(cmd) => {
                eprintln!("unknown command {}, type :help for commands", cmd);
                continue;
            }
            Command::Clear => session.clear(),
            Command::More => session.show_more(),
            Command::Less => session.show_less(),
            Command::Lookup(query) => lookup(&mut session, query, timeout),
        }
        show(&session, output_format, no_map);
        let binder = session.binder();
        debug!(
            "{} live map(s), bound to {:?} at zoom {}",
            binder.widget().live(),
            binder.bound_address(),
            binder.settings().zoom
        );
    }

    true
}

fn lookup(
    session: &mut LookupSession<ipgeo::IpapiSource, TileMap>,
    query: &str,
    timeout: Duration,
) {
    session.input(query);
    for alert in session.submit() {
        eprintln!("ERROR: {}", alert);
    }
    if !wait_with_spinner(session, timeout) {
        eprintln!("lookup for {} is still running, its result shows up once it completes", query);
    }
}

fn show(
    session: &LookupSession<ipgeo::IpapiSource, TileMap>,
    output_format: OutputFormat,
    no_map: bool,
) {
    let panel = session.panel();
    match &panel {
        Panel::Empty => {}
        Panel::Error { message } => eprintln!("ERROR: {}", message),
        Panel::Result { toggle, .. } => {
            println!("{}", format_panel(&panel, output_format));
            eprintln!("[{}] type :{}", toggle.label(), toggle_command(*toggle));
            if let Some(map) = session.visible_map().filter(|_| !no_map) {
                for line in map_lines(map) {
                    println!("{}", line);
                }
            }
        }
    }
}

fn toggle_command(toggle: ipgeo::lens::view::Toggle) -> &'static str {
    match toggle {
        ipgeo::lens::view::Toggle::SeeMore => "more",
        ipgeo::lens::view::Toggle::SeeLess => "less",
    }
}
