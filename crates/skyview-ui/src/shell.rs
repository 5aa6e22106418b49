//! Interactive terminal front end.
//!
//! stdin commands, auto-refresh ticks and service results are handled one at
//! a time from a single `select!` loop, so the model is never touched
//! concurrently.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use skyview_core::{Config, TemperatureUnit};

use crate::models::{Notice, NoticeLevel, WeatherModel};
use crate::services::WeatherService;

const HELP: &str = "\
Commands:
  lookup <address>   get weather for an address (bare text works too,
                     unless it starts with a lowercase command word)
  unit <c|f>         switch between Celsius and Fahrenheit
  fav                add the displayed location to favorites
  favs               list favorites
  open <n>           look up favorite number n
  history            list this session's lookups
  save <path>        write the displayed text to a file
  refresh            re-fetch the last location now
  help               show this message
  quit               exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Lookup(String),
    Unit(TemperatureUnit),
    AddFavorite,
    ListFavorites,
    OpenFavorite(usize),
    History,
    Save(PathBuf),
    Refresh,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Command {
    /// Parse one input line.
    ///
    /// A line is a command only when it starts with a lowercase keyword and
    /// the rest fits that command; anything else is an address. `lookup`
    /// forces an address that would otherwise read as a command.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let address = || Command::Lookup(line.to_string());

        match (word, rest.is_empty()) {
            ("", _) => Command::Empty,
            ("lookup", _) => Command::Lookup(rest.to_string()),
            ("unit", true) => Command::Invalid("Usage: unit <c|f>".to_string()),
            ("unit", false) => match rest.parse() {
                Ok(unit) => Command::Unit(unit),
                Err(_) if !rest.contains(char::is_whitespace) => {
                    Command::Invalid(format!("Unknown unit '{}'. Use c or f.", rest))
                }
                Err(_) => address(),
            },
            ("open", true) => Command::Invalid("Usage: open <n> (n starts at 1)".to_string()),
            ("open", false) => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Command::OpenFavorite(n - 1),
                Ok(_) => Command::Invalid("Favorites are numbered from 1".to_string()),
                Err(_) => address(),
            },
            ("save", true) => Command::Invalid("Usage: save <path>".to_string()),
            ("save", false) => Command::Save(PathBuf::from(rest)),
            ("fav", true) => Command::AddFavorite,
            ("favs", true) => Command::ListFavorites,
            ("history", true) => Command::History,
            ("refresh", true) => Command::Refresh,
            ("help" | "?", true) => Command::Help,
            ("quit" | "exit", true) => Command::Quit,
            _ => address(),
        }
    }
}

fn print_notices(notices: Vec<Notice>) {
    for n in notices {
        match n.level {
            NoticeLevel::Info => println!("[{}] {}", n.title, n.message),
            NoticeLevel::Warning => println!("[!] {}: {}", n.title, n.message),
        }
    }
}

fn print_display(model: &WeatherModel) {
    println!("\n{}", model.summary());
    if let Some(icon) = model.icon() {
        println!("(icon {}x{})", icon.width(), icon.height());
    }
    println!("\n{}", model.forecast());
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        println!("{}: (empty)", title);
        return;
    }
    println!("{}:", title);
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
}

fn prompt(unit: TemperatureUnit) {
    print!("[{}] > ", unit.suffix());
    let _ = std::io::stdout().flush();
}

/// Returns false when the shell should exit.
fn handle_command(model: &mut WeatherModel, command: Command) -> bool {
    match command {
        Command::Lookup(address) => {
            if model.submit_address(&address) {
                println!("Looking up '{}'...", address.trim());
            }
        }
        Command::Unit(unit) => {
            model.set_unit(unit);
            println!("Unit set to {}", unit);
        }
        Command::AddFavorite => {
            model.add_to_favorites();
            print_list("Favorites", model.session().favorites());
        }
        Command::ListFavorites => print_list("Favorites", model.session().favorites()),
        Command::OpenFavorite(index) => {
            model.open_favorite(index);
        }
        Command::History => print_list("History", model.session().history()),
        Command::Save(path) => {
            model.save(&path);
        }
        Command::Refresh => {
            if !model.refresh() {
                println!("Nothing to refresh yet.");
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Empty => {}
        Command::Invalid(msg) => println!("{}", msg),
    }
    true
}

/// Run the shell until `quit` or end of input.
pub async fn run(config: Config) -> Result<()> {
    let (service, mut rx) = WeatherService::new(&config, tokio::runtime::Handle::current())
        .context("Failed to create weather service")?;
    let service = Arc::new(service);
    let mut model = WeatherModel::new(service.clone(), config.weather.default_unit);

    let period = Duration::from_secs(config.weather.refresh_interval_secs);
    let refresh_enabled = !period.is_zero();
    // interval_at panics on a zero period; the branch is disabled in that case anyway
    let mut ticker = interval_at(
        Instant::now() + period.max(Duration::from_secs(1)),
        period.max(Duration::from_secs(1)),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("SkyView - type 'help' for commands.");
    println!("{}\n\n{}", model.summary(), model.forecast());
    prompt(model.unit());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if !handle_command(&mut model, Command::parse(&line)) {
                    break;
                }
            }
            _ = ticker.tick(), if refresh_enabled => {
                tracing::debug!("Auto-refresh tick");
                model.refresh();
            }
            Some(msg) = rx.recv() => {
                model.apply(msg);
            }
        }

        print_notices(model.take_notices());
        if model.take_changed() {
            print_display(&model);
        }
        prompt(model.unit());
    }

    service.cancel();
    println!();
    tracing::info!("Shell exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lookup_forms() {
        assert_eq!(
            Command::parse("lookup 1600 Amphitheatre Parkway"),
            Command::Lookup("1600 Amphitheatre Parkway".into())
        );
        assert_eq!(Command::parse("Paris, France"), Command::Lookup("Paris, France".into()));
        assert_eq!(Command::parse("lookup"), Command::Lookup(String::new()));
    }

    #[test]
    fn parse_unit() {
        assert_eq!(Command::parse("unit f"), Command::Unit(TemperatureUnit::Fahrenheit));
        assert_eq!(Command::parse("unit Celsius"), Command::Unit(TemperatureUnit::Celsius));
        assert!(matches!(Command::parse("unit k"), Command::Invalid(_)));
        assert!(matches!(Command::parse("unit"), Command::Invalid(_)));
    }

    #[test]
    fn parse_open_is_one_based() {
        assert_eq!(Command::parse("open 1"), Command::OpenFavorite(0));
        assert!(matches!(Command::parse("open 0"), Command::Invalid(_)));
        assert!(matches!(Command::parse("open"), Command::Invalid(_)));
    }

    #[test]
    fn parse_misc() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("save /tmp/w.txt"), Command::Save("/tmp/w.txt".into()));
        assert!(matches!(Command::parse("save"), Command::Invalid(_)));
        assert_eq!(Command::parse("fav"), Command::AddFavorite);
        assert_eq!(Command::parse("favs"), Command::ListFavorites);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn addresses_starting_with_command_words_are_looked_up() {
        for line in [
            "Save Street",
            "Help Lane",
            "Open Road 5",
            "open road 5",
            "Refresh Court",
            "history museum",
            "unit 4 main st",
            "Quit",
        ] {
            assert_eq!(Command::parse(line), Command::Lookup(line.to_string()), "{}", line);
        }
        assert_eq!(
            Command::parse("lookup save street"),
            Command::Lookup("save street".into())
        );
    }
}
