// src/bin/area_picker.rs
// Interactive area picker: drives the debounced suggestion input from the terminal.
// Each stdin line is the full text of the input after a keystroke.
//   :N   select entry N of the current list
//   :x   click outside (dismiss the panel)
//   :q   quit
use anyhow::Context;
use dotenv::dotenv;
use estate_portal::config::Config;
use estate_portal::services::{
    AreaSearchSource, BackendClient, InputOptions, PanelView, Phase, PointerTarget, Selection, SuggestionInput,
};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, PartialEq)]
enum Command {
    Type(String),
    Select(usize),
    Dismiss,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Command {
        match line.trim_end_matches(&['\r', '\n'][..]) {
            ":q" => Command::Quit,
            ":x" => Command::Dismiss,
            other => match other.strip_prefix(':').and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n > 0 => Command::Select(n - 1),
                _ => Command::Type(other.to_string()),
            },
        }
    }
}

fn render(view: &PanelView) {
    match view {
        PanelView::Closed => {}
        PanelView::Loading => println!("{}  …{}", CYAN, RESET),
        PanelView::Empty { message } => println!("{}  {}{}", YELLOW, message, RESET),
        PanelView::Items(items) => {
            for (i, item) in items.iter().enumerate() {
                let coords = item
                    .coordinates
                    .map(|c| format!("({:.5}, {:.5})", c.lat, c.lng))
                    .unwrap_or_else(|| "(no coordinates)".to_string());
                println!("  {}{:>2}.{} {} {}", BOLD, i + 1, RESET, item.display_name, coords);
            }
        }
    }
}

fn print_selection(selection: &Selection) {
    let coords = selection
        .coordinates
        .map(|c| format!("{}, {}", c.lat, c.lng))
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "{}✅ Selected {} (id {}) at {}{}",
        GREEN, selection.description, selection.id, coords, RESET
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    let locale = config.default_locale;

    let client = Arc::new(BackendClient::from_config(&config).context("backend client")?);
    let options = InputOptions {
        default_value: env::args().nth(1).unwrap_or_default(),
        placeholder: "Search for an area".to_string(),
        quiet_period: config.suggest_debounce(),
        locale,
        ..InputOptions::default()
    };

    println!("{}╔══════════════════════════════════════════╗{}", CYAN, RESET);
    println!("{}║   📍 Area picker ({})                     ║{}", CYAN, locale.code(), RESET);
    println!("{}╚══════════════════════════════════════════╝{}", CYAN, RESET);
    println!("Backend: {}", client.base_url());
    println!("Type to search, :N to select, :x to dismiss, :q to quit\n");

    let mounted = !options.default_value.is_empty();
    let input = Arc::new(SuggestionInput::new(
        AreaSearchSource::new(client, locale),
        options,
        |selection| print_selection(&selection),
    ));

    // Print the panel whenever a fresh list lands
    let renderer = {
        let input = input.clone();
        let mut phases = input.subscribe();
        tokio::spawn(async move {
            while phases.changed().await.is_ok() {
                let phase = *phases.borrow_and_update();
                if let Phase::Showing(_) = phase {
                    render(&input.view().await);
                }
            }
        })
    };

    if mounted {
        input.mount().await;
        input.focus().await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Dismiss => {
                input.pointer_down(PointerTarget::Outside).await;
                println!("{}  (dismissed, text kept: \"{}\"){}", YELLOW, input.text().await, RESET);
            }
            Command::Select(index) => {
                if input.select(index).await.is_none() {
                    println!("{}❌ No entry {} in the current list{}", RED, index + 1, RESET);
                }
            }
            Command::Type(text) => input.type_text(text).await,
        }
    }

    // Let the last lookup land before exiting
    input.settled().await;
    renderer.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(":q"), Command::Quit);
        assert_eq!(Command::parse(":x"), Command::Dismiss);
        assert_eq!(Command::parse(":2"), Command::Select(1));
        assert_eq!(Command::parse(":0"), Command::Type(":0".to_string()));
        assert_eq!(Command::parse("Maadi\r"), Command::Type("Maadi".to_string()));
        assert_eq!(Command::parse(""), Command::Type(String::new()));
    }
}
