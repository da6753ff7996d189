//! Command-line interface for the typeahead demo
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and flag overrides
//! - The interactive loop driving a controller over a [`MemoryField`]

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::controller::Autocompleter;
use crate::engine::{QueryOutcome, ScriptedEngine, ScriptedSession};
use crate::error::{ConfigError, Result, TypeaheadError};
use crate::field::{ITEM_DATA_ATTR, InputField, MemoryField};
use crate::source::PrefixSource;

/// Entries offered when no word list is given
const DEFAULT_WORDS: &[&str] = &[
    "Amsterdam", "Athens", "Barcelona", "Bergen", "Berlin", "Bern", "Bordeaux", "Brussels",
    "Budapest", "Copenhagen", "Dublin", "Edinburgh", "Florence", "Geneva", "Hamburg",
    "Helsinki", "Lisbon", "London", "Lyon", "Madrid", "Malaga", "Milan", "Munich", "Naples",
    "Oslo", "Paris", "Porto", "Prague", "Rome", "Stockholm", "Valencia", "Vienna", "Warsaw",
    "Zurich",
];

/// Typeahead demo - drive a suggestion session from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "typeahead",
    version,
    about = "Interactive typeahead controller demo",
    long_about = "Type text to fetch suggestions from a word list, pick one, then edit the
field and blur it to watch strict-value reconciliation at work."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Word list, one entry per line
    #[arg(short = 'w', long, value_name = "FILE")]
    pub words: Option<PathBuf>,

    /// Minimum characters before suggestions are fetched
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Debounce interval in milliseconds
    #[arg(long, value_name = "MS", conflicts_with = "no_debounce")]
    pub debounce_ms: Option<u64>,

    /// Fetch immediately on every input
    #[arg(long)]
    pub no_debounce: bool,

    /// Keep free text after a selection instead of wiping the field
    #[arg(long)]
    pub lenient: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// One suggestion of the demo word list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub label: String,
    /// Position in the word list
    pub rank: usize,
}

/// A line typed at the demo prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoCommand {
    /// Replace the field text and query
    Input(String),
    /// Pick the suggestion at this index
    Pick(usize),
    /// Lose focus
    Blur,
    /// Reset the controller
    Reset,
    /// Print field and selection
    Show,
    Help,
    Quit,
}

impl DemoCommand {
    /// Parse a prompt line
    pub fn parse(line: &str) -> Result<Self> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(DemoCommand::Input(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        match parts.next().unwrap_or("") {
            "pick" | "p" => {
                let index = parts
                    .next()
                    .ok_or_else(|| TypeaheadError::Generic("Usage: :pick <index>".into()))?;
                index
                    .parse()
                    .map(DemoCommand::Pick)
                    .map_err(|_| TypeaheadError::Generic(format!("Invalid index: {index}")))
            }
            "blur" | "b" => Ok(DemoCommand::Blur),
            "reset" => Ok(DemoCommand::Reset),
            "show" | "s" => Ok(DemoCommand::Show),
            "help" | "h" => Ok(DemoCommand::Help),
            "quit" | "exit" | "q" => Ok(DemoCommand::Quit),
            other => Err(TypeaheadError::Generic(format!("Unknown command: :{other}"))),
        }
    }
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        Self::apply_overrides(&args, &mut config);
        Ok(Self { args, config })
    }

    /// Command-line flags take precedence over the config file
    fn apply_overrides(args: &CliArgs, config: &mut Config) {
        let autocomplete = &mut config.autocomplete;
        if let Some(min_length) = args.min_length {
            autocomplete.min_length = min_length;
        }
        if args.no_debounce {
            autocomplete.debounce_wait_ms = None;
        } else if let Some(ms) = args.debounce_ms {
            autocomplete.debounce_wait_ms = Some(ms);
        }
        if args.lenient {
            autocomplete.strict_value = false;
        }
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the word list, falling back to the built-in one
    pub fn load_entries(&self) -> Result<Vec<Entry>> {
        let words: Vec<String> = match &self.args.words {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()).into());
                }
                std::fs::read_to_string(path)?
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            None => DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        };

        Ok(words
            .into_iter()
            .enumerate()
            .map(|(rank, label)| Entry { label, rank })
            .collect())
    }

    /// Run the interactive loop until EOF or `:quit`
    pub async fn run(&self) -> Result<()> {
        let entries = self.load_entries()?;
        println!(
            "{} entries loaded. Type to search, :help for commands.",
            entries.len()
        );

        let field = MemoryField::new();
        let controller = Autocompleter::with_config(
            field.clone(),
            |entry: &Entry| entry.label.clone(),
            &self.config.autocomplete,
        );
        controller
            .set_fetcher(PrefixSource::new(entries, |entry: &Entry| entry.label.clone()))
            .on_render(|mut element, entry: &Entry, query| {
                element.set_attribute("data-rank", &entry.rank.to_string());
                if is_exact_match(&entry.label, query) {
                    element.add_class("exact");
                }
                element
            })
            .on_select(|entry: &Entry| println!("selected #{} {}", entry.rank, entry.label));

        let session = controller.create(&ScriptedEngine::new());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("[{}]> ", field.value());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match DemoCommand::parse(line.trim_end()) {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{e}");
                    continue;
                }
            };

            if command == DemoCommand::Quit {
                break;
            }
            Self::execute(command, &controller, &session, &field).await;
        }

        Ok(())
    }

    async fn execute(
        command: DemoCommand,
        controller: &Autocompleter<Entry, MemoryField>,
        session: &ScriptedSession<Entry, MemoryField>,
        field: &MemoryField,
    ) {
        match command {
            DemoCommand::Input(text) => {
                field.type_text(&text);
                match session.on_input().await {
                    Ok(QueryOutcome::TooShort) => println!("(keep typing)"),
                    Ok(QueryOutcome::Empty(msg)) => println!("{msg}"),
                    Ok(QueryOutcome::Rendered(_)) => {
                        for (index, element) in session.rendered().iter().enumerate() {
                            println!("  {index:>2}  {}  [{}]", element.text, element.classes.join(" "));
                        }
                    }
                    Err(e) => eprintln!("Fetch failed: {e}"),
                }
            }
            DemoCommand::Pick(index) => {
                if !session.pick(index) {
                    eprintln!("No suggestion at index {index}");
                }
            }
            DemoCommand::Blur => {
                if field.blur() {
                    println!("change -> {:?}", controller.selection_state());
                }
            }
            DemoCommand::Reset => controller.reset(),
            DemoCommand::Show => {
                println!("field:    {:?}", field.value());
                println!("selected: {:?}", controller.selected_item());
                println!("state:    {:?}", controller.selection_state());
                if let Some(json) = field.attribute(ITEM_DATA_ATTR) {
                    println!("data:     {json}");
                }
            }
            DemoCommand::Help => print_help(),
            DemoCommand::Quit => {}
        }
    }
}

/// Whether `label` is exactly the typed query, ignoring ASCII case
fn is_exact_match(label: &str, query: &str) -> bool {
    label.eq_ignore_ascii_case(query)
}

fn print_help() {
    println!("  <text>        type into the field and fetch suggestions");
    println!("  :pick <n>     pick suggestion n");
    println!("  :blur         leave the field (fires the change check)");
    println!("  :reset        clear selection and field");
    println!("  :show         print field, selection and state");
    println!("  :quit         exit");
}
