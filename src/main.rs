use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use shanky::terminal::Terminal;
use shanky::{
    CountSpec, DeckStore, FlushPolicy, MasteryRule, ResetReport, Result, SessionConfig, Shanky,
    ShankyError,
};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

const BANNER: &str = r"
███████╗██╗  ██╗ █████╗ ███╗   ██╗██╗  ██╗██╗   ██╗
██╔════╝██║  ██║██╔══██╗████╗  ██║██║ ██╔╝╚██╗ ██╔╝
███████╗███████║███████║██╔██╗ ██║█████╔╝  ╚████╔╝
╚════██║██╔══██║██╔══██║██║╚██╗██║██╔═██╗   ╚██╔╝
███████║██║  ██║██║  ██║██║ ╚████║██║  ██╗   ██║
╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝╚═╝  ╚═╝   ╚═╝
";

#[derive(Parser)]
#[command(name = "shanky", about = "A simple flashcard app for the terminal", version)]
struct Cli {
    /// Directory holding one CSV file per deck
    #[arg(long, env = "SHANKY_DECKS_DIR", default_value = "decks")]
    decks_dir: PathBuf,

    /// Seed for card admission, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// How answers are graded: binary or graduated
    #[arg(long, default_value_t = MasteryRule::Binary)]
    rule: MasteryRule,

    /// When scores are written back: every-card or end-of-session
    #[arg(long, default_value_t = FlushPolicy::EveryCard)]
    flush: FlushPolicy,

    /// Stop a session after this many sweeps over the deck
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Log level written to stderr
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Practice a deck
    Practice {
        deck: String,
        /// Number of cards, or `a` for all (default 10)
        count: Option<String>,
    },
    /// Set all card scores in a deck to 1
    Reset { deck: String },
    /// Set all card scores in all decks to 1
    ResetAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print statistics for a deck
    Stats {
        deck: String,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available decks
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
enum MenuCommand {
    #[strum(to_string = "practice", serialize = "p")]
    Practice,
    #[strum(to_string = "reset-deck", serialize = "r")]
    ResetDeck,
    #[strum(to_string = "reset-all-decks", serialize = "ra")]
    ResetAllDecks,
    #[strum(to_string = "get-statistics", serialize = "gs")]
    GetStatistics,
    #[strum(to_string = "help", serialize = "h")]
    Help,
    #[strum(to_string = "quit", serialize = "q")]
    Quit,
}

impl MenuCommand {
    fn shorthand(self) -> &'static str {
        match self {
            Self::Practice => "p",
            Self::ResetDeck => "r",
            Self::ResetAllDecks => "ra",
            Self::GetStatistics => "gs",
            Self::Help => "h",
            Self::Quit => "q",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Practice => "Starts practice session for chosen deck.",
            Self::ResetDeck => "Sets all card scores in chosen deck to 1.",
            Self::ResetAllDecks => "Sets all card scores in all decks to 1.",
            Self::GetStatistics => "Prints statistics for a specified deck.",
            Self::Help => "Shows this list.",
            Self::Quit => "Exit the program.",
        }
    }
}

type Console<'a> = Terminal<io::StdinLock<'a>, io::Stdout>;

fn setup_logging(level: LevelFilter) -> std::result::Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = setup_logging(cli.log_level) {
        eprintln!("could not set up logging: {err}");
    }

    let store = DeckStore::new(&cli.decks_dir);
    let config = SessionConfig {
        rule: cli.rule,
        flush: cli.flush,
        max_sweeps: cli.max_sweeps,
        ..Default::default()
    };
    let mut shanky = match cli.seed {
        Some(seed) => Shanky::with_seed(store, config, seed),
        None => Shanky::new(store, config),
    };
    let mut console = Terminal::new(io::stdin().lock(), io::stdout());

    let outcome = match cli.command {
        Some(command) => run_command(&mut shanky, &mut console, command),
        None => menu(&mut shanky, &mut console),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(shanky: &mut Shanky, console: &mut Console<'_>, command: Command) -> Result<()> {
    match command {
        Command::Practice { deck, count } => {
            let count = count.as_deref().map(CountSpec::parse).unwrap_or_default();
            let summary = shanky.practice(&deck, count, console)?;
            console.say(format!("\n{summary}"))
        }
        Command::Reset { deck } => {
            let cards = shanky.reset_deck(&deck)?;
            console.say(format!(
                "All {cards} card(s) in deck '{deck}' have been reset to score 1."
            ))
        }
        Command::ResetAll { yes } => {
            if yes || confirm_reset_all(console)? {
                let report = shanky.reset_all_decks()?;
                print_reset_report(console, &report)
            } else {
                console.say("Reset aborted.")
            }
        }
        Command::Stats { deck, json } => {
            let stats = shanky.generate_statistics(&deck)?;
            if json {
                console.say(stats.to_json()?)
            } else {
                console.say(stats.to_string())
            }
        }
        Command::List => print_decks(console, &shanky.list_decks()?).map(|_| ()),
    }
}

fn menu(shanky: &mut Shanky, console: &mut Console<'_>) -> Result<()> {
    console.say(format!("\nWelcome to\n{BANNER}\nA simple flashcard app\nfor the terminal!"))?;
    print_help(console)?;
    loop {
        let Some(line) = console.prompt("\nEnter a command: ")? else {
            return Ok(());
        };
        let (name, argument) = match line.split_once(' ') {
            Some((name, argument)) => (name, Some(argument.trim().to_owned())),
            None => (line.as_str(), None),
        };
        let Ok(command) = name.parse::<MenuCommand>() else {
            console.say(format!("Error: '{line}' is not a valid command."))?;
            continue;
        };
        if command == MenuCommand::Quit {
            console.say("Exiting program. Goodbye!")?;
            return Ok(());
        }
        // Operation failures are reported and the menu carries on; only a broken
        // console ends the loop.
        if let Err(err) = menu_command(shanky, console, command, argument) {
            if matches!(err, ShankyError::Prompt { .. }) {
                return Err(err);
            }
            console.say(format!("Error: {err}"))?;
        }
    }
}

fn menu_command(
    shanky: &mut Shanky,
    console: &mut Console<'_>,
    command: MenuCommand,
    argument: Option<String>,
) -> Result<()> {
    match command {
        MenuCommand::Practice => {
            let decks = print_decks(console, &shanky.list_decks()?)?;
            if decks.is_empty() {
                return console.say("No decks available for practice.");
            }
            let deck = match argument {
                Some(deck) => deck,
                None => ask(console, "Which deck would you like to practice? ")?,
            };
            if !decks.contains(&deck) {
                return console
                    .say("Error: Specified deck does not exist. Practice session aborted.");
            }
            let count = ask(
                console,
                "How many cards would you like to practice? \
                 (Press Enter for default 10, 'a' for all cards): ",
            )?;
            let summary = shanky.practice(&deck, CountSpec::parse(&count), console)?;
            console.say(format!("\n{summary}"))?;
            pause(console)
        }
        MenuCommand::ResetDeck => {
            let deck = match argument {
                Some(deck) => deck,
                None => ask(console, "Which deck would you like to reset? ")?,
            };
            if deck.is_empty() {
                return console.say("Error: No deck specified. Reset aborted.");
            }
            run_command(shanky, console, Command::Reset { deck })?;
            pause(console)
        }
        MenuCommand::ResetAllDecks => {
            run_command(shanky, console, Command::ResetAll { yes: false })?;
            pause(console)
        }
        MenuCommand::GetStatistics => {
            let deck = match argument {
                Some(deck) => deck,
                None => ask(console, "Enter the name of the deck to analyze: ")?,
            };
            if deck.is_empty() {
                return console.say("Error: No deck specified. Statistics request aborted.");
            }
            run_command(shanky, console, Command::Stats { deck, json: false })?;
            pause(console)
        }
        MenuCommand::Help => print_help(console),
        MenuCommand::Quit => Ok(()),
    }
}

fn ask<I: BufRead, O: Write>(console: &mut Terminal<I, O>, question: &str) -> Result<String> {
    Ok(console.prompt(question)?.unwrap_or_default())
}

fn pause<I: BufRead, O: Write>(console: &mut Terminal<I, O>) -> Result<()> {
    console.prompt("Press enter to go back to the menu.")?;
    Ok(())
}

fn confirm_reset_all<I: BufRead, O: Write>(console: &mut Terminal<I, O>) -> Result<bool> {
    let answer = ask(
        console,
        "Are you sure you want to reset the score of all the decks?(yes/no) ",
    )?;
    Ok(answer == "yes")
}

fn print_help<I: BufRead, O: Write>(console: &mut Terminal<I, O>) -> Result<()> {
    console.say("\nAvailable Commands:")?;
    for command in MenuCommand::iter() {
        let name = format!("{command} ({})", command.shorthand());
        console.say(format!("  {name:<24}- {}", command.description()))?;
    }
    Ok(())
}

fn print_decks<I: BufRead, O: Write>(
    console: &mut Terminal<I, O>,
    decks: &[String],
) -> Result<Vec<String>> {
    console.say("\nAvailable decks:")?;
    if decks.is_empty() {
        console.say("No decks available.")?;
    }
    for deck in decks {
        console.say(format!("  - {deck}"))?;
    }
    Ok(decks.to_vec())
}

fn print_reset_report<I: BufRead, O: Write>(
    console: &mut Terminal<I, O>,
    report: &ResetReport,
) -> Result<()> {
    for (deck, cards) in &report.reset {
        console.say(format!(
            "All {cards} card(s) in deck '{deck}' have been reset to score 1."
        ))?;
    }
    for (deck, err) in &report.failed {
        console.say(format!("Could not reset deck '{deck}': {err}"))?;
    }
    Ok(())
}
