use clap::{Parser, Subcommand};

use pinyin_cli::commands::{config_ops, mode_ops, replay_ops};

#[derive(Parser)]
#[command(name = "pyime", about = "Pinyin input session tool")]
struct Cli {
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed a key script through an input session and print every response
    Replay {
        /// Script file, or - for stdin
        script: String,
        /// Lexicon TOML (default: embedded lexicon)
        #[arg(long)]
        lexicon: Option<String>,
        /// Settings TOML (default: embedded settings)
        #[arg(long)]
        settings: Option<String>,
        /// One JSON object per line instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply mode triggers to a mode and print each packed mode
    Mode {
        /// Mode name (skb-chinese, hkb-english, ...) or packed word (0x...)
        start: String,
        /// Triggers: shift, lang, sym, phone-sym, more-sym, smiley
        triggers: Vec<String>,
    },
    /// Export or validate settings TOML
    Settings {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Export or validate lexicon TOML
    Lexicon {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the embedded default
    Export,
    /// Validate a custom file
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    pinyin_cli::init_tracing(cli.verbose);

    match cli.command {
        Command::Replay {
            script,
            lexicon,
            settings,
            json,
        } => replay_ops::replay_cmd(&script, lexicon.as_deref(), settings.as_deref(), json),
        Command::Mode { start, triggers } => mode_ops::mode_cmd(&start, &triggers),
        Command::Settings { action } => match action {
            ConfigAction::Export => config_ops::settings_export(),
            ConfigAction::Validate { file } => config_ops::settings_validate(&file),
        },
        Command::Lexicon { action } => match action {
            ConfigAction::Export => config_ops::lexicon_export(),
            ConfigAction::Validate { file } => config_ops::lexicon_validate(&file),
        },
    }
}
