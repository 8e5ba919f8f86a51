//! # Verdant
//!
//! A terminal plant-care tracker written in Rust. Verdant combines a fast CLI for quick entry with a TUI (Terminal User Interface) for browsing plants and running guided care sessions.
//!
//! ## Features
//!
//! *   **Three care tracks per plant**: watering (always on), rotation and fertilizing (optional), each with its own recurrence.
//! *   **Due-date scheduling**: completing a task anchors the next due date to the start of day, so reminders surface at day granularity.
//! *   **Guided care sessions**: walk plant-by-plant through everything due today; the session advances itself once a plant's tasks are done.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard and session runner.
//! *   **Photos**: Attach a photo per plant, stored alongside the database.
//! *   **Data Persistence**: Plants are stored in standard XDG data directories (JSON format).
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Simply run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! verdant
//! # or explicitly
//! verdant ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//!
//! **Plant View**
//! *   `a`: Add new plant
//! *   `s`: Start a care session (enabled when something is due)
//! *   `w` / `r` / `f`: Water / rotate / fertilize selected plant now
//! *   `n`: Edit name
//! *   `o`: Edit notes
//! *   `1` / `2` / `3`: Edit watering / rotation / fertilizing schedule
//! *   `c`: Toggle showing only plants with care due
//! *   `d`: Delete selected plant
//!
//! **Care Session**
//! *   `w` / `r` / `f`: Complete the matching task for the current plant
//! *   `Esc`: Leave the session
//! *   Any key dismisses the completion screen
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Add a plant (watering defaults to weekly)
//! verdant add "Fiddle Leaf Fig" --rotate monthly --fertilize monthly --notes "Near the window"
//!
//! # List plants, soonest care first
//! verdant list
//!
//! # Only what needs attention today
//! verdant list --due
//!
//! # Complete care tasks
//! verdant water 1
//! verdant rotate 1
//! verdant fertilize 1
//!
//! # Inspect and edit
//! verdant show 1
//! verdant edit 1 --water biweekly --notes "Moved away from the radiator"
//! ```
//!
//! Schedules are `none`, `daily`, `weekly`, `biweekly` or `monthly`.
//! Watering cannot be `none`.
//!
//! ## Data Storage
//!
//! Plants are saved in your local data directory:
//! *   Linux: `~/.local/share/verdant/plants.json`
//! *   macOS: `~/Library/Application Support/verdant/plants.json`
//! *   Windows: `%APPDATA%\verdant\plants.json`
//!
//! Photos live in an `images/` directory next to the database. You can
//! override the database path by setting the `PLANTS_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use verdant::commands::*;
use verdant::models::TaskKind;
use verdant::tui::run_tui;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(about = "Terminal plant-care tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new plant
    Add {
        /// Plant name (quoted if it has spaces)
        name: String,
        /// Watering schedule (daily, weekly, biweekly, monthly)
        #[arg(short, long)]
        water: Option<String>,
        /// Rotation schedule (none, daily, weekly, biweekly, monthly)
        #[arg(short, long)]
        rotate: Option<String>,
        /// Fertilizing schedule (none, daily, weekly, biweekly, monthly)
        #[arg(short, long)]
        fertilize: Option<String>,
        /// Care notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Path to a photo to attach
        #[arg(short, long)]
        image: Option<String>,
    },
    /// List plants sorted by soonest care date
    List {
        /// Show only plants with care due today
        #[arg(short, long)]
        due: bool,
    },
    /// Show full details for a plant
    Show {
        id: u64,
    },
    /// Mark a plant as watered
    Water {
        id: u64,
    },
    /// Mark a plant as rotated
    Rotate {
        id: u64,
    },
    /// Mark a plant as fertilized
    Fertilize {
        id: u64,
    },
    /// Edit a plant
    Edit {
        id: u64,
        /// New plant name
        #[arg(short, long)]
        name: Option<String>,
        /// New watering schedule
        #[arg(short, long)]
        water: Option<String>,
        /// New rotation schedule
        #[arg(short, long)]
        rotate: Option<String>,
        /// New fertilizing schedule
        #[arg(short, long)]
        fertilize: Option<String>,
        /// New care notes (empty string clears)
        #[arg(long)]
        notes: Option<String>,
        /// Path to a new photo
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove a plant
    Remove {
        id: u64,
    },
    /// Reset the database (delete all plants and photos)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Add { name, water, rotate, fertilize, notes, image }) => {
            cmd_add(name, water, rotate, fertilize, notes, image, false)
        }
        Some(Commands::List { due }) => cmd_list(due),
        Some(Commands::Show { id }) => cmd_show(id),
        Some(Commands::Water { id }) => cmd_care(id, TaskKind::Watering, false),
        Some(Commands::Rotate { id }) => cmd_care(id, TaskKind::Rotation, false),
        Some(Commands::Fertilize { id }) => cmd_care(id, TaskKind::Fertilizing, false),
        Some(Commands::Edit { id, name, water, rotate, fertilize, notes, image }) => {
            cmd_edit(id, name, water, rotate, fertilize, notes, image, false)
        }
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "verdant", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
