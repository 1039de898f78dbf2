//! Crafting store operator CLI.
//!
//! Provides the `craft` binary for inspecting a craft store database
//! offline: resolving combinations, looking up craftnodes, and reporting
//! row counts and orphaned craftnodes.
//!
//! Uses the same `craft_storage::SqliteStore` as the HTTP server, so lookups
//! behave identically from both entry points.

use std::process;

use clap::{Parser, Subcommand};

use craft_storage::{CombinationIndex, Craftnode, CraftnodeStore, SqliteStore, StorageError};

/// Crafting store tools.
#[derive(Parser)]
#[command(name = "craft", about = "Crafting store tools")]
struct Cli {
    /// Path to the store database file.
    #[arg(short, long, global = true, default_value = "craft.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve the craftnode a pair of labels produces (either order).
    Combination {
        a: String,
        b: String,
    },

    /// Look up a craftnode by its text.
    Craftnode {
        text: String,
    },

    /// Print craftnode, combination, and orphan counts.
    Stats,

    /// List craftnodes that no combination references.
    Orphans,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    process::exit(exit_code);
}

/// Execute a subcommand against the store at `cli.db`.
///
/// A lookup miss prints `not found` and still succeeds.
fn run(cli: &Cli) -> Result<(), StorageError> {
    let store = SqliteStore::new(&cli.db)?;

    match &cli.command {
        Commands::Combination { a, b } => print_lookup(store.resolve_combination(a, b)?),
        Commands::Craftnode { text } => print_lookup(store.find_craftnode_by_text(text)?),
        Commands::Stats => {
            let stats = store.stats()?;
            println!("craftnodes:   {}", stats.craftnodes);
            println!("combinations: {}", stats.combinations);
            println!("orphans:      {}", stats.orphans);
        }
        Commands::Orphans => {
            for node in store.find_orphans()? {
                println!("{}\t{}\t{}", node.id, node.emoji, node.text);
            }
        }
    }
    Ok(())
}

fn print_lookup(result: Option<Craftnode>) {
    match result {
        Some(node) => match serde_json::to_string_pretty(&node) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to render craftnode: {}", e),
        },
        None => println!("not found"),
    }
}
