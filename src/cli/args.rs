//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Storefront backend
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Apply pending database migrations
    Migrate,

    /// Insert products from a JSON file (one object or an array)
    Seed(SeedArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep everything in process memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Path to the JSON file
    pub file: PathBuf,
}
