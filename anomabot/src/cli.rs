// anomabot/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anomabot")]
#[command(about = "Warehouse data-quality tests: anomalies, freshness and row counts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs one configured test and notifies its owner
    Run {
        /// Test id as written in the catalog
        #[arg(long, env = "ANOMABOT_TEST_ID")]
        test_id: String,

        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Print the notification instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// 📋 Lists the tests of the catalog
    List {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ✅ Checks every test definition of the catalog
    Validate {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ⚡ Executes a raw SQL query (Ad-hoc)
    Query {
        query: String,

        /// Warehouse project to run against (default database when unknown)
        #[arg(long, default_value = "")]
        project: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Rows to display
        #[arg(long, default_value = "50")]
        limit: usize,
    },
}
