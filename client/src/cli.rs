use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "Experience Client")]
#[clap(about = "Maintains the learned value store shared by self-play agents", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Merge(MergeCommand),
    Inspect(InspectCommand),
}

/// Folds worker snapshots into the canonical store.
#[derive(Args)]
pub struct MergeCommand {
    #[clap(short, long, default_value_t = String::from("client.conf"))]
    pub config: String,

    /// Run a single merge cycle and exit.
    #[clap(long)]
    pub once: bool,
}

/// Prints statistics over every value in a store.
#[derive(Args)]
pub struct InspectCommand {
    pub path: String,
}
