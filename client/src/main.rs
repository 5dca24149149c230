mod cli;
mod options;

use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use common::{ConfigLoader, FsExt};
use dotenv::dotenv;
use env_logger::Env;
use experience::{merge_batch, ValueStats, ValueStore};
use log::{error, info};
use options::MergeOptions;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Merge(merge_args) => {
            let config_path = merge_args.config.relative_to_cwd()?;
            let config = ConfigLoader::new(config_path, "merge".to_string())?;

            let merge_options: MergeOptions = config.load()?;

            info!("{:?}", merge_options);

            run_merge(&merge_options, merge_args.once)?
        }
        Commands::Inspect(inspect_args) => {
            let path = inspect_args.path.relative_to_cwd()?;
            let store = ValueStore::load(&path)
                .with_context(|| format!("Failed to load value store at {:?}", path))?;

            match ValueStats::from_store(&store) {
                Some(stats) => println!("{}", stats),
                None => println!("{:?} holds no values", path),
            }
        }
    }

    Ok(())
}

fn run_merge(options: &MergeOptions, once: bool) -> Result<()> {
    let mut rng = rand::thread_rng();

    loop {
        let res = merge_batch(
            &options.canonical_path,
            &options.snapshot_dir,
            options.max_snapshots,
            &mut rng,
        );

        match res {
            Ok(_) => {}
            Err(e) if once => return Err(e).context("Merge failed"),
            Err(e) => error!("Merge failed, retrying next cycle: {}", e),
        }

        if once {
            return Ok(());
        }

        thread::sleep(options.interval);
    }
}
