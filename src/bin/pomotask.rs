use anyhow::Result;
use clap::Parser;
use pomotask::cli::{self, Args};
use pomotask::config::Config;
use pomotask::context::StandardContext;

fn main() -> Result<()> {
    let args = Args::parse();
    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load_or_default(&ctx)?;
    cli::init_logging(cli::effective_log_level(args.verbose, &config));

    let output = cli::run(&args, &ctx, &config)?;
    println!("{}", output);
    Ok(())
}
