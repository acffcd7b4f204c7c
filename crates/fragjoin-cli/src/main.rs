use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fragjoin", version, about = "Reassemble split document fragments")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join a fixed list of named fragments, then remove them
    Named {
        /// Directory holding the fragments
        #[arg(long)]
        dir: Option<String>,
        /// Fragment file name, in join order (can be specified multiple times)
        #[arg(long = "fragment", value_name = "NAME")]
        fragments: Vec<String>,
        #[arg(long)]
        output: Option<String>,
        /// Keep the fragment files after joining
        #[arg(long)]
        keep: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Join numbered fragments and verify the result is valid JSON
    Numbered {
        #[arg(long)]
        dir: Option<String>,
        /// File name pattern with an {n} placeholder
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        count: Option<u32>,
        /// Find the highest fragment index in the directory instead of using --count
        #[arg(long)]
        discover: bool,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        dry_run: bool,
        /// Exit non-zero when the result is not valid JSON
        #[arg(long)]
        strict: bool,
    },
    /// Show which fragments are present
    Status,
    /// Write a default .fragjoin/config.toml
    Init {
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Named{dir, fragments, output, keep, dry_run} => {
            fragjoin_core::cmd_named(dir, fragments, output, keep, dry_run)?
        }
        Command::Numbered{dir, pattern, count, discover, output, dry_run, strict} => {
            fragjoin_core::cmd_numbered(dir, pattern, count, discover, output, dry_run, strict)?
        }
        Command::Status => fragjoin_core::cmd_status()?,
        Command::Init{force, dry_run} => fragjoin_core::cmd_init(force, dry_run)?,
    }
    Ok(())
}
