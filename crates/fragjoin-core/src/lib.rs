pub mod config;
pub mod error;
pub mod fragment;
pub mod model;
pub mod named;
pub mod numbered;
pub mod validate;
pub mod writer;

use anyhow::{Context, Result};
use fragment::{Assembly, Completeness, FragmentReport, FragmentStatus};
use model::JoinConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub use error::JoinError;

fn load_config_from_cwd() -> Result<(PathBuf, JoinConfig)> {
    let root = std::env::current_dir().context("Failed to determine current directory")?;
    let config = config::load_config_with_precedence(&root)?;
    Ok((root, config))
}

fn print_fragment_line(report: &FragmentReport) {
    use owo_colors::OwoColorize;

    match report.status {
        FragmentStatus::Present { chars, .. } => {
            println!("   {} {}: length {}", "•".bright_black(), report.id.bright_white(), chars);
        }
        FragmentStatus::Missing => {
            println!("   {} {}: {}", "•".bright_black(), report.id.bright_white(), "MISSING".yellow());
        }
    }
}

fn print_completeness(assembly: &Assembly) {
    use owo_colors::OwoColorize;

    match assembly.completeness() {
        Completeness::Complete => {
            println!(
                "{} {}",
                "✓".bright_green(),
                format!("All {} fragments joined", assembly.fragments.len()).green().bold()
            );
        }
        Completeness::Partial { missing } => {
            println!(
                "{} {}",
                "⚠".yellow(),
                format!("Partial: {} fragment(s) missing", missing.len()).yellow().bold()
            );
            for id in missing {
                println!("   {} {}", "-".yellow(), id);
            }
        }
    }
}

/// Join the named fragment list into a single file and delete the sources.
///
/// CLI arguments override the loaded config.
pub fn cmd_named(
    dir: Option<String>,
    fragments: Vec<String>,
    output: Option<String>,
    keep: bool,
    dry_run: bool,
) -> Result<()> {
    use owo_colors::OwoColorize;

    let (root, config) = load_config_from_cwd()?;
    let mut settings = config.named;
    if let Some(dir) = dir {
        settings.dir = root.join(dir);
    }
    if !fragments.is_empty() {
        settings.fragments = fragments;
    }
    if let Some(output) = output {
        settings.output = root.join(output);
    }
    if keep {
        settings.keep_fragments = true;
    }

    if dry_run {
        println!("{} {}", "▸".bright_blue(), "Dry run mode - no files will be written or removed".bright_blue());
        println!();
    }

    println!("{} {}", "▸".bright_cyan(), "Reading fragments...".bright_cyan());
    let run = named::join_named(&settings, dry_run)?;

    for report in &run.assembly.fragments {
        print_fragment_line(report);
        if matches!(report.status, FragmentStatus::Present { trimmed: true, .. }) {
            println!("     {} Removed leading artifact from {}", "✂".bright_black(), report.id);
        }
    }
    println!();
    println!("   Total length: {}", run.assembly.chars().to_string().bright_white());

    if run.written {
        println!("{} Written to {}", "✓".bright_green(), run.output.display().to_string().bright_white());
    } else {
        println!("{} Would write {}", "▸".bright_blue(), run.output.display());
    }

    match &run.cleanup {
        named::Cleanup::Removed(paths) => {
            for path in paths {
                println!("   {} removed {}", "-".bright_black(), path.display());
            }
        }
        named::Cleanup::Kept => println!("   {} Fragments kept", "▸".bright_black()),
        named::Cleanup::Skipped => {}
    }

    println!();
    print_completeness(&run.assembly);
    println!();

    Ok(())
}

/// Join the numbered fragment sequence and verify the result parses as JSON.
///
/// An invalid or unwritten document is reported; with `strict` it also fails
/// the command after the report.
pub fn cmd_numbered(
    dir: Option<String>,
    pattern: Option<String>,
    count: Option<u32>,
    discover: bool,
    output: Option<String>,
    dry_run: bool,
    strict: bool,
) -> Result<()> {
    use owo_colors::OwoColorize;

    let (root, config) = load_config_from_cwd()?;
    let mut settings = config.numbered;
    if let Some(dir) = dir {
        settings.dir = root.join(dir);
    }
    if let Some(pattern) = pattern {
        settings.pattern = pattern;
    }
    if let Some(count) = count {
        settings.count = count;
    }
    if discover {
        settings.discover = true;
    }
    if let Some(output) = output {
        settings.output = root.join(output);
    }

    println!(
        "{} Assembling {} from {}...",
        "▸".bright_cyan(),
        settings.output.display().to_string().bright_white(),
        settings.dir.display()
    );
    println!();

    let run = numbered::join_numbered(&settings, dry_run)?;

    for report in &run.assembly.fragments {
        match report.status {
            FragmentStatus::Present { .. } => println!("   {} Reading {}", "•".bright_black(), report.id),
            FragmentStatus::Missing => {
                eprintln!("   {} Warning: {} not found!", "⚠".yellow(), report.id)
            }
        }
    }
    println!();

    if run.written {
        println!("{} Successfully assembled {}", "✓".bright_green(), run.output.display());
    } else if dry_run {
        println!("{} Would write {}", "▸".bright_blue(), run.output.display());
    }

    let failed = match &run.verification {
        numbered::Verification::Valid { chars } => {
            println!("{} Verifying JSON validity...", "▸".bright_cyan());
            println!("{} {}", "✓".bright_green(), "JSON is valid.".green().bold());
            println!("   Total length: {} characters", chars);
            false
        }
        numbered::Verification::Invalid(diag) => {
            println!("{} Verifying JSON validity...", "▸".bright_cyan());
            println!("{} Error: assembled file is not valid JSON: {}", "✗".bright_red(), diag.message.red());
            println!("   Error context (around char {}):", diag.offset);
            println!("{}", diag.context);
            true
        }
        numbered::Verification::WriteFailed(message) => {
            println!("{} An error occurred: {}", "✗".bright_red(), message);
            true
        }
    };

    println!();
    print_completeness(&run.assembly);
    println!();

    if failed && strict {
        anyhow::bail!("Assembled document at {} failed verification", run.output.display());
    }

    Ok(())
}

/// Size of a fragment on disk; never reads the content.
fn fragment_cell(path: &Path) -> comfy_table::Cell {
    use comfy_table::{Cell, Color};

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Cell::new(format!("{} bytes", meta.len())).fg(Color::Green),
        Ok(_) => Cell::new("not a file").fg(Color::Red),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Cell::new("missing").fg(Color::Yellow),
        Err(_) => Cell::new("unreadable").fg(Color::Red),
    }
}

fn output_cell(path: &Path) -> comfy_table::Cell {
    use comfy_table::{Cell, Color};

    if path.is_file() {
        Cell::new("exists").fg(Color::Green)
    } else {
        Cell::new("not written").fg(Color::DarkGrey)
    }
}

/// Show which fragments are present for both joiners. Reads only.
pub fn cmd_status() -> Result<()> {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, Color, Row, Table};
    use owo_colors::OwoColorize;

    println!();
    println!("{} {}", "▸".bright_cyan(), "fragjoin Status".bright_cyan().bold());
    println!();

    let (root, config) = load_config_from_cwd()?;

    let named_set = fragment::FragmentSet::new(&config.named.dir, config.named.fragments.clone())
        .map_err(anyhow::Error::from);
    let numbered_set = numbered::resolve_set(&config.numbered);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Joiner", "Fragment", "Status"]);

    for (label, dir, set, output) in [
        ("named", &config.named.dir, named_set, &config.named.output),
        ("numbered", &config.numbered.dir, numbered_set, &config.numbered.output),
    ] {
        if !dir.is_dir() {
            table.add_row(Row::from(vec![
                Cell::new(label).fg(Color::Cyan),
                Cell::new(display_relative(&root, dir)),
                Cell::new("directory missing").fg(Color::Red),
            ]));
        } else {
            match set {
                Ok(set) => {
                    for (id, path) in set.iter() {
                        table.add_row(Row::from(vec![
                            Cell::new(label).fg(Color::Cyan),
                            Cell::new(id),
                            fragment_cell(&path),
                        ]));
                    }
                }
                Err(e) => {
                    table.add_row(Row::from(vec![
                        Cell::new(label).fg(Color::Cyan),
                        Cell::new(display_relative(&root, dir)),
                        Cell::new(format!("{:#}", e)).fg(Color::Red),
                    ]));
                }
            }
        }

        table.add_row(Row::from(vec![
            Cell::new(label).fg(Color::Cyan),
            Cell::new(display_relative(&root, output)),
            output_cell(output),
        ]));
    }

    println!("{}", table);
    println!();

    Ok(())
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Write a `.fragjoin/config.toml` holding the default settings.
pub fn cmd_init(force: bool, dry_run: bool) -> Result<()> {
    use owo_colors::OwoColorize;

    let config_path = PathBuf::from(config::PROJECT_CONFIG);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists.\n\nUse --force to overwrite.",
            config_path.display()
        );
    }

    let content = config::default_config_toml()?;

    if dry_run {
        println!("{} Would create {}:", "▸".bright_blue(), config_path.display());
        println!();
        println!("{}", content);
        return Ok(());
    }

    fs::create_dir_all(config::CONFIG_DIR)
        .with_context(|| format!("Failed to create {}", config::CONFIG_DIR))?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Created {}", "✓".bright_green(), config_path.display().to_string().bright_white());
    Ok(())
}
