use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_changelog::changelog::{self, ChangelogEngine};
use git_changelog::cli::{run_bump, BumpWorkflowArgs, WorkflowResult};
use git_changelog::config::{self, Config};
use git_changelog::git::{Git2Repository, VersionControl};
use git_changelog::ui;
use git_changelog::{ChangelogError, VersionBump};

#[derive(clap::Parser)]
#[command(
    name = "git-changelog",
    version,
    about = "Keep a CHANGELOG.md in step with semantic version tags"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Changelog file (overrides configuration)")]
    file: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a new changelog with an empty Unreleased section
    Init,

    /// Add an entry to the Unreleased section
    Add {
        #[arg(help = "Section: Added, Changed, Deprecated, Removed, Fixed or Security")]
        section: String,

        #[arg(required = true, num_args = 1.., help = "Entry text")]
        content: Vec<String>,
    },

    /// Bump the version from the latest tag, release the changelog, commit and tag
    Bump {
        #[arg(value_enum)]
        kind: BumpKind,

        #[arg(long, value_parser = parse_date, help = "Release date (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(long, help = "Continue past warnings without prompting")]
        force: bool,
    },

    /// Release the Unreleased section under an explicit version, without git
    Release {
        version: String,

        #[arg(long, value_parser = parse_date, help = "Release date (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,
    },

    /// Print the latest released version recorded in the changelog
    Latest,

    /// Rewrite the changelog in canonical form
    Format {
        #[arg(long, help = "Only check, exit with an error if the file is not canonical")]
        check: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl From<BumpKind> for VersionBump {
    fn from(kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => VersionBump::Major,
            BumpKind::Minor => VersionBump::Minor,
            BumpKind::Patch => VersionBump::Patch,
        }
    }
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", s, e))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args, config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

/// Link target from configuration, or from the git remote when one is available
fn engine_for(config: &Config) -> ChangelogEngine {
    let remote_url = Git2Repository::open(".")
        .ok()
        .and_then(|repo| repo.remote_url(&config.repository.remote).ok().flatten());
    ChangelogEngine::new(config.repository.link_target(remote_url.as_deref()))
}

fn run(args: Args, config: Config) -> Result<()> {
    let path = args.file.unwrap_or_else(|| config.changelog.path.clone());

    match args.command {
        Command::Init => {
            ChangelogEngine::default().init(&path)?;
            ui::display_success(&format!("Created {}", path.display()));
        }

        Command::Add { section, content } => {
            let content = content.join(" ");
            let duplicate = engine_for(&config).add_entry(&path, &section, &content)?;
            if duplicate {
                ui::display_status(&format!("Entry already present under {}", section));
            } else {
                ui::display_success(&format!("Added to {}: {}", section, content));
            }
        }

        Command::Bump {
            kind,
            date,
            dry_run,
            force,
        } => {
            let repo = Git2Repository::open(".")?;
            let workflow_args = BumpWorkflowArgs {
                bump: kind.into(),
                changelog_path: path.clone(),
                date,
                force,
                dry_run,
            };

            match run_bump(&workflow_args, &config, &repo, ui::confirm_warning)? {
                WorkflowResult::Released(outcome) => {
                    for notice in &outcome.notices {
                        ui::display_boundary_warning(notice);
                    }
                    ui::display_proposed_version(&outcome.previous, &outcome.version);

                    if let Some(preview) = &outcome.preview {
                        ui::display_preview(&path.display().to_string(), preview);
                        return Ok(());
                    }

                    ui::display_success(&format!(
                        "Released {} in {}",
                        outcome.version,
                        path.display()
                    ));
                    if outcome.committed {
                        ui::display_success("Committed changelog");
                    }
                    if outcome.tagged {
                        ui::display_success(&format!("Created tag: {}", outcome.version));
                        ui::display_manual_push_instruction(
                            &outcome.version,
                            &config.repository.remote,
                        );
                    }
                }
                WorkflowResult::Cancelled(_) => {
                    println!("Operation cancelled by user.");
                }
            }
        }

        Command::Release { version, date } => {
            engine_for(&config).release(&path, &version, date)?;
            ui::display_success(&format!("Released {} in {}", version, path.display()));
        }

        Command::Latest => {
            let text = changelog::read_changelog(&path)?;
            match changelog::latest_released_version(&text) {
                Ok(version) => println!("{}", version),
                Err(ChangelogError::NoVersionFound) => {
                    ui::display_error("No released version found in changelog");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Format { check } => {
            let changed = ChangelogEngine::default().format_file(&path, check)?;
            match (check, changed) {
                (true, true) => {
                    ui::display_error(&format!("{} is not in canonical form", path.display()));
                    std::process::exit(1);
                }
                (false, true) => ui::display_success(&format!("Formatted {}", path.display())),
                (_, false) => ui::display_status(&format!("{} already canonical", path.display())),
            }
        }
    }

    Ok(())
}
