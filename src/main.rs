use clap::{Parser, Subcommand};
use contrib_wall::http::ReqwestClient;
use contrib_wall::pipeline::{self, BuildOptions, Error};
use contrib_wall::render::PageTemplate;
use contrib_wall::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "contrib-wall")]
#[command(about = "Static contributor page for a GitHub repository")]
#[command(long_about = "\
Static contributor page for a GitHub repository

Lists every contributor of <org>/<repo> through the GitHub API, drops the
excluded logins, downloads each avatar and resizes it to a square JPEG, then
writes a single HTML page.

Files:

  config.yaml                  # oauth token, org, repo, excluded, avatarSize
  imgCache/<login>.jpg         # resized avatars (kept between runs)
  output/                      # replaced on every build
  ├── contributors.html
  └── avatars/<login>.jpg

Run 'contrib-wall gen-config > config.yaml' to start from a documented config.
Set RUST_LOG=debug to trace every request.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Output directory (deleted and recreated on build)
    #[arg(long, default_value = "output", global = true)]
    output: PathBuf,

    /// Directory for resized avatars
    #[arg(long, default_value = "imgCache", global = true)]
    cache_dir: PathBuf,

    /// Tera template replacing the built-in page (overrides `template` in the config)
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: fetch → avatars → page (default)
    Build,
    /// List the contributors that would appear on the page, without writing files
    Fetch,
    /// Print a stock config.yaml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let config = config::load_config(&cli.config)?;
            let template = cli
                .template
                .or_else(|| config.template.clone())
                .map(PageTemplate::File)
                .unwrap_or_default();
            let options = BuildOptions {
                output_dir: cli.output,
                cache_dir: cli.cache_dir,
                template,
            };
            let client = ReqwestClient::new()?;

            println!("==> Building {}/{}", config.org, config.repo);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", output::format_avatar_event(&event));
                }
            });
            let result = pipeline::build(&client, &config, &options, Some(tx));
            // The sender is dropped with `build`, so the printer drains and exits
            let _ = printer.join();

            let report = result?;
            output::print_build_report(&report);
            println!("==> Done: {}", options.output_dir.display());
        }
        Command::Fetch => {
            let config = config::load_config(&cli.config)?;
            let client = ReqwestClient::new()?;
            let list = pipeline::list(&client, &config)?;
            output::print_contributor_list(&list);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_yaml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr and stay quiet unless `RUST_LOG` asks for more.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
