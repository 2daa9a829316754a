use clap::{Args, Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use std::path::PathBuf;

use dyegrid::{
    server::{self, ServerConfig, DEFAULT_MAX_EDGE_PX},
    *,
};

mod error;
use error::CliError;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web form and JSON API.
    Serve(ServeArgs),
    /// Render a preset file to an image.
    Render(RenderArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// HTTP server port.
    #[arg(short, long, default_value_t = 5000)]
    port: u16,
    /// Address to bind the HTTP server to.
    ///
    /// Use 0.0.0.0 to listen on all interfaces.
    #[arg(short, long, default_value = "127.0.0.1")]
    bind_address: String,
    /// Largest accepted output width or height, in pixels.
    #[arg(long, default_value_t = DEFAULT_MAX_EDGE_PX)]
    max_edge_px: u32,
}

#[derive(Args)]
struct RenderArgs {
    /// Path to preset file (.json, .ron or .yaml).
    input: PathBuf,
    /// Path to output image (file extension must be PNG).
    output: PathBuf,
    /// Seed for the random generator. A fresh seed is used when omitted.
    #[arg(short, long)]
    seed: Option<u64>,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address.clone(),
            port: self.port,
            max_edge_px: self.max_edge_px,
        }
    }
}

#[tokio::main]
async fn serve(cfg: ServerConfig) -> Result<(), CliError> {
    Ok(server::serve(cfg).await?)
}

fn render_preset(args: &RenderArgs) -> Result<(), CliError> {
    let preset = Preset::from_file(&args.input)?;
    validate(&preset.choices)?;
    let cfg = preset.grid_config();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Rendering {}x{} blocks at {} px...", cfg.width, cfg.height, cfg.block_px);

    let before_run = std::time::Instant::now();
    let artwork = render(cfg, &preset.choices, &mut rng)?;
    let dur = before_run.elapsed();

    artwork.image.save(&args.output)?;

    for entry in legend(&preset.choices) {
        println!("  {:<12} {:>8} {}", entry.name, entry.weight, entry.rgb.to_hex());
    }

    println!(
        "Completed! Rendered in {}.{:03} seconds. Output written to '{}'",
        dur.as_secs(),
        dur.subsec_millis(),
        args.output.display()
    );

    Ok(())
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args.server_config()),
        Command::Render(args) => render_preset(&args),
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
