//! Layout Placer CLI
//!
//! Usage:
//!   layout-placer [OPTIONS] [LAYOUT]
//!
//! Options:
//!   -l, --list             List available layout definitions
//!   -d, --dir <DIR>        Definitions directory
//!   -c, --config <FILE>    Config file (TOML format)
//!       --at <X,Y,Z>       World origin of the layout
//!       --yaw <DEGREES>    Layout rotation
//!   -p, --prefix <NAME>    Prefix for instance names
//!       --delay <SECS>     Pause between placement calls
//!       --plan <FILE>      Write the placement plan here instead of stdout
//!       --json             Print results as JSON
//!   -h, --help             Print help

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use layout_placer::{
    CatalogError, JsonLinesCapability, ListingEntry, PlaceError, PlacementCapability, Placer,
    PlacerConfig, Vec3,
};

#[derive(Parser)]
#[command(name = "layout-placer")]
#[command(about = "Place multi-part layouts into a scene")]
struct Cli {
    /// Layout identifier: file key, partial key, or declared name
    layout: Option<String>,

    /// List available layout definitions
    #[arg(short, long)]
    list: bool,

    /// Definitions directory (overrides LAYOUT_DEFINITIONS_DIR and the config file)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World origin of the layout as x,y,z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0,0")]
    at: Vec<f64>,

    /// Layout rotation in degrees
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
    yaw: f64,

    /// Prefix for placed instance names
    #[arg(short, long)]
    prefix: Option<String>,

    /// Seconds to pause between placement calls
    #[arg(long)]
    delay: Option<f64>,

    /// Write the placement plan to a file instead of stdout
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    // Warnings by default; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match PlacerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PlacerConfig::default(),
    };
    let config = config.with_environment(cli.dir.as_deref());

    if cli.list {
        list(&config, cli.json);
        return;
    }

    let Some(identifier) = cli.layout.as_deref() else {
        eprintln!("Error: no layout given (use --list to see available layouts)");
        std::process::exit(1);
    };

    let &[x, y, z] = cli.at.as_slice() else {
        eprintln!("Error: --at expects three comma-separated numbers, e.g. --at 100,200,0");
        std::process::exit(1);
    };

    let mut placer = Placer::new(config);
    let mut request = placer.request(Vec3::new(x, y, z)).with_yaw(cli.yaw);
    if let Some(prefix) = cli.prefix {
        request = request.with_name_prefix(prefix);
    }
    if let Some(delay) = cli.delay {
        request = request.with_pacing_delay_secs(delay);
    }

    let writer: Box<dyn Write> = match &cli.plan {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("Error creating plan file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(io::stdout()),
    };
    let mut plan = JsonLinesCapability::new(writer);
    let capability: &mut dyn PlacementCapability = &mut plan;

    let result = match placer.place(identifier, &request, Some(capability)) {
        Ok(result) => result,
        Err(PlaceError::Catalog(CatalogError::NotFound {
            identifier,
            directory,
            available,
        })) => {
            eprintln!(
                "Error: layout '{}' not found in {}",
                identifier,
                directory.display()
            );
            if !available.is_empty() {
                eprintln!("Available layouts:");
                for key in available {
                    eprintln!("  {}", key);
                }
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing result: {}", e),
        }
    }

    eprintln!("{}", result.summary());
    for outcome in result.failed() {
        if let Some(reason) = outcome.failure() {
            eprintln!("  failed: {} ({})", outcome.label, reason);
        }
    }

    if !result.overall_success() {
        std::process::exit(1);
    }
}

fn list(config: &PlacerConfig, json: bool) {
    let listing = match layout_placer::list_layouts(&config.definitions_dir) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&listing) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing listing: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{} layout(s) in {}",
        listing.count,
        listing.directory.display()
    );
    for entry in &listing.entries {
        match entry {
            ListingEntry::Layout {
                file,
                name,
                description,
                piece_count,
                cell_count,
            } => {
                println!(
                    "  {:<40} {} ({} pieces, {} cells)",
                    file, name, piece_count, cell_count
                );
                if !description.is_empty() {
                    println!("  {:<40} {}", "", description);
                }
            }
            ListingEntry::Invalid { file, error } => {
                println!("  {:<40} ERROR: {}", file, error);
            }
        }
    }
}
