use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use fantasy_map::{
    Command, DetailLevel, DisplayState, FantasyMap, FontLettering, GenerationConfig, MapError, MapPipeline,
    Session, Typefaces, Viewport,
};

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Detail {
    Low,
    Normal,
    High,
}

impl From<Detail> for DetailLevel {
    fn from(detail: Detail) -> Self {
        match detail {
            Detail::Low => DetailLevel::Low,
            Detail::Normal => DetailLevel::Normal,
            Detail::High => DetailLevel::High,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fantasy-map")]
#[command(about = "Generate procedural fantasy maps with landmarks and a titled border")]
struct Args {
    /// Master seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the seed for textures, landmarks and glyphs
    #[arg(long)]
    seed_value: Option<u32>,

    /// Override the terrain noise seed
    #[arg(long)]
    noise_seed: Option<u32>,

    /// Side length of the map in pixels
    #[arg(long, default_value = "1440")]
    size: u32,

    /// Grid cells per axis (default: one cell per 8 pixels)
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Number of landmarks, at most 8
    #[arg(short, long)]
    landmarks: Option<usize>,

    /// Sea level, 0 to 1.25
    #[arg(long)]
    sea_level: Option<f64>,

    /// How strongly land gathers in the middle, 0 to 2
    #[arg(long)]
    island_level: Option<f64>,

    #[arg(long, value_enum)]
    detail: Option<Detail>,

    /// Font for the map title
    #[arg(long, default_value = DEFAULT_FONT)]
    title_font: PathBuf,

    /// Font for landmark labels
    #[arg(long, default_value = DEFAULT_FONT)]
    label_font: PathBuf,

    /// Where to save the map
    #[arg(short, long, default_value = "Map.png")]
    output: PathBuf,

    /// On-screen size used for previews
    #[arg(long, default_value = "720")]
    viewport: u32,

    /// Print the map's features as JSON and exit without rendering
    #[arg(long)]
    features: bool,

    /// Keep the map open and read commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Where interactive mode writes the current view
    #[arg(long, default_value = "preview.png")]
    preview: PathBuf,

    /// Show landmark labels (default: rolled from the seed)
    #[arg(long)]
    labels: Option<bool>,

    /// Show the titled border (default: rolled from the seed)
    #[arg(long)]
    name: Option<bool>,
}

fn build_config(args: &Args, seed: u64) -> Result<GenerationConfig, MapError> {
    let mut builder = GenerationConfig::builder(seed).map_size(args.size);
    if let Some(value) = args.seed_value {
        builder = builder.seed_value(value);
    }
    if let Some(value) = args.noise_seed {
        builder = builder.noise_seed_value(value);
    }
    if let Some(resolution) = args.resolution {
        builder = builder.map_resolution(resolution);
    }
    if let Some(count) = args.landmarks {
        builder = builder.landmark_count(count);
    }
    if let Some(level) = args.sea_level {
        builder = builder.sea_level(level);
    }
    if let Some(level) = args.island_level {
        builder = builder.island_level(level);
    }
    if let Some(detail) = args.detail {
        builder = builder.detail_level(detail.into());
    }

    let rolled = builder.clone().build()?.initial_display();
    builder
        .display(DisplayState {
            show_labels: args.labels.unwrap_or(rolled.show_labels),
            show_name: args.name.unwrap_or(rolled.show_name),
        })
        .build()
}

fn print_help() {
    println!("\nCommands:");
    println!("  l          toggle landmark labels");
    println!("  n          toggle the map name");
    println!("  s [path]   save the map");
    println!("  r <px>     resize the preview");
    println!("  q          quit");
}

fn write_preview(session: &Session, path: &Path) -> Result<(), MapError> {
    session.frame().save(path)?;
    Ok(())
}

fn interact(session: &mut Session, args: &Args) -> Result<(), MapError> {
    print_help();
    write_preview(session, &args.preview)?;

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let Some(command) = Command::parse(&input, &args.output) else {
            println!("Unknown command.");
            print_help();
            continue;
        };
        if !session.handle(command) {
            break;
        }

        let display = session.display();
        println!(
            "Labels {}, name {}, preview {}px",
            if display.show_labels { "on" } else { "off" },
            if display.show_name { "on" } else { "off" },
            session.viewport().size()
        );
        write_preview(session, &args.preview)?;
    }
    Ok(())
}

fn run(args: Args) -> Result<(), MapError> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = build_config(&args, seed)?;

    if args.features {
        println!("{}", config.features().to_json());
        return Ok(());
    }

    let title_font = FontLettering::load(&args.title_font)?;
    let label_font = FontLettering::load(&args.label_font)?;

    println!("Generating \"{}\" with seed: {}", config.title(), seed);
    let typefaces = Typefaces { title: &title_font, label: &label_font };
    let map: FantasyMap = MapPipeline::new(&config, typefaces).run(|progress| {
        println!(
            "[{}/{}] {}...",
            progress.index + 1,
            progress.total,
            progress.wait_message
        );
    });

    let mut session = Session::new(map, Viewport::new(args.viewport));
    if args.interactive {
        interact(&mut session, &args)
    } else {
        session.export(&args.output)?;
        println!("Saved {}", args.output.display());
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "map generation failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
