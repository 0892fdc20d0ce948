//! Appview CLI - Command-line interface for game-asset appearances
//!
//! This binary inspects appearance documents, builds animation previews,
//! recolors outfits and edits sprite assignments in an asset directory.

use appview_model::{Category, SpriteReplacement};
use appview_sprite::SpriteCoord;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use appview_cli::commands::{self, ColorArgs, Workspace};
use commands::locate::{parse_coord, LocateQuery};
use commands::outfit::OutfitOptions;
use commands::preview::PreviewOptions;
use commands::replace::parse_replacement;

/// Appview - Appearance inspection and animation preview
#[derive(Parser)]
#[command(name = "appview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Root of the asset directory
    #[arg(long, global = true, default_value = ".")]
    assets: String,

    /// Preview config file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the frame groups, offsets and loop settings of an appearance
    Inspect {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id
        #[arg(short, long)]
        id: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Map an aggregated sprite index to its group and coordinate, or back
    Locate {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id
        #[arg(short, long)]
        id: u32,

        /// Aggregated sprite index
        #[arg(long, conflicts_with = "coord", required_unless_present = "coord")]
        index: Option<usize>,

        /// Group-local coordinate as layer,x,y,z,phase
        #[arg(long, value_parser = parse_coord, requires = "group")]
        coord: Option<SpriteCoord>,

        /// Frame group of --coord
        #[arg(short, long)]
        group: Option<usize>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate appearance documents
    Validate {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id (default: every document of the category)
        #[arg(short, long)]
        id: Option<u32>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Build the preview animation of an appearance and write its frames
    Preview {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id
        #[arg(short, long)]
        id: u32,

        /// Output directory for PNG frames
        #[arg(short, long, default_value = "preview")]
        out_dir: String,

        /// Also write an animated GIF
        #[arg(long)]
        gif: bool,

        /// Scale factor for written frames
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Tint a base sprite PNG with a color template PNG
    Recolor {
        /// Base sprite PNG
        #[arg(long)]
        base: String,

        /// Color template PNG
        #[arg(long)]
        template: String,

        #[command(flatten)]
        colors: ColorArgs,

        /// Output PNG
        #[arg(short, long)]
        out: String,
    },

    /// Render one tinted outfit frame
    Outfit {
        /// Outfit id
        #[arg(short, long)]
        id: u32,

        /// Frame group (0 = idle, 1 = walking)
        #[arg(short, long, default_value_t = 0)]
        group: usize,

        /// Direction (default: the preview direction of the group)
        #[arg(long)]
        direction: Option<u32>,

        /// Mount row
        #[arg(long, default_value_t = 0)]
        mount: u32,

        /// Animation phase
        #[arg(long, default_value_t = 0)]
        phase: u32,

        /// Addon rows in paint order, comma separated (default: 0)
        #[arg(long, value_delimiter = ',')]
        addons: Vec<u32>,

        #[command(flatten)]
        colors: ColorArgs,

        /// Scale factor for the written frame
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: u32,

        /// Output PNG
        #[arg(short, long)]
        out: String,
    },

    /// Play an animation loop and print its phases
    Play {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id
        #[arg(short, long)]
        id: u32,

        /// Frame group (default: the preview group)
        #[arg(short, long)]
        group: Option<usize>,

        /// Stop after this many milliseconds
        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,

        /// Override the tick interval (ms)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Replace sprite slots of a frame group and save the document
    Replace {
        /// Appearance category (objects, outfits, effects, missiles)
        #[arg(short, long)]
        category: Category,

        /// Appearance id
        #[arg(short, long)]
        id: u32,

        /// Frame group to edit
        #[arg(short, long)]
        group: usize,

        /// Slot assignment as slot=sprite_id (repeatable)
        #[arg(short = 's', long = "set", value_parser = parse_replacement, required = true)]
        replacements: Vec<SpriteReplacement>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workspace = Workspace::new(cli.assets, cli.config);

    let result = match cli.command {
        Commands::Inspect { category, id, json } => {
            commands::inspect::run(&workspace, category, id, json)
        }
        Commands::Locate {
            category,
            id,
            index,
            coord,
            group,
            json,
        } => {
            let query = match (coord, group) {
                (Some(coord), Some(group)) => Some(LocateQuery::Coord { group, coord }),
                _ => index.map(LocateQuery::Aggregated),
            };
            match query {
                Some(query) => commands::locate::run(&workspace, category, id, query, json),
                None => Err(anyhow::anyhow!("--index or --coord with --group is required")),
            }
        }
        Commands::Validate { category, id, json } => {
            commands::validate::run(&workspace, category, id, json)
        }
        Commands::Preview {
            category,
            id,
            out_dir,
            gif,
            scale,
            json,
        } => commands::preview::run(
            &workspace,
            category,
            id,
            &PreviewOptions {
                out_dir,
                gif,
                scale,
            },
            json,
        ),
        Commands::Recolor {
            base,
            template,
            colors,
            out,
        } => commands::recolor::run(&base, &template, &colors.colors(), &out),
        Commands::Outfit {
            id,
            group,
            direction,
            mount,
            phase,
            addons,
            colors,
            scale,
            out,
        } => commands::outfit::run(
            &workspace,
            id,
            &OutfitOptions {
                group,
                direction,
                mount,
                phase,
                addons,
                scale,
            },
            &colors.colors(),
            &out,
        ),
        Commands::Play {
            category,
            id,
            group,
            duration_ms,
            interval_ms,
        } => commands::play::run(&workspace, category, id, group, duration_ms, interval_ms),
        Commands::Replace {
            category,
            id,
            group,
            replacements,
            json,
        } => commands::replace::run(&workspace, category, id, group, replacements, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
