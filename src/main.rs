use clap::{Parser, Subcommand};
use std::path::Path;

mod convert;
mod error;
mod import;
mod pack;
mod tags;
mod utils;

/// Command-line tools for organizing Dungeondraft asset packs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the tag manifest from an asset pack's folder structure
    Tags {
        /// Asset-pack root (the folder containing textures/objects)
        path: String,

        /// Tag for files sitting directly in the object folder
        #[arg(short, long)]
        default_tag: Option<String>,

        /// Only these subfolders become tags (comma separated)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,

        /// Subfolders that never become tags (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
    },
    /// Convert a pack's object images to WebP into a mirrored tree
    Convert {
        /// Source tree to convert
        source: String,

        /// Destination root for the converted tree
        destination: String,
    },
    /// Import the best quality tier of each symbol into an asset pack
    Import {
        /// Path to the external symbol library to import from
        source: String,

        /// Asset-pack root the surviving files are copied into
        destination: String,

        /// Build data/default.dungeondraft_tags after copying (true/false)
        #[arg(long, default_value = "true", value_parser = utils::flags::parse_bool_flag)]
        create_tag_file: bool,

        /// Route door and window assets to textures/portals (true/false)
        #[arg(long, default_value = "true", value_parser = utils::flags::parse_bool_flag)]
        route_portals: bool,
    },
}

fn main() {
    let args = Args::parse();

    match args.command {
        Commands::Tags {
            path,
            default_tag,
            include,
            exclude,
        } => {
            if let Err(e) = tags::generate(
                Path::new(&path),
                default_tag.as_deref(),
                &include,
                &exclude,
            ) {
                eprintln!("Error generating tags: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Convert {
            source,
            destination,
        } => {
            if let Err(e) = convert::convert_tree(Path::new(&source), Path::new(&destination)) {
                eprintln!("Error during conversion: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Import {
            source,
            destination,
            create_tag_file,
            route_portals,
        } => {
            let import_args = import::ImportArgs {
                source,
                destination,
                create_tag_file,
                route_portals,
            };

            if let Err(e) = import::import_symbols(import_args) {
                eprintln!("Error during import: {}", e);
                std::process::exit(1);
            }
        }
    }
}
