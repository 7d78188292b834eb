use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wallmania_core::types::Orientation;

/// Generate AI wallpapers and manage the local gallery.
#[derive(Parser, Debug)]
#[command(name = "wallmania", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new wallpaper from a prompt.
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },

    /// List saved wallpapers, newest first.
    Gallery {
        /// Only show favorites.
        #[arg(short, long)]
        favorites: bool,

        /// Case-insensitive text to look for in prompts.
        #[arg(short, long)]
        search: Option<String>,

        /// Only show one orientation.
        #[arg(short, long)]
        orientation: Option<Orientation>,
    },

    /// Toggle the favorite flag of a wallpaper.
    Favorite { id: String },

    /// Save a wallpaper to disk (counts against the daily allowance).
    Download {
        id: String,

        /// Target directory (defaults to `DOWNLOAD_DIR`).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Share a wallpaper through the native share surface.
    Share {
        id: String,

        /// Print social web-intent links instead of opening the share sheet.
        #[arg(long)]
        links: bool,
    },

    /// Open the system wallpaper picker (Android only).
    SetWallpaper { id: String },

    /// Show today's usage and remaining allowance.
    Usage,

    /// Unlock premium.
    Upgrade,
}

#[derive(Subcommand, Debug)]
pub enum GenerateKind {
    /// Generate a still image.
    Image {
        prompt: String,

        #[arg(short, long, default_value = "portrait")]
        orientation: Orientation,
    },

    /// Generate a short video (premium only).
    Video {
        prompt: String,

        #[arg(short, long, default_value = "portrait")]
        orientation: Orientation,
    },
}
