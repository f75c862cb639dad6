use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minbar", version, author, about = "Unattended masjid signage for a TV or terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the board server (API, weather and hadith proxies, board shell)
    Serve {
        /// Address to bind, overrides server.host
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the rotating slideshow (default when no subcommand is given)
    Display {
        /// Masjid id to show; without one a selector is offered
        #[arg(long)]
        masjid: Option<String>,
        /// Seconds per slide (minimum 5)
        #[arg(long)]
        duration: Option<u64>,
        /// IANA timezone overriding the masjid's own
        #[arg(long)]
        tz: Option<String>,
        /// Board server base URL
        #[arg(long)]
        server: Option<String>,
    },
    /// Print today's prayer table and the next prayer from the local store
    Times {
        /// Masjid id
        #[arg(long)]
        masjid: String,
        /// IANA timezone overriding the masjid's own
        #[arg(long)]
        tz: Option<String>,
    },
    /// Import masjids, prayer times, jumuah slots and announcements from JSON
    Import {
        /// Seed document path
        file: PathBuf,
    },
    /// Compute prayer rows from the masjid's coordinates
    Generate {
        /// Masjid id
        #[arg(long)]
        masjid: String,
        /// Number of days to generate
        #[arg(long, default_value = "30")]
        days: u32,
        /// First day (YYYY-MM-DD), defaults to today in the masjid's timezone
        #[arg(long)]
        from: Option<String>,
    },
    /// List public masjids in the local store
    Masjids,
    /// Inspect or clear the display's offline cache
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Fetch one path through the offline worker and print what it served
    Fetch {
        /// Path and query, e.g. /api/masjids
        path: String,
        /// Treat the request as a page navigation
        #[arg(long)]
        navigate: bool,
        /// Board server base URL
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache names and entry counts
    Status,
    /// Delete every cache
    Clear,
}
