use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotwire::{cli, config, error, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify through the browser
    Auth,

    /// Work with OAuth tokens directly
    Token(TokenOptions),

    /// Check configuration variables
    Check,

    /// Send any Web API request
    Request(RequestOptions),

    /// Get, save or remove albums
    Album(AlbumOptions),

    /// Get artists and their albums, top tracks or related artists
    Artist(ArtistOptions),

    /// Get tracks or their audio features
    Track(TrackOptions),

    /// Search the catalog
    Search(SearchOptions),

    /// Browse editorial content
    Browse(BrowseOptions),

    /// Current user profile, top items and recently played
    Me(MeOptions),

    /// Handle playlists
    Playlist(PlaylistOptions),

    /// Handle saved tracks
    Library(LibraryOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    #[command(subcommand)]
    pub command: TokenSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TokenSubcommand {
    /// Request an app-only token
    ClientCredentials,
    /// Refresh the stored user token
    Refresh,
    /// Show the stored user token
    Show,
    /// Remove the stored user token
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,

    /// Path below the API base, e.g. /albums/{id}
    pub path: String,

    /// Query parameter as key=value; can be repeated
    #[clap(long = "param", value_parser = utils::parse_param)]
    pub params: Vec<(String, String)>,

    /// JSON request body
    #[clap(long)]
    pub body: Option<String>,

    /// Cache the GET response for this many seconds
    #[clap(long)]
    pub cache_ttl: Option<u64>,

    /// Abort the call after this many seconds
    #[clap(long)]
    pub deadline: Option<u64>,

    /// Use an app-only token
    #[clap(long)]
    pub app: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumOptions {
    pub id: String,

    /// List the album tracks
    #[clap(long)]
    pub tracks: bool,

    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    /// Save the album to the library
    #[clap(long, conflicts_with_all = ["remove", "tracks"])]
    pub save: bool,

    /// Remove the album from the library
    #[clap(long, conflicts_with = "tracks")]
    pub remove: bool,

    #[clap(long)]
    pub app: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// One or more artist ids
    #[clap(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    #[clap(long, conflicts_with_all = ["top_tracks", "related"])]
    pub albums: bool,

    #[clap(long, conflicts_with = "related")]
    pub top_tracks: bool,

    #[clap(long)]
    pub related: bool,

    #[clap(long, default_value = "US")]
    pub market: String,

    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    #[clap(long)]
    pub app: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// One or more track ids
    #[clap(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    #[clap(long)]
    pub audio_features: bool,

    #[clap(long)]
    pub app: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    /// album, artist, playlist, track (comma separated)
    #[clap(long = "type", default_value = "track")]
    pub kind: String,

    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    #[clap(long, default_value_t = 0)]
    pub offset: u32,

    #[clap(long)]
    pub app: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BrowseKind {
    Featured,
    NewReleases,
    Categories,
}

impl BrowseKind {
    fn as_str(self) -> &'static str {
        match self {
            BrowseKind::Featured => "featured",
            BrowseKind::NewReleases => "new-releases",
            BrowseKind::Categories => "categories",
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct BrowseOptions {
    #[clap(value_enum)]
    pub kind: BrowseKind,

    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    #[clap(long)]
    pub app: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TopKind {
    Tracks,
    Artists,
}

#[derive(Parser, Debug, Clone)]
pub struct MeOptions {
    /// Show top tracks or artists
    #[clap(long, value_enum, conflicts_with = "recent")]
    pub top: Option<TopKind>,

    /// short_term, medium_term or long_term
    #[clap(long, default_value = "medium_term")]
    pub time_range: String,

    /// Show recently played tracks
    #[clap(long)]
    pub recent: bool,

    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    #[command(subcommand)]
    pub command: PlaylistSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// List the current user's playlists
    List {
        #[clap(long, default_value_t = 20)]
        limit: u32,
        #[clap(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show a playlist or its tracks
    Show {
        id: String,
        #[clap(long)]
        tracks: bool,
        #[clap(long, default_value_t = 20)]
        limit: u32,
        #[clap(long, default_value_t = 0)]
        offset: u32,
        #[clap(long)]
        app: bool,
    },
    /// Create a playlist for the current user
    Create {
        name: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long)]
        public: bool,
    },
    /// Add tracks by URI (spotify:track:...)
    AddTracks {
        id: String,
        #[clap(required = true, num_args = 1..)]
        uris: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct LibraryOptions {
    #[command(subcommand)]
    pub command: LibrarySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LibrarySubcommand {
    /// List saved tracks
    Saved {
        #[clap(long, default_value_t = 20)]
        limit: u32,
        #[clap(long, default_value_t = 0)]
        offset: u32,
    },
    /// Save tracks
    Save {
        #[clap(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Remove saved tracks
    Remove {
        #[clap(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Check whether tracks are saved
    Contains {
        #[clap(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Token(opt) => match opt.command {
            TokenSubcommand::ClientCredentials => cli::token_client_credentials().await,
            TokenSubcommand::Refresh => cli::token_refresh().await,
            TokenSubcommand::Show => cli::token_show().await,
            TokenSubcommand::Clear => cli::token_clear().await,
        },
        Command::Check => cli::check(),
        Command::Request(opt) => {
            cli::request(
                opt.method,
                opt.path,
                opt.params,
                opt.body,
                opt.cache_ttl,
                opt.deadline,
                opt.app,
            )
            .await
        }
        Command::Album(opt) => {
            cli::album(opt.id, opt.tracks, opt.limit, opt.save, opt.remove, opt.app).await
        }
        Command::Artist(opt) => {
            cli::artist(
                opt.ids,
                opt.albums,
                opt.top_tracks,
                opt.related,
                opt.market,
                opt.limit,
                opt.app,
            )
            .await
        }
        Command::Track(opt) => cli::track(opt.ids, opt.audio_features, opt.app).await,
        Command::Search(opt) => {
            cli::search(opt.query, opt.kind, opt.limit, opt.offset, opt.app).await
        }
        Command::Browse(opt) => cli::browse(opt.kind.as_str(), opt.limit, opt.app).await,
        Command::Me(opt) => {
            let top = opt.top.map(|t| match t {
                TopKind::Tracks => "tracks".to_string(),
                TopKind::Artists => "artists".to_string(),
            });
            cli::me(top, opt.time_range, opt.recent, opt.limit).await
        }
        Command::Playlist(opt) => match opt.command {
            PlaylistSubcommand::List { limit, offset } => cli::playlists(limit, offset).await,
            PlaylistSubcommand::Show {
                id,
                tracks,
                limit,
                offset,
                app,
            } => cli::playlist_show(id, tracks, limit, offset, app).await,
            PlaylistSubcommand::Create {
                name,
                description,
                public,
            } => cli::playlist_create(name, description, public).await,
            PlaylistSubcommand::AddTracks { id, uris } => {
                cli::playlist_add_tracks(id, uris).await
            }
        },
        Command::Library(opt) => match opt.command {
            LibrarySubcommand::Saved { limit, offset } => cli::library_saved(limit, offset).await,
            LibrarySubcommand::Save { ids } => cli::library_save(ids).await,
            LibrarySubcommand::Remove { ids } => cli::library_remove(ids).await,
            LibrarySubcommand::Contains { ids } => cli::library_contains(ids).await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
