use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tuneinsight::{
    Res, cli,
    config::{self, Config},
    error,
    normalize::Scaler,
    server::RedirectListener,
    session::{AuthSession, SystemBrowser},
    table::TableOptions,
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export one or all playlists of a user
    Playlists(PlaylistsOptions),

    /// Export a single playlist by id or URL
    Playlist(PlaylistOptions),

    /// Export your top tracks
    TopTracks(TrackOptions),

    /// Export your saved podcast episodes
    Episodes(EpisodesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct TrackOptions {
    /// Rescale the audio-feature columns
    #[clap(long, value_enum)]
    scale: Option<Scaler>,

    /// Keep rows with missing features or placeholder release dates
    #[clap(long)]
    keep_missing: bool,

    /// Leave release dates as Spotify reports them
    #[clap(long)]
    raw_dates: bool,

    /// Write the table to a CSV file
    #[clap(long)]
    csv: bool,

    /// Look up each artist's genres only once per run
    #[clap(long)]
    cache_genres: bool,

    /// Number of rows to print after the table is built
    #[clap(long, default_value_t = 10)]
    preview: usize,
}

impl TrackOptions {
    fn run_options(&self) -> cli::RunOptions {
        cli::RunOptions {
            table: TableOptions {
                scale: self.scale,
                dropna: !self.keep_missing,
                parse_date: !self.raw_dates,
                to_csv: self.csv,
            },
            cache_genres: self.cache_genres,
            preview: self.preview,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Profile URL of another user (defaults to you)
    #[clap(long)]
    user_url: Option<String>,

    /// Playlist number from the listing, or "all"
    #[clap(long)]
    select: Option<String>,

    #[clap(flatten)]
    tracks: TrackOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Playlist id or open.spotify.com URL
    reference: String,

    #[clap(flatten)]
    tracks: TrackOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct EpisodesOptions {
    /// Write the table to a CSV file
    #[clap(long)]
    csv: bool,

    /// Number of rows to print
    #[clap(long, default_value_t = 10)]
    preview: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn authenticate() -> Res<AuthSession> {
    let config = Config::from_env()?;
    let listener = RedirectListener::from_config(&config).await?.bind().await?;

    Ok(AuthSession::authenticate(config, listener, &SystemBrowser).await)
}

async fn run(cli: Cli) -> Res<()> {
    match cli.command {
        Command::Playlists(opt) => {
            let session = authenticate().await?;
            cli::playlists(&session, opt.user_url, opt.select, opt.tracks.run_options()).await
        }
        Command::Playlist(opt) => {
            let session = authenticate().await?;
            cli::playlist(&session, opt.reference, opt.tracks.run_options()).await
        }
        Command::TopTracks(opt) => {
            let session = authenticate().await?;
            cli::top_tracks(&session, opt.run_options()).await
        }
        Command::Episodes(opt) => {
            let session = authenticate().await?;
            cli::episodes(&session, opt.csv, opt.preview).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
    }
}
