//! TuneInsight Library
//!
//! This library turns a Spotify account's listening data into flat tables that
//! are ready for analysis. It authorizes against the Spotify Web API, pulls
//! playlists, top tracks and saved episodes, enriches tracks with audio
//! features and genres, cleans and optionally rescales the result and writes
//! it to CSV.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local redirect listener
//! - `cli` - Command-line interface implementations
//! - `collection` - Paginated retrieval of the user's collections
//! - `config` - Configuration management and environment variables
//! - `enrich` - Audio-feature batching and genre lookup
//! - `error` - The crate's error type
//! - `export` - CSV export of finished tables
//! - `normalize` - Column scalers for audio-feature columns
//! - `pipeline` - End-to-end export operations
//! - `server` - One-shot local HTTP server for the OAuth redirect
//! - `session` - Authorization-code handshake and the bound API client
//! - `spotify` - Spotify Web API client implementation
//! - `table` - Table building, row policies and previews
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tuneinsight::{config, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> tuneinsight::Res<()> {
//!     config::load_env().await?;
//!     let config = Config::from_env()?;
//!     // Authenticate and run pipeline operations...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod spotify;
pub mod table;
pub mod types;
pub mod utils;

pub use error::TuneError;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary boundary, where configuration, IO and API errors of
/// different types meet. Library code returns [`TuneError`] instead.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use tuneinsight::Res;
///
/// async fn run() -> Res<()> {
///     tuneinsight::config::load_env().await?;
///     Ok(())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Waiting for the authorization redirect...");
/// info!("Building table for {} top tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Authentication successful.");
/// success!("Saved {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Cannot load environment. Err: {}", e);
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Playlist {} can't be retrieved, skipping it.", name);
/// warning!("Audio features unavailable for {} tracks", count);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
