use std::path::{Path, PathBuf};

use csv::{Reader, Writer};

use crate::{config::Config, error::TuneError, table::Tabular};

pub const PLAYLIST_FILE: &str = "playlist_df.csv";
pub const TOP_TRACKS_FILE: &str = "top_tracks_df.csv";
pub const SAVED_EPISODES_FILE: &str = "saved_episodes.csv";

/// Writes tables as CSV files into one output directory.
///
/// Files are overwritten without warning; there is no index column.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Creates `dir` (and its parents) when missing.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, TuneError> {
        let dir = dir.into();
        async_fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub async fn from_config(config: &Config) -> Result<Self, TuneError> {
        Self::new(config.output_dir.clone()).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn export<T: Tabular>(&self, table: &T, file_name: &str) -> Result<PathBuf, TuneError> {
        let path = self.path_for(file_name);
        let mut wtr = Writer::from_path(&path)?;

        wtr.write_record(table.headers())?;
        for record in table.records() {
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        Ok(path)
    }
}

/// Reads an exported file back as `(headers, records)`.
pub fn read_back(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), TuneError> {
    let mut rdr = Reader::from_path(path)?;
    let headers = rdr.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for record in rdr.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }

    Ok((headers, records))
}
