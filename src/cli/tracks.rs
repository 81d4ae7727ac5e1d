use super::{RunOptions, client, exporter, report};
use crate::{pipeline, session::AuthSession};

pub async fn top_tracks(session: &AuthSession, options: RunOptions) {
    let api = client(session);
    let exporter = exporter(session).await;
    let mut cache = options.genre_cache();

    let result = pipeline::top_tracks(api, &options.table, &mut cache, &exporter).await;
    report(result, options.preview);
}
