use super::{client, exporter, report};
use crate::{pipeline, session::AuthSession};

/// Exports saved episodes. Episode tables have no row or scaling policies, so
/// only `to_csv` and the preview size apply.
pub async fn episodes(session: &AuthSession, to_csv: bool, preview: usize) {
    let api = client(session);
    let exporter = exporter(session).await;

    let result = pipeline::saved_episodes(api, to_csv, &exporter).await;
    report(result, preview);
}
