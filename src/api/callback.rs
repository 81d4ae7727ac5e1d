use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query};
use tokio::sync::{Mutex, oneshot};

pub const SUCCESS_MESSAGE: &str = "Authorization successful. You can close this window now.";

/// Hands the captured code (or its absence) to whoever is waiting on the listener.
/// Only the first request finds the sender; later ones get the same reply and are ignored.
pub type CodeSender = Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>;

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(sender): Extension<CodeSender>,
) -> &'static str {
    let code = params.get("code").cloned();

    if let Some(tx) = sender.lock().await.take() {
        // the receiver only goes away when the listener already gave up
        let _ = tx.send(code);
    }

    SUCCESS_MESSAGE
}
