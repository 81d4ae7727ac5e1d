use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{Extension, Router};
use tokio::{
    net::{TcpListener, lookup_host},
    sync::{Mutex, oneshot},
};

use crate::{
    api::{self, CodeSender},
    config::Config,
    error::TuneError,
    warning,
};

/// Source of the authorization code produced by the browser redirect.
#[async_trait]
pub trait CodeListener: Send {
    /// Blocks until the redirect arrives. `Ok(None)` means a request came in
    /// without a `code` parameter.
    async fn wait_for_code(&mut self) -> Result<Option<String>, TuneError>;
}

/// One-shot local HTTP listener for the OAuth redirect.
///
/// The socket is bound either up front with [`RedirectListener::bind`] or on
/// the call to [`RedirectListener::listen`]. Exactly one request is served and
/// the socket is released before `listen` returns.
#[derive(Debug)]
pub struct RedirectListener {
    addr: SocketAddr,
    timeout: Option<Duration>,
    socket: Option<TcpListener>,
}

impl RedirectListener {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: None,
            socket: None,
        }
    }

    /// Resolves `SERVER_ADDRESS`, which may be a host name such as
    /// `localhost:8888`; the first resolved address is used.
    pub async fn from_config(config: &Config) -> Result<Self, TuneError> {
        let invalid = |reason: String| {
            TuneError::Config(format!(
                "Failed to resolve server address {}: {}",
                config.server_address, reason
            ))
        };

        let addr = lookup_host(config.server_address.as_str())
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no address found".to_string()))?;

        Ok(Self::new(addr).with_timeout(config.callback_timeout))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds the socket now, so a redirect that arrives right after the
    /// browser opens is not refused.
    pub async fn bind(mut self) -> Result<Self, TuneError> {
        if self.socket.is_none() {
            let socket = bind_socket(self.addr).await?;
            self.addr = socket.local_addr()?;
            self.socket = Some(socket);
        }
        Ok(self)
    }

    pub async fn listen(&mut self) -> Result<Option<String>, TuneError> {
        let socket = match self.socket.take() {
            Some(socket) => socket,
            None => bind_socket(self.addr).await?,
        };

        serve_once(socket, self.timeout).await
    }
}

async fn bind_socket(addr: SocketAddr) -> Result<TcpListener, TuneError> {
    TcpListener::bind(addr).await.map_err(|e| {
        TuneError::Authentication(format!("cannot bind callback listener on {}: {}", addr, e))
    })
}

#[async_trait]
impl CodeListener for RedirectListener {
    async fn wait_for_code(&mut self) -> Result<Option<String>, TuneError> {
        self.listen().await
    }
}

/// Serves `listener` until the first request arrives and returns its `code`.
///
/// The server is shut down and joined before this returns, whether a code was
/// captured, the request lacked one, or the timeout elapsed.
pub async fn serve_once(
    listener: TcpListener,
    timeout: Option<Duration>,
) -> Result<Option<String>, TuneError> {
    let (code_tx, code_rx) = oneshot::channel::<Option<String>>();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let sender: CodeSender = Arc::new(Mutex::new(Some(code_tx)));

    let app = Router::new()
        .fallback(api::callback)
        .layer(Extension(sender));

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, code_rx).await {
            Ok(received) => received.map_err(|_| stopped()),
            Err(_) => Err(TuneError::Authentication(format!(
                "no authorization redirect received within {} seconds",
                limit.as_secs()
            ))),
        },
        None => code_rx.await.map_err(|_| stopped()),
    };

    let _ = shutdown_tx.send(());
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warning!("Callback listener stopped with an error: {}", e),
        Err(e) => warning!("Callback listener task failed: {}", e),
    }

    outcome
}

fn stopped() -> TuneError {
    TuneError::Authentication("callback listener stopped before a request arrived".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn local_listener() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn captures_code_from_first_request() {
        let (listener, addr) = local_listener().await;
        let handle = tokio::spawn(serve_once(listener, Some(Duration::from_secs(5))));

        let body = reqwest::get(format!("http://{}/callback?code=abc123&state=x", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body, api::SUCCESS_MESSAGE);
        let code = handle.await.unwrap().unwrap();
        assert_eq!(code.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn request_without_code_yields_none() {
        let (listener, addr) = local_listener().await;
        let handle = tokio::spawn(serve_once(listener, Some(Duration::from_secs(5))));

        let res = reqwest::get(format!("http://{}/callback?error=access_denied", addr))
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), api::SUCCESS_MESSAGE);
        assert!(handle.await.unwrap().unwrap().is_none());
    }

    #[tokio::test]
    async fn socket_is_released_after_return() {
        let (listener, addr) = local_listener().await;
        let handle = tokio::spawn(serve_once(listener, Some(Duration::from_secs(5))));

        reqwest::get(format!("http://{}/callback?code=x", addr))
            .await
            .unwrap();
        handle.await.unwrap().unwrap();

        assert!(TcpListener::bind(addr).await.is_ok());
    }

    #[tokio::test]
    async fn bound_listener_accepts_redirect() {
        let mut listener = RedirectListener::new("127.0.0.1:0".parse().unwrap())
            .with_timeout(Some(Duration::from_secs(5)))
            .bind()
            .await
            .unwrap();
        let addr = listener.addr();
        assert_ne!(addr.port(), 0);

        let handle = tokio::spawn(async move { listener.wait_for_code().await });
        reqwest::get(format!("http://{}/?code=later", addr)).await.unwrap();

        assert_eq!(handle.await.unwrap().unwrap().as_deref(), Some("later"));
    }

    #[tokio::test]
    async fn from_config_resolves_host_names() {
        let mut config = Config::new("id", "secret");
        config.server_address = "localhost:8888".to_string();
        config.callback_timeout = Some(Duration::from_secs(3));

        let listener = RedirectListener::from_config(&config).await.unwrap();
        assert!(listener.addr().ip().is_loopback());
        assert_eq!(listener.addr().port(), 8888);
        assert_eq!(listener.timeout, Some(Duration::from_secs(3)));

        config.server_address = "127.0.0.1:9999".to_string();
        let listener = RedirectListener::from_config(&config).await.unwrap();
        assert_eq!(listener.addr(), "127.0.0.1:9999".parse::<SocketAddr>().unwrap());

        config.server_address = "no port here".to_string();
        let result = RedirectListener::from_config(&config).await;
        assert!(matches!(result, Err(TuneError::Config(_))));
    }

    #[tokio::test]
    async fn times_out_without_request() {
        let (listener, addr) = local_listener().await;
        let result = serve_once(listener, Some(Duration::from_millis(50))).await;

        assert!(matches!(result, Err(TuneError::Authentication(_))));
        assert!(TcpListener::bind(addr).await.is_ok());
    }
}
