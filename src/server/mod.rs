//! HTTP transport on tokio.
//!
//! The shell is shared as `Arc<Mutex<App<A>>>`. Each connection task reads
//! its request asynchronously, then takes the lock only for the synchronous
//! `App::handle` call, so requests are processed one at a time.

pub mod http;

use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context as _;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use crate::app::{App, Application};
use crate::event::message::Response;
use http::{read_request, write_response, HttpError, HttpRequest, HttpResponse};

/// A shell shared between connection tasks.
pub type SharedApp<A> = Arc<Mutex<App<A>>>;

/// Lock the shell. A poisoned lock is recovered; the state it guards is
/// plain data and stays usable.
pub fn lock<A: Application>(shared: &SharedApp<A>) -> MutexGuard<'_, App<A>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn handle_locked<A: Application>(shared: &SharedApp<A>, request: &HttpRequest) -> HttpResponse {
    lock(shared).handle(request)
}

/// Bind to the configured address and serve until Ctrl-C, then run teardown.
pub async fn serve<A: Application>(app: App<A>) -> anyhow::Result<()> {
    let address = app.config().address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, name = %app.config().name, "serving");

    let shared = Arc::new(Mutex::new(app));
    serve_on(listener, Arc::clone(&shared), async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {error}");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    lock(&shared).shutdown();
    Ok(())
}

/// Accept connections on `listener` until `shutdown` completes.
pub async fn serve_on<A, F>(listener: TcpListener, shared: SharedApp<A>, shutdown: F) -> io::Result<()>
where
    A: Application,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("shutdown requested");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(error) => {
                        tracing::warn!("accept failed: {error}");
                        continue;
                    }
                };
                let shared = Arc::clone(&shared);
                tokio::spawn(async move {
                    if let Err(error) = handle_connection(stream, shared).await {
                        tracing::debug!(%peer, "connection error: {error}");
                    }
                });
            }
        }
    }
}

async fn handle_connection<A: Application>(
    stream: TcpStream,
    shared: SharedApp<A>,
) -> Result<(), HttpError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let response = match read_request(&mut reader).await {
        Ok(Some(request)) => handle_locked(&shared, &request),
        Ok(None) => return Ok(()),
        Err(HttpError::BodyTooLarge(size)) => HttpResponse::json(
            413,
            &Response::error(format!("Request body of {size} bytes is too large")),
        ),
        Err(HttpError::Malformed(reason)) => {
            HttpResponse::json(400, &Response::error(format!("Malformed request: {reason}")))
        }
        Err(error) => return Err(error),
    };
    write_response(&mut write_half, &response).await?;
    Ok(())
}
