use bytes::BytesMut;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::thread;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, field, info, instrument, warn};

use crate::codec::FrameCodec;
use crate::commands::Registry;
use crate::config::Config;
use crate::connection::Connection;
use crate::console;
use crate::db::Database;
use crate::dispatcher::{Dispatcher, Handle};
use crate::frame::{Request, Response};
use crate::persistence::JsonFile;
use crate::Error;

/// Closes the connection after persisting the collection. Never answered.
pub const EXIT: &str = "exit";

const SAVE: &str = "save";

const INVALID_REQUEST: &str = "Invalid request";

/// Per-connection resource bounds.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_frame_size: usize,
    /// How long a connection may stay silent, or take to accept a response, before it is closed.
    pub idle_timeout: Duration,
}

/// Loads the collection, starts the dispatcher and the operator console, and serves clients
/// until Ctrl-C or the console's `exit`. The collection is saved on the way out.
pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let path = match config.path.clone() {
        Some(path) => path,
        None => {
            tokio::task::spawn_blocking(|| {
                console::prompt_for_path(&mut io::stdin().lock(), &mut io::stderr())
            })
            .await??
        }
    };

    let db = Database::open(JsonFile::new(path)).map_err(|e| {
        error!(error = %e, "Unable to load the collection");
        e
    })?;

    let (dispatcher, handle) = Dispatcher::new(Registry::with_defaults(), db);
    let dispatcher = tokio::spawn(dispatcher.run());

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        thread::Builder::new()
            .name("console".to_string())
            .spawn(move || console::listen(io::stdin().lock(), handle, shutdown))?;
    }

    let signal = async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Shutdown signal received");
            }
            _ = shutdown.cancelled() => {}
        }
    };

    serve(listener, handle.clone(), config.limits(), signal).await;

    handle.shutdown().await?;
    dispatcher.await?;

    info!("Server stopped");
    Ok(())
}

/// Accepts connections until `shutdown` completes. Each connection is served by its own task that
/// forwards requests to the dispatcher.
pub async fn serve(listener: TcpListener, dispatcher: Handle, limits: Limits, shutdown: impl Future) {
    tokio::select! {
        _ = accept_loop(&listener, &dispatcher, limits) => {}
        _ = shutdown => {
            info!("No longer accepting connections");
        }
    }
}

async fn accept_loop(listener: &TcpListener, dispatcher: &Handle, limits: Limits) {
    loop {
        let (socket, client_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {:?}", client_address);

        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, dispatcher, limits).await {
                warn!(error = %e, "Connection closed with error");
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, client_address, dispatcher, limits),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    dispatcher: Handle,
    limits: Limits,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream, FrameCodec::new(limits.max_frame_size));

    tracing::Span::current()
        .record("connection_id", field::display(conn.id))
        .record("client_address", field::display(client_address));

    loop {
        let frame: BytesMut = match timeout(limits.idle_timeout, conn.read_frame()).await {
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                info!("Connection idle for too long");
                break;
            }
        };

        let request = match Request::parse(&frame) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to decode request");
                respond(&mut conn, &Response::failure(INVALID_REQUEST), limits).await?;
                continue;
            }
        };
        info!(command = %request.command, "Received request");

        if request.command == EXIT {
            info!("Client terminated the session");
            let response = dispatcher.submit(Request::new(SAVE)).await?;
            if response.success {
                info!("Collection saved");
            } else {
                warn!(message = %response.message, "Failed to save collection");
            }
            break;
        }

        let response = dispatcher.submit(request).await?;
        debug!("Sending response to client: {:?}", response);
        respond(&mut conn, &response, limits).await?;
    }

    info!("Connection closed");
    Ok(())
}

async fn respond(conn: &mut Connection, response: &Response, limits: Limits) -> Result<(), Error> {
    timeout(limits.idle_timeout, conn.write_message(response))
        .await
        .map_err(|_| "timed out writing response")?
}
