use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use crate::commands::Registry;
use crate::db::Database;
use crate::frame::{Request, Response};
use crate::Error;

/// How many requests may wait for the dispatcher before submitters are slowed down.
const QUEUE_CAPACITY: usize = 256;

enum Message {
    Execute {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// The Dispatcher is the single owner of the command registry and the database.
///
/// Connections and the operator console never touch the collection themselves; they submit
/// requests through a [`Handle`] and the dispatcher executes them one at a time, in the order
/// they arrive. This is what makes the store safe to use without a lock.
pub struct Dispatcher {
    registry: Registry,
    db: Database,
    receiver: mpsc::Receiver<Message>,
}

/// Cheaply cloneable sender side of the [`Dispatcher`].
#[derive(Clone)]
pub struct Handle {
    sender: mpsc::Sender<Message>,
}

impl Dispatcher {
    pub fn new(registry: Registry, db: Database) -> (Dispatcher, Handle) {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let dispatcher = Dispatcher {
            registry,
            db,
            receiver,
        };

        (dispatcher, Handle { sender })
    }

    /// Executes requests until a shutdown is requested or every handle is dropped, then writes
    /// the collection out one last time.
    pub async fn run(mut self) {
        let mut shutdown_reply = None;

        while let Some(message) = self.receiver.recv().await {
            match message {
                Message::Execute { request, reply } => {
                    let response = self.registry.dispatch(request, &mut self.db);
                    // The submitter may have gone away; the request still ran.
                    let _ = reply.send(response);
                }
                Message::Shutdown { reply } => {
                    shutdown_reply = Some(reply);
                    break;
                }
            }
        }

        info!("Saving collection before shutdown");
        if let Err(e) = self.db.save() {
            error!(error = %e, "Failed to save collection on shutdown");
        }

        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }
}

impl Handle {
    pub async fn submit(&self, request: Request) -> Result<Response, Error> {
        let (reply, response) = oneshot::channel();

        self.sender
            .send(Message::Execute { request, reply })
            .await
            .map_err(|_| "dispatcher is not running")?;

        Ok(response.await?)
    }

    /// Like [`Handle::submit`], for callers outside the runtime such as the console thread.
    /// Panics if called from within an async context.
    pub fn blocking_submit(&self, request: Request) -> Result<Response, Error> {
        let (reply, response) = oneshot::channel();

        self.sender
            .blocking_send(Message::Execute { request, reply })
            .map_err(|_| "dispatcher is not running")?;

        Ok(response.blocking_recv()?)
    }

    /// Stops the dispatcher and waits until the collection has been saved.
    pub async fn shutdown(&self) -> Result<(), Error> {
        let (reply, done) = oneshot::channel();

        self.sender
            .send(Message::Shutdown { reply })
            .await
            .map_err(|_| "dispatcher is not running")?;

        Ok(done.await?)
    }
}
