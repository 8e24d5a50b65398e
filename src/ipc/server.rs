//! Unix domain socket server for IPC
//!
//! Answers evaluate/status requests and pushes decision notifications to
//! subscribed clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::events::DecisionEvent;
use crate::intent::IntentEvaluator;

use super::protocol::{Request, Response, ServiceStatus};

/// Largest accepted frame body
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: UnixListener,
    shared: Arc<Shared>,
    shutdown_tx: broadcast::Sender<()>,
}

/// State shared by every connection
struct Shared {
    evaluator: IntentEvaluator,
    state: RwLock<ServerState>,
    event_tx: broadcast::Sender<DecisionEvent>,
}

/// Mutable service bookkeeping
struct ServerState {
    status: ServiceStatus,
    start_time: Instant,
}

impl Shared {
    fn new(evaluator: IntentEvaluator) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        let lexicon = evaluator.lexicon();
        let status = ServiceStatus {
            acknowledgement_phrases: lexicon.acknowledgements().len(),
            command_phrases: lexicon.commands().len(),
            ..ServiceStatus::default()
        };

        Self {
            evaluator,
            state: RwLock::new(ServerState {
                status,
                start_time: Instant::now(),
            }),
            event_tx,
        }
    }
}

impl Server {
    /// Create a new IPC server bound to `socket_path`
    pub fn new(socket_path: &Path, evaluator: IntentEvaluator) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Owner-only access (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener,
            shared: Arc::new(Shared::new(evaluator)),
            shutdown_tx,
        })
    }

    /// Receive every decision made by this server
    pub fn subscribe(&self) -> broadcast::Receiver<DecisionEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let shared = Arc::clone(&self.shared);
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, shared) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(stream: UnixStream, shared: Arc<Shared>) -> Result<()> {
        let (reader, mut writer) = stream.into_split();

        // Frames are read by a dedicated future so that a partially read
        // frame is never dropped when a notification wins the select
        let (frame_tx, mut frame_rx) = mpsc::channel::<Vec<u8>>(8);
        let reader = Self::read_frames(reader, frame_tx);
        tokio::pin!(reader);
        let mut reader_done = false;

        let mut notifications: Option<broadcast::Receiver<DecisionEvent>> = None;

        loop {
            tokio::select! {
                result = &mut reader, if !reader_done => {
                    reader_done = true;
                    result?;
                }

                frame = frame_rx.recv() => {
                    let Some(frame) = frame else {
                        debug!("client disconnected");
                        return Ok(());
                    };

                    let response = match serde_json::from_slice::<Request>(&frame) {
                        Ok(request) => {
                            debug!(?request, "received request");
                            let (response, subscribe) = Self::process_request(request, &shared).await;
                            if subscribe && notifications.is_none() {
                                notifications = Some(shared.event_tx.subscribe());
                                debug!("client subscribed to notifications");
                            }
                            response
                        }
                        Err(e) => {
                            warn!(?e, "malformed request");
                            Response::bad_request(e.to_string())
                        }
                    };

                    write_frame(&mut writer, &response).await?;
                }

                event = next_notification(&mut notifications) => {
                    match event {
                        Ok(event) => write_frame(&mut writer, &event).await?,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            notifications = None;
                        }
                    }
                }
            }
        }
    }

    /// Forward length-prefixed frames until EOF or an oversized frame
    async fn read_frames<R>(mut reader: R, frame_tx: mpsc::Sender<Vec<u8>>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        while let Some(frame) = read_frame(&mut reader).await? {
            if frame_tx.send(frame).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    /// Process a request and return a response
    /// Returns (Response, should_subscribe)
    async fn process_request(request: Request, shared: &Shared) -> (Response, bool) {
        match request {
            Request::Evaluate {
                text,
                agent_speaking,
            } => {
                let decision = shared.evaluator.evaluate(&text, agent_speaking);
                shared
                    .state
                    .write()
                    .await
                    .status
                    .counts
                    .record(decision.category());
                // No receivers is fine
                let _ = shared.event_tx.send(DecisionEvent::from(&decision));
                (Response::Decision(decision), false)
            }

            Request::GetStatus => {
                let mut state = shared.state.write().await;
                state.status.uptime_secs = state.start_time.elapsed().as_secs();
                (Response::Status(state.status.clone()), false)
            }

            Request::Ping => (Response::Pong, false),

            Request::Subscribe => (Response::Subscribed, true),
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Wait for the next notification, or forever when not subscribed
async fn next_notification(
    rx: &mut Option<broadcast::Receiver<DecisionEvent>>,
) -> Result<DecisionEvent, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Read one length-prefixed frame; `None` on clean EOF or an oversized frame
async fn read_frame<R>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        warn!(len, "message too large, disconnecting");
        return Ok(None);
    }

    let mut msg_buf = vec![0u8; len];
    reader.read_exact(&mut msg_buf).await?;
    Ok(Some(msg_buf))
}

/// Send a length-prefixed JSON message
async fn write_frame<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let msg_bytes = serde_json::to_vec(msg)?;
    let msg_len = (msg_bytes.len() as u32).to_le_bytes();

    writer.write_all(&msg_len).await?;
    writer.write_all(&msg_bytes).await?;

    Ok(())
}
