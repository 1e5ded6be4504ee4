//! Live queries over the server's WebSocket bridge
//!
//! One background task owns the socket. Requests reach it over a channel and
//! answers are routed back by token.

use super::protocol::{ClientMessage, ServerMessage};
use super::{LiveError, LiveQuery, QueryRequest, Subscription, SubscriptionSender};
use crate::config::SessionConfig;
use crate::database::Mutation;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Command {
    Subscribe {
        token: u64,
        request: QueryRequest,
        sender: SubscriptionSender,
    },
    Run {
        token: u64,
        mutation: Mutation,
        reply: oneshot::Sender<Result<Value, LiveError>>,
    },
    Stop {
        token: u64,
    },
}

/// A connection to the `/db` bridge of a running server.
#[derive(Debug)]
pub struct WsSession {
    url: String,
    commands: mpsc::UnboundedSender<Command>,
    next_token: AtomicU64,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Subscribe { token, .. } => write!(f, "Subscribe({})", token),
            Command::Run { token, .. } => write!(f, "Run({})", token),
            Command::Stop { token } => write!(f, "Stop({})", token),
        }
    }
}

impl WsSession {
    /// Opens the WebSocket described by `config`.
    pub async fn connect(config: &SessionConfig) -> Result<Self, LiveError> {
        let url = config.url();
        let (socket, _) = connect_async(url.as_str()).await?;
        log::info!("Connected to {}", url);

        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(drive(socket, receiver));
        Ok(Self {
            url,
            commands,
            next_token: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl LiveQuery for WsSession {
    fn subscribe(&self, request: QueryRequest) -> Subscription {
        let (sender, subscription) = Subscription::channel();
        let token = self.token();

        // Tell the server to stop once the subscriber drops its handle.
        let commands = self.commands.clone();
        let cancellation = sender.cancellation();
        tokio::spawn(async move {
            cancellation.cancelled().await;
            let _ = commands.send(Command::Stop { token });
        });

        if self
            .commands
            .send(Command::Subscribe {
                token,
                request,
                sender,
            })
            .is_err()
        {
            log::warn!("Subscribing on closed session {}", self.url);
        }
        subscription
    }

    async fn run(&self, mutation: Mutation) -> Result<Value, LiveError> {
        let (reply, answer) = oneshot::channel();
        self.commands
            .send(Command::Run {
                token: self.token(),
                mutation,
                reply,
            })
            .map_err(|_| LiveError::Closed)?;
        answer.await.map_err(|_| LiveError::Closed)?
    }
}

async fn send_message(socket: &mut Socket, message: &ClientMessage) -> Result<(), LiveError> {
    let text = serde_json::to_string(message)?;
    socket.send(Message::Text(text)).await?;
    Ok(())
}

/// Owns the socket until either side goes away.
async fn drive(mut socket: Socket, mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut subscriptions: HashMap<u64, SubscriptionSender> = HashMap::new();
    let mut pending: HashMap<u64, oneshot::Sender<Result<Value, LiveError>>> = HashMap::new();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                let sent = match command {
                    Command::Subscribe { token, request, sender } => {
                        subscriptions.insert(token, sender);
                        send_message(&mut socket, &ClientMessage::Subscribe {
                            token,
                            query: request.query,
                            changes: request.changes,
                        }).await
                    }
                    Command::Run { token, mutation, reply } => {
                        pending.insert(token, reply);
                        send_message(&mut socket, &ClientMessage::Run { token, mutation }).await
                    }
                    Command::Stop { token } => {
                        if subscriptions.remove(&token).is_some() {
                            send_message(&mut socket, &ClientMessage::Stop { token }).await
                        } else {
                            Ok(())
                        }
                    }
                };
                if let Err(e) = sent {
                    log::error!("Failed to write to the bridge: {}", e);
                    break;
                }
            }
            frame = socket.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => route(message, &mut subscriptions, &mut pending).await,
                            Err(e) => log::warn!("Ignoring malformed bridge message: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        log::info!("Bridge closed the connection: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::error!("Bridge connection failed: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    for (_, reply) in pending.drain() {
        let _ = reply.send(Err(LiveError::Closed));
    }
    for (_, sender) in subscriptions.drain() {
        sender.send(Err(LiveError::Closed)).await;
    }
    let _ = socket.close(None).await;
}

async fn route(
    message: ServerMessage,
    subscriptions: &mut HashMap<u64, SubscriptionSender>,
    pending: &mut HashMap<u64, oneshot::Sender<Result<Value, LiveError>>>,
) {
    let token = message.token();
    if let Some(reply) = pending.remove(&token) {
        let outcome = match message {
            ServerMessage::Done { value, .. } => Ok(value),
            ServerMessage::Error { message, .. } => Err(LiveError::Server(message)),
            ServerMessage::Result { .. } | ServerMessage::End { .. } => Err(LiveError::Protocol(
                format!("subscription answer for mutation {}", token),
            )),
        };
        let _ = reply.send(outcome);
        return;
    }

    let update = match message {
        ServerMessage::Result { rows, .. } => Ok(rows),
        ServerMessage::Error { message, .. } => Err(LiveError::Server(message)),
        ServerMessage::Done { .. } => Err(LiveError::Protocol(format!(
            "mutation outcome for subscription {}",
            token
        ))),
        ServerMessage::End { .. } => {
            // Dropping the only sender closes the subscriber's channel.
            subscriptions.remove(&token);
            return;
        }
    };
    let Some(sender) = subscriptions.get(&token) else {
        log::debug!("Dropping answer for finished request {}", token);
        return;
    };
    if !sender.send(update).await {
        subscriptions.remove(&token);
    }
}
