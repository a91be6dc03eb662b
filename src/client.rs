// src/client.rs
use crate::directory::UserDirectory;
use crate::error::DirectoryError;
use crate::messages::MessageStore;
use crate::models::NewUser;
use crate::protocol::{ClientRequest, ServerResponse};
use crate::utils::{encode_packet, read_frame, write_frame, MAX_PACKET_LEN};
use anyhow::Result;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

/// One connected peer. Only the signed-in username is per-connection state.
pub struct Client {
    directory: UserDirectory,
    messages: MessageStore,
    username: Option<String>,
}

impl Client {
    pub fn new(directory: UserDirectory, messages: MessageStore) -> Self {
        Self {
            directory,
            messages,
            username: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Serves requests until the peer disconnects.
    pub async fn run<S>(&mut self, stream: S) -> Result<()>
    where
        S: AsyncRead + AsyncWrite,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);
        loop {
            let frame = match read_frame(&mut reader).await {
                Ok(frame) => frame,
                Err(e) => {
                    debug!(error = %e, user = ?self.username, "connection closed");
                    break;
                }
            };

            let response = match serde_json::from_slice::<ClientRequest>(&frame) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!(error = %e, "malformed request");
                    ServerResponse::error(400, "invalid request format")
                }
            };

            let mut body = encode_packet(&response)?;
            if body.len() > MAX_PACKET_LEN {
                warn!(len = body.len(), "reply exceeds packet limit");
                body = encode_packet(&ServerResponse::error(413, "reply too large"))?;
            }
            write_frame(&mut writer, &body).await?;
        }
        Ok(())
    }

    pub async fn handle_request(&mut self, request: ClientRequest) -> ServerResponse {
        let result = match request {
            ClientRequest::Register {
                username,
                password,
                first_name,
                last_name,
                phone,
            } => self
                .directory
                .register(NewUser {
                    username,
                    password,
                    first_name,
                    last_name,
                    phone,
                })
                .await
                .map(|user| ServerResponse::ok(format!("registered {}", user.username))),
            ClientRequest::Login { username, password } => self.handle_login(username, password).await,
            ClientRequest::ListUsers => self.directory.all().await.map(|users| ServerResponse::Users { users }),
            ClientRequest::GetUser { username } => match self.require_self(&username) {
                Ok(()) => self.directory.get(&username).await.map(|user| ServerResponse::User { user }),
                Err(denied) => return denied,
            },
            ClientRequest::MessagesFrom { username } => match self.require_self(&username) {
                Ok(()) => self
                    .directory
                    .messages_from(&username)
                    .await
                    .map(|messages| ServerResponse::SentMessages { messages }),
                Err(denied) => return denied,
            },
            ClientRequest::MessagesTo { username } => match self.require_self(&username) {
                Ok(()) => self
                    .directory
                    .messages_to(&username)
                    .await
                    .map(|messages| ServerResponse::ReceivedMessages { messages }),
                Err(denied) => return denied,
            },
            ClientRequest::SendMessage { to_username, body } => match self.username.clone() {
                Some(sender) => self
                    .messages
                    .create(&sender, &to_username, &body)
                    .await
                    .map(|message| ServerResponse::Message { message }),
                None => return ServerResponse::error(401, "please log in first"),
            },
            ClientRequest::ReadMessage { id } => match self.username.clone() {
                Some(reader) => self.handle_read(&reader, id).await,
                None => return ServerResponse::error(401, "please log in first"),
            },
        };

        result.unwrap_or_else(|e| {
            if e.status_code() >= 500 {
                error!(error = %e, "request failed");
            } else {
                debug!(error = %e, "request rejected");
            }
            ServerResponse::error(e.status_code(), e.public_message())
        })
    }

    /// Account details and message lists are visible only to their owner.
    fn require_self(&self, username: &str) -> Result<(), ServerResponse> {
        match self.username.as_deref() {
            None => Err(ServerResponse::error(401, "please log in first")),
            Some(me) if me == username => Ok(()),
            Some(_) => Err(ServerResponse::error(403, "not allowed to view another user's account")),
        }
    }

    async fn handle_login(&mut self, username: String, password: String) -> Result<ServerResponse, DirectoryError> {
        if !self.directory.authenticate(&username, &password).await? {
            return Ok(ServerResponse::AuthResponse {
                status: "error".to_string(),
                message: "invalid username or password".to_string(),
            });
        }
        self.directory.update_login_timestamp(&username).await?;
        info!(%username, "user logged in");
        self.username = Some(username);
        Ok(ServerResponse::ok("logged in"))
    }

    async fn handle_read(&self, reader: &str, id: i64) -> Result<ServerResponse, DirectoryError> {
        let message = self.messages.get(id).await?;
        // Only the recipient may mark a message read; others see it as absent.
        if message.to_username != reader {
            return Err(DirectoryError::NotFound(format!("no such message: {id}")));
        }
        let (id, read_at) = self.messages.mark_read(id).await?;
        Ok(ServerResponse::MessageRead { id, read_at })
    }
}
