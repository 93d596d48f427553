// relaydash - platform/socket.rs
//
// Blocking websocket adapter for the feed layer. One socket per
// telemetry channel, text frames only; binary, ping, and pong frames
// are handled by the library or skipped.

use crate::app::feed::MessageSource;
use crate::util::error::FeedError;
use std::net::TcpStream;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// A connected websocket message source.
pub struct WsSource {
    url: String,
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
}

impl WsSource {
    /// Connect to the given `ws://` / `wss://` URL.
    pub fn connect(url: &str) -> Result<Self, FeedError> {
        let (socket, response) =
            tungstenite::connect(url).map_err(|e| FeedError::Connect {
                url: url.to_string(),
                source: e,
            })?;

        tracing::info!(url, status = %response.status(), "Websocket connected");

        Ok(Self {
            url: url.to_string(),
            socket,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MessageSource for WsSource {
    fn send_request(&mut self, frame: &str) -> Result<(), FeedError> {
        self.socket
            .send(Message::Text(frame.to_string()))
            .map_err(|e| FeedError::Send { source: e })
    }

    fn next_message(&mut self) -> Result<Option<String>, FeedError> {
        loop {
            match self.socket.read() {
                Ok(Message::Text(text)) => return Ok(Some(text)),
                Ok(Message::Close(_)) => {
                    tracing::debug!(url = %self.url, "Close frame received");
                    return Ok(None);
                }
                // Control and binary frames carry no dashboard payload.
                Ok(_) => continue,
                Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => return Ok(None),
                Err(e) => return Err(FeedError::Receive { source: e }),
            }
        }
    }
}
