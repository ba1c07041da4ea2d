//! Live order-book stream: connection, subscription and the reader
//! producer.
//!
//! The reader is a producer in the dispatcher's sense: it never touches
//! shared state, it only turns inbound frames into `Top1Book` values and
//! sends them onto the delivery queue. On malformed input or connection
//! loss it logs and terminates; there is no reconnection.

use std::time::Duration;

use eyre::{bail, Result};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::wire;
use crate::arb::book::Top1Book;
use crate::arb::types::Symbol;

/// The exchange websocket host
pub const WS_ENDPOINT: &str = "ws.bitstamp.net";

/// Bound on each outbound subscribe write. Book-update processing is not
/// subject to any timeout.
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// An established websocket stream to the exchange
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Dials the exchange's streaming endpoint.
///
/// # Errors
/// * If the URL cannot be built
/// * If the websocket handshake fails
pub async fn connect() -> Result<WsStream> {
    let ws_url = Url::parse(&format!("wss://{WS_ENDPOINT}"))?;
    log::info!("connecting to {ws_url}");

    let (stream, response) = connect_async(ws_url.as_str()).await?;
    log::info!("dial status: {}", response.status());

    Ok(stream)
}

/// Subscribes to the order-book channel of every symbol.
///
/// Each outbound frame gets the fixed write timeout; a timeout or write
/// error aborts the subscription phase.
///
/// # Errors
/// * If a subscribe write fails or times out
pub async fn subscribe<S>(write: &mut S, pairs: &[Symbol]) -> Result<()>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    for pair in pairs {
        let frame = Message::Text(wire::subscribe_frame(pair));

        match timeout(WRITE_TIMEOUT, write.send(frame)).await {
            Ok(sent) => sent?,
            Err(_) => bail!("subscribe write for {pair} timed out"),
        }
    }

    Ok(())
}

/// Drains the inbound stream, forwarding one `Top1Book` per data frame onto
/// the delivery queue.
///
/// Terminates on read errors, malformed frames, stream closure, or a
/// dropped receiver.
pub async fn read_books<S>(mut read: S, tx: UnboundedSender<Top1Book>)
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(msg) = read.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                log::info!("stream closed by the exchange");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                log::error!("read error: {e}");
                break;
            }
        };

        match wire::handle_frame(&text) {
            Ok(Some(update)) => {
                if tx.send(update).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("bad frame: {e}");
                break;
            }
        }
    }

    log::info!("book stream reader stopped");
}
