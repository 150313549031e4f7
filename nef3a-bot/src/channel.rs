//! JSON-lines messaging channel
//!
//! Inbound, one object per line:
//!
//! ```text
//! {"sender": 42, "text": "123456 B"}
//! ```
//!
//! Outbound, one object per handled message, blocks in send order:
//!
//! ```text
//! {"sender": 42, "blocks": ["🚘 Plate: 123456 B\n...", "🔄 Send 'more' to load more results."]}
//! ```

use nef3a_core::{Inbound, SenderId};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

/// Inbound wire message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub sender: SenderId,
    pub text: String,
}

impl From<InboundMessage> for Inbound {
    fn from(msg: InboundMessage) -> Self {
        Inbound::new(msg.sender, msg.text)
    }
}

/// Outbound wire message: every reply block for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub sender: SenderId,
    pub blocks: Vec<String>,
}

/// Parse one inbound line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InboundMessage>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Read inbound lines until EOF and forward them to `tx`.
///
/// Malformed lines are logged and skipped. Returns the number of messages
/// forwarded.
pub async fn pump_inbound<R>(reader: R, tx: mpsc::Sender<Inbound>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = LinesStream::new(reader.lines());
    let mut forwarded = 0;

    while let Some(line) = lines.next().await {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(msg)) => {
                if tx.send(msg.into()).await.is_err() {
                    debug!("inbound receiver closed");
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "skipping malformed inbound line"),
        }
    }

    Ok(forwarded)
}

/// Write outbound messages as JSON lines until every sender is dropped.
pub async fn pump_outbound<W>(mut writer: W, mut rx: mpsc::Receiver<OutboundMessage>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        let mut line = serde_json::to_string(&msg)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
