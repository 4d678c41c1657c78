//! Newline-delimited JSON framing.
//!
//! Inbound messages are one JSON object per line, discriminated by `type`:
//!
//! ```text
//! {"type":"list_tools"}
//! {"type":"call_tool","id":1,"name":"render_remotion","args":{...}}
//! ```
//!
//! `{"type":"ready"}` is written before any input is read. Lines that are not
//! valid messages are dropped without a reply. Calls run concurrently, so
//! results can arrive out of order; clients match them by `id`.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, ToolResponse, ToolSpec};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Inbound {
    ListTools,
    CallTool {
        /// `None` only when the key is absent; an explicit `null` is echoed back.
        #[serde(default, deserialize_with = "present")]
        id: Option<Value>,
        /// Any JSON value; non-strings are dispatched by their JSON text.
        #[serde(default)]
        name: Value,
        #[serde(default)]
        args: Value,
    },
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Tool name as the dispatcher sees it.
fn tool_name(name: &Value) -> String {
    match name {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Outbound {
    Ready,
    ListToolsResult {
        tools: Vec<ToolSpec>,
    },
    CallToolResult {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        #[serde(flatten)]
        response: ToolResponse,
    },
}

/// Line-delimited JSON server.
pub struct LineTransport {
    dispatcher: Dispatcher,
    buffer: Vec<u8>,
}

impl LineTransport {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Serves requests from `reader` until it reaches end of input.
    ///
    /// Calls still running at end of input are awaited and their results
    /// written before this returns.
    pub async fn serve<R, W>(mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
        // The channel is FIFO, so `ready` is always the first line written.
        let _ = tx.send(Outbound::Ready);

        let mut reader = BufReader::new(reader);
        let read_loop = async move {
            let result = self.read_messages(&mut reader, &tx).await;
            drop(tx);
            result
        };

        // Only this loop touches the writer.
        let write_loop = async {
            while let Some(message) = rx.recv().await {
                let mut line = serde_json::to_vec(&message)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
            }
            Ok::<(), io::Error>(())
        };

        tokio::pin!(read_loop, write_loop);
        tokio::select! {
            // A failed writer stops the reader; nothing could be answered.
            write = &mut write_loop => {
                write?;
                read_loop.await
            }
            read = &mut read_loop => {
                let write = write_loop.await;
                read?;
                write
            }
        }
    }

    async fn read_messages<R>(
        &mut self,
        reader: &mut BufReader<R>,
        tx: &mpsc::UnboundedSender<Outbound>,
    ) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            self.buffer.clear();
            let n = reader.read_until(b'\n', &mut self.buffer).await?;
            // An unterminated final line is never a complete message.
            if n == 0 || self.buffer.last() != Some(&b'\n') {
                info!("input closed");
                return Ok(());
            }

            match self.decode() {
                Some(Inbound::ListTools) => {
                    let _ = tx.send(Outbound::ListToolsResult {
                        tools: Dispatcher::tools(),
                    });
                }
                Some(Inbound::CallTool { id, name, args }) => {
                    if tx.is_closed() {
                        return Ok(());
                    }
                    let name = tool_name(&name);
                    let dispatcher = self.dispatcher.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let response = dispatcher.dispatch(&name, args).await;
                        let _ = tx.send(Outbound::CallToolResult { id, response });
                    });
                }
                None => {}
            }
        }
    }

    fn decode(&self) -> Option<Inbound> {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str(line) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(error = %e, "dropping unrecognized line");
                None
            }
        }
    }
}

/// Serves the line protocol on the process's stdin/stdout.
pub async fn serve_stdio(dispatcher: Dispatcher) -> io::Result<()> {
    LineTransport::new(dispatcher)
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
}
