//! Throwaway HTTP responder for client tests.
//!
//! Accepts a single connection, records the raw request, and answers with a
//! canned status and body.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use std::time::Duration;

/// What the responder does with its one connection.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with this status line and JSON body
    Respond {
        status: u16,
        reason: &'static str,
        body: String,
    },
    /// Read the request, then stall for this long
    Stall(Duration),
}

/// A started responder.
pub struct Responder {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    /// Resolves to the raw request text
    pub request: JoinHandle<anyhow::Result<String>>,
}

/// Starts a responder that handles exactly one request.
pub async fn respond_once(reply: Reply) -> anyhow::Result<Responder> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let request = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let raw = read_request(&mut socket).await?;
        match reply {
            Reply::Respond {
                status,
                reason,
                body,
            } => {
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await?;
                socket.shutdown().await?;
            }
            Reply::Stall(duration) => tokio::time::sleep(duration).await,
        }
        Ok(raw)
    });

    Ok(Responder { base_url, request })
}

/// Shorthand for a JSON reply.
pub fn json(status: u16, reason: &'static str, body: &str) -> Reply {
    Reply::Respond {
        status,
        reason,
        body: body.to_string(),
    }
}

/// A successful chat-completions body.
pub fn completion(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "deepseek-chat",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 800, "total_tokens": 920 }
    })
    .to_string()
}

/// A local URL nothing is listening on.
pub async fn closed_port_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn read_request(socket: &mut TcpStream) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
