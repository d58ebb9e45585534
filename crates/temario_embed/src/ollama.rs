use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde_json::Value;

use crate::provider::{EmbedError, EmbedProvider};

/// Connection settings for a local Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_ms: u64,
    /// Inputs longer than this are truncated before embedding.
    pub max_chars: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            endpoint: "http://127.0.0.1:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            timeout_ms: 60_000,
            max_chars: 8_000,
        }
    }
}

/// Embedding provider backed by the Ollama HTTP API.
///
/// Uses the batched `/api/embed` endpoint and falls back to per-prompt
/// `/api/embeddings` for servers that predate it.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    cfg: OllamaConfig,
}

impl OllamaEmbedder {
    pub fn new(cfg: OllamaConfig) -> OllamaEmbedder {
        OllamaEmbedder { cfg }
    }

    pub fn cfg(&self) -> &OllamaConfig {
        &self.cfg
    }

    fn clamp(&self, text: &str) -> String {
        if text.len() <= self.cfg.max_chars {
            text.to_string()
        } else {
            text.chars().take(self.cfg.max_chars).collect()
        }
    }

    fn batch_embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let clamped: Vec<String> = inputs.iter().map(|s| self.clamp(s)).collect();
        let json = self.post_json(
            "/api/embed",
            serde_json::json!({ "model": self.cfg.model, "input": clamped }),
        )?;

        // Two response shapes exist in the wild:
        //   { "embeddings": [[...], ...] }
        //   { "data": [ { "embedding": [...] }, ... ] }
        if let Some(rows) = json.get("embeddings").and_then(Value::as_array) {
            return rows.iter().map(vector_from_value).collect();
        }
        if let Some(items) = json.get("data").and_then(Value::as_array) {
            return items
                .iter()
                .map(|item| {
                    item.get("embedding")
                        .ok_or_else(|| {
                            EmbedError::Protocol("missing data[i].embedding".to_string())
                        })
                        .and_then(vector_from_value)
                })
                .collect();
        }
        Err(EmbedError::Protocol(format!(
            "unrecognized /api/embed response: {}",
            json
        )))
    }

    fn single_embed(&self, input: &str) -> Result<Vec<f32>, EmbedError> {
        let json = self.post_json(
            "/api/embeddings",
            serde_json::json!({ "model": self.cfg.model, "prompt": self.clamp(input) }),
        )?;
        let row = json
            .get("embedding")
            .ok_or_else(|| EmbedError::Protocol("missing embedding".to_string()))?;
        vector_from_value(row)
    }

    fn post_json(&self, path: &str, payload: Value) -> Result<Value, EmbedError> {
        let body =
            serde_json::to_vec(&payload).map_err(|e| EmbedError::Protocol(e.to_string()))?;
        let (host, port) = host_port(&self.cfg.endpoint)?;

        let mut stream = TcpStream::connect((host.as_str(), port))
            .map_err(|e| EmbedError::Transport(format!("connect {}:{}: {}", host, port, e)))?;
        let timeout = Some(Duration::from_millis(self.cfg.timeout_ms));
        stream.set_read_timeout(timeout).ok();
        stream.set_write_timeout(timeout).ok();

        let head = format!(
            "POST {path} HTTP/1.1\r\nHost: {host}:{port}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream
            .write_all(head.as_bytes())
            .and_then(|_| stream.write_all(&body))
            .map_err(|e| EmbedError::Transport(format!("send request: {}", e)))?;

        let (status, bytes) = read_response(stream)?;
        let text = String::from_utf8_lossy(&bytes);
        if !(200..300).contains(&status) {
            return Err(EmbedError::Transport(format!("http {}: {}", status, text)));
        }
        serde_json::from_str(&text)
            .map_err(|e| EmbedError::Protocol(format!("decode response: {}", e)))
    }
}

impl EmbedProvider for OllamaEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.len() > 1 {
            if let Ok(vectors) = self.batch_embed(texts) {
                return Ok(vectors);
            }
        }
        texts.iter().map(|t| self.single_embed(t)).collect()
    }
}

fn vector_from_value(value: &Value) -> Result<Vec<f32>, EmbedError> {
    let row = value
        .as_array()
        .ok_or_else(|| EmbedError::Protocol("embedding is not an array".to_string()))?;
    row.iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| EmbedError::Protocol("embedding element is not a number".to_string()))
        })
        .collect()
}

fn host_port(endpoint: &str) -> Result<(String, u16), EmbedError> {
    let rest = endpoint
        .trim()
        .strip_prefix("http://")
        .ok_or_else(|| {
            EmbedError::Transport("endpoint must start with http://".to_string())
        })?
        .trim_end_matches('/');
    match rest.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| EmbedError::Transport(format!("invalid port in `{}`", endpoint)))?;
            Ok((host.to_string(), port))
        }
        None => Ok((rest.to_string(), 80)),
    }
}

fn read_response(stream: TcpStream) -> Result<(u16, Vec<u8>), EmbedError> {
    let mut reader = BufReader::new(stream);

    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .map_err(|e| EmbedError::Transport(format!("read status: {}", e)))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| EmbedError::Transport(format!("bad status line `{}`", status_line.trim())))?;

    let mut content_length: Option<usize> = None;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| EmbedError::Transport(format!("read header: {}", e)))?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().ok(),
                "transfer-encoding" => chunked = value.to_ascii_lowercase().contains("chunked"),
                _ => {}
            }
        }
    }

    let mut body = Vec::new();
    if chunked {
        loop {
            let mut size_line = String::new();
            reader
                .read_line(&mut size_line)
                .map_err(|e| EmbedError::Transport(format!("read chunk size: {}", e)))?;
            let size_line = size_line.trim();
            if size_line.is_empty() {
                continue;
            }
            let size_hex = size_line.split(';').next().unwrap_or(size_line);
            let size = usize::from_str_radix(size_hex, 16)
                .map_err(|_| EmbedError::Transport(format!("bad chunk size `{}`", size_line)))?;
            if size == 0 {
                break;
            }
            let start = body.len();
            body.resize(start + size, 0);
            reader
                .read_exact(&mut body[start..])
                .map_err(|e| EmbedError::Transport(format!("read chunk: {}", e)))?;
            let mut crlf = [0u8; 2];
            reader
                .read_exact(&mut crlf)
                .map_err(|e| EmbedError::Transport(format!("read chunk end: {}", e)))?;
        }
    } else if let Some(len) = content_length {
        body.resize(len, 0);
        reader
            .read_exact(&mut body)
            .map_err(|e| EmbedError::Transport(format!("read body: {}", e)))?;
    } else {
        reader
            .read_to_end(&mut body)
            .map_err(|e| EmbedError::Transport(format!("read body: {}", e)))?;
    }

    Ok((status, body))
}
