//! Fire-and-forget score submission.
//!
//! A committed score is POSTed as JSON on a spawned task. The game never
//! waits for it: success, a non-200 reply and a transport error are all
//! just logged.

use breach_core::{ScoreEntry, ScoreSink};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(StatusCode),
    Failed(String),
}

/// Posts scores to an HTTP endpoint on the tokio runtime
#[derive(Debug, Clone)]
pub struct HttpScoreSink {
    client: reqwest::Client,
    url: String,
    runtime: Handle,
}

impl HttpScoreSink {
    pub fn new(url: impl Into<String>, timeout: Duration, runtime: Handle) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            runtime,
        })
    }
}

impl ScoreSink for HttpScoreSink {
    fn submit(&self, entry: ScoreEntry) {
        let client = self.client.clone();
        let url = self.url.clone();
        self.runtime.spawn(async move {
            post_score(&client, &url, &entry).await;
        });
    }
}

/// Either the HTTP sink or nothing, chosen from settings
#[derive(Debug, Clone)]
pub enum ScoreSubmitter {
    Http(HttpScoreSink),
    Disabled,
}

impl ScoreSink for ScoreSubmitter {
    fn submit(&self, entry: ScoreEntry) {
        match self {
            ScoreSubmitter::Http(sink) => sink.submit(entry),
            ScoreSubmitter::Disabled => {
                info!(name = %entry.name, score = entry.score, "Score submission disabled");
            }
        }
    }
}

/// POST one score and log how it went
pub async fn post_score(client: &reqwest::Client, url: &str, entry: &ScoreEntry) -> SubmitOutcome {
    let outcome = match client.post(url).json(entry).send().await {
        Ok(response) if response.status() == StatusCode::OK => SubmitOutcome::Accepted,
        Ok(response) => SubmitOutcome::Rejected(response.status()),
        Err(e) => SubmitOutcome::Failed(e.to_string()),
    };

    match &outcome {
        SubmitOutcome::Accepted => {
            info!(name = %entry.name, score = entry.score, "Score submitted successfully")
        }
        SubmitOutcome::Rejected(status) => warn!("Server returned status: {}", status),
        SubmitOutcome::Failed(e) => error!("Error connecting to server: {}", e),
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn entry() -> ScoreEntry {
        ScoreEntry {
            name: "NEO".into(),
            score: 1100,
            lore: 1,
            win: true,
        }
    }

    /// Read one full request (headers plus Content-Length body)
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve a single request with the given status line, returning the request
    async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/submit", listener.local_addr().expect("addr"));
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut stream).await;
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status);
            stream.write_all(response.as_bytes()).await.expect("write");
            stream.shutdown().await.ok();
            request
        });
        (url, handle)
    }

    #[tokio::test]
    async fn test_accepted_on_200() {
        let (url, server) = serve_once("200 OK").await;
        let client = reqwest::Client::new();

        let outcome = post_score(&client, &url, &entry()).await;
        assert_eq!(outcome, SubmitOutcome::Accepted);

        let request = server.await.expect("server");
        assert!(request.starts_with("POST /submit"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#"{"name":"NEO","score":1100,"lore":1,"win":true}"#));
    }

    #[tokio::test]
    async fn test_rejected_on_other_status() {
        let (url, server) = serve_once("500 Internal Server Error").await;
        let client = reqwest::Client::new();

        let outcome = post_score(&client, &url, &entry()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected(StatusCode::INTERNAL_SERVER_ERROR));
        server.await.expect("server");
    }

    #[tokio::test]
    async fn test_failed_when_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/submit", listener.local_addr().expect("addr"));
        drop(listener);

        let client = reqwest::Client::new();
        let outcome = post_score(&client, &url, &entry()).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_submit_does_not_block() {
        let sink = HttpScoreSink::new(
            "http://127.0.0.1:9/submit",
            Duration::from_millis(200),
            Handle::current(),
        )
        .expect("client");
        // Returns immediately; the spawned task fails in the background
        sink.submit(entry());
        ScoreSubmitter::Disabled.submit(entry());
    }
}
