//! Minimal HTTP/1.1 object server for integration tests.
//!
//! Serves scripted responses keyed by request path, answers anything else with
//! 404, and records every requested path so tests can assert on derived URLs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    /// Status line tail, e.g. "200 OK" or "404 Not Found".
    pub status: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Sleep before answering (simulates a stalled origin).
    pub delay: Option<Duration>,
    /// Content-Length to announce instead of the real body length.
    pub declared_length: Option<usize>,
}

impl ScriptedResponse {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: "200 OK".to_string(),
            headers: Vec::new(),
            body: body.to_vec(),
            delay: None,
            declared_length: None,
        }
    }

    pub fn status(status: &str, body: &[u8]) -> Self {
        Self {
            status: status.to_string(),
            ..Self::ok(body)
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Announce `len` bytes but send only the body, then close.
    pub fn with_declared_length(mut self, len: usize) -> Self {
        self.declared_length = Some(len);
        self
    }
}

pub struct ObjectServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ObjectServer {
    /// Root URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request paths seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: Vec<(&str, ScriptedResponse)>) -> ObjectServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, ScriptedResponse>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, resp)| (path.to_string(), resp))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    ObjectServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// A base URL nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, ScriptedResponse>,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(10)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(path.clone());

    let not_found = ScriptedResponse::status("404 Not Found", b"not found");
    let resp = routes.get(&path).unwrap_or(&not_found);
    if let Some(d) = resp.delay {
        thread::sleep(d);
    }

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        resp.status,
        resp.declared_length.unwrap_or(resp.body.len())
    );
    for (name, value) in &resp.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&resp.body);
    let _ = stream.flush();
}
