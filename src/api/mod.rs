//! Room backend API: wire types, blocking client, background workers
//!
//! The backend owns all game logic (room lifecycle, turn order, scoring,
//! prompt selection); this module only fetches state and triggers
//! transitions over plain JSON-over-HTTP.

pub mod client;
pub mod error;
pub mod types;
pub mod worker;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Category, Player, PlayerId, RoomId, RoomSnapshot};
pub use worker::{ApiEvent, Dispatcher, Envelope};

/// Minimal canned-response HTTP server playing the backend in tests.
///
/// Binds a real `TcpListener` on a random port, records every request
/// (method, target, body) in arrival order, and answers from per-route
/// stubs. Routes are keyed as `"METHOD /path"` including any query
/// string; one-shot responses queued with `enqueue` are served before
/// the persistent `stub` for the same route.
#[cfg(test)]
pub(crate) mod testserver {
    use std::collections::{HashMap, VecDeque};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    type Routes = HashMap<String, VecDeque<(u16, String)>>;

    #[derive(Default)]
    struct State {
        requests: Vec<String>,
        bodies: Vec<String>,
        queued: Routes,
        stubbed: HashMap<String, (u16, String)>,
    }

    pub struct StubServer {
        base_url: String,
        state: Arc<Mutex<State>>,
    }

    impl StubServer {
        pub fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
            let addr = listener.local_addr().expect("stub server addr");
            let state = Arc::new(Mutex::new(State::default()));

            let handler_state = Arc::clone(&state);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    match stream {
                        Ok(stream) => handle(stream, &handler_state),
                        Err(_) => break,
                    }
                }
            });

            Self {
                base_url: format!("http://{}", addr),
                state,
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        /// Persistent response for a route
        pub fn stub(&self, route: &str, status: u16, body: &str) {
            let mut state = self.state.lock().unwrap();
            state
                .stubbed
                .insert(route.to_string(), (status, body.to_string()));
        }

        /// One-shot response for a route, served before the persistent stub
        pub fn enqueue(&self, route: &str, status: u16, body: &str) {
            let mut state = self.state.lock().unwrap();
            state
                .queued
                .entry(route.to_string())
                .or_default()
                .push_back((status, body.to_string()));
        }

        /// `"METHOD /path"` for every request, in arrival order
        pub fn requests(&self) -> Vec<String> {
            self.state.lock().unwrap().requests.clone()
        }

        /// Non-empty request bodies, in arrival order
        pub fn bodies(&self) -> Vec<String> {
            self.state.lock().unwrap().bodies.clone()
        }

        pub fn request_count(&self) -> usize {
            self.state.lock().unwrap().requests.len()
        }
    }

    fn handle(stream: TcpStream, state: &Arc<Mutex<State>>) {
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        if reader.read_line(&mut request_line).is_err() {
            return;
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let target = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).is_err() || line.trim().is_empty() {
                break;
            }
            if let Some(value) = line
                .to_ascii_lowercase()
                .strip_prefix("content-length:")
                .map(str::trim)
                .map(str::to_string)
            {
                content_length = value.parse().unwrap_or(0);
            }
        }

        let mut body = vec![0u8; content_length];
        if content_length > 0 && reader.read_exact(&mut body).is_err() {
            return;
        }
        let body = String::from_utf8_lossy(&body).to_string();

        let route = format!("{} {}", method, target);
        let (status, response_body) = {
            let mut state = state.lock().unwrap();
            state.requests.push(route.clone());
            if !body.is_empty() {
                state.bodies.push(body);
            }
            state
                .queued
                .get_mut(&route)
                .and_then(|queue| queue.pop_front())
                .or_else(|| state.stubbed.get(&route).cloned())
                .unwrap_or((404, r#"{"error":"no stub for route"}"#.to_string()))
        };

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            response_body.len(),
            response_body
        );
        let mut stream = reader.into_inner();
        let _ = stream.write_all(response.as_bytes());
    }
}
