// Session - the state of one chat panel
//
// Everything a dispatch needs travels in the session instead of living in
// globals: the bridge, the sink the panel draws from, the backend
// conversation id and the number of requests currently in flight. Two panels
// are simply two sessions.

use crate::bridge::{Bridge, Endpoint, Payload};
use crate::sink::DisplaySink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Payload key carrying the backend conversation id
pub const SESSION_ID_KEY: &str = "session_id";

#[derive(Clone)]
pub struct Session {
    bridge: Bridge,
    sink: Arc<dyn DisplaySink>,
    /// Forwarded to the backend so it can keep chat history
    backend_session: Option<String>,
    in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when a request finishes, however it ends
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Session {
    pub fn new(bridge: Bridge, sink: Arc<dyn DisplaySink>, backend_session: Option<String>) -> Self {
        Self {
            bridge,
            sink,
            backend_session,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn sink(&self) -> &dyn DisplaySink {
        self.sink.as_ref()
    }

    pub fn backend_session(&self) -> Option<&str> {
        self.backend_session.as_deref()
    }

    /// Requests sent but not yet answered
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Attach the conversation id unless the caller already set one
    fn prepare(&self, mut payload: Payload) -> Payload {
        if let Some(id) = &self.backend_session {
            if !payload.contains_key(SESSION_ID_KEY) {
                payload.insert(SESSION_ID_KEY, id.as_str());
            }
        }
        payload
    }

    /// Send one request and wait for its result to reach the sink
    pub async fn send(&self, endpoint: Endpoint, payload: Payload) {
        let payload = self.prepare(payload);
        let _guard = InFlight::start(&self.in_flight);
        self.bridge.send(endpoint, &payload, self.sink()).await;
    }

    /// Fire-and-forget: the result arrives through the sink later
    ///
    /// Earlier calls are not cancelled, so rapid invocations may interleave
    /// their placeholders and results.
    pub fn invoke(&self, endpoint: Endpoint, payload: Payload) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move { session.send(endpoint, payload).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::THINKING_PLACEHOLDER;
    use crate::config::BackendConfig;
    use crate::sink::ChatLog;

    fn offline_session(backend_session: Option<&str>) -> (Session, ChatLog) {
        let log = ChatLog::new();
        let bridge = Bridge::new(&BackendConfig {
            // reserved port, nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            ..BackendConfig::default()
        })
        .unwrap();
        let session = Session::new(bridge, Arc::new(log.clone()), backend_session.map(String::from));
        (session, log)
    }

    #[test]
    fn test_prepare_adds_session_id() {
        let (session, _) = offline_session(Some("abc"));
        let payload = session.prepare(Payload::new().with("question", "why"));
        assert_eq!(payload.get_str(SESSION_ID_KEY), Some("abc"));
        assert_eq!(payload.get_str("question"), Some("why"));
    }

    #[test]
    fn test_prepare_keeps_explicit_session_id() {
        let (session, _) = offline_session(Some("abc"));
        let payload = session.prepare(Payload::new().with(SESSION_ID_KEY, "mine"));
        assert_eq!(payload.get_str(SESSION_ID_KEY), Some("mine"));
    }

    #[test]
    fn test_prepare_without_session_leaves_payload_alone() {
        let (session, _) = offline_session(None);
        assert!(session.prepare(Payload::new()).is_empty());
    }

    #[tokio::test]
    async fn test_invoke_is_fire_and_forget() {
        let (session, log) = offline_session(None);

        let handle = session.invoke(Endpoint::Followup, Payload::new().with("question", "q"));
        handle.await.unwrap();

        let texts = log.tutor_texts();
        assert_eq!(texts[0], THINKING_PLACEHOLDER);
        assert!(texts[1].contains("http://127.0.0.1:9"));
        assert_eq!(session.in_flight(), 0);
    }
}
