//! Conversation transports for the preview widget

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Pause after each scripted turn, and before a simulated reply
pub const DEFAULT_TURN_DELAY_MS: u64 = 1000;

fn default_delay_ms() -> u64 {
    DEFAULT_TURN_DELAY_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Bot => write!(f, "bot"),
            Speaker::User => write!(f, "user"),
        }
    }
}

/// One entry of a scripted conversation.
///
/// `delay_ms` is the pause after this turn, so turn `i` of a uniform script arrives
/// at `i * delay_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedTurn {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl ScriptedTurn {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            delay_ms: DEFAULT_TURN_DELAY_MS,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            delay_ms: DEFAULT_TURN_DELAY_MS,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// The sample conversation shown when no real endpoint is configured
pub fn default_script() -> Vec<ScriptedTurn> {
    vec![
        ScriptedTurn::bot("Hello! I'm your virtual assistant. How can I help you today?"),
        ScriptedTurn::user("Hi! I'm looking for information about your products and services."),
        ScriptedTurn::bot(
            "Great! I'd be happy to help you with product information. We offer a wide range of services including:\n\
             • Product consultation\n• Technical support\n• Account management\n• Custom solutions\n\n\
             What specific area interests you most?",
        ),
        ScriptedTurn::user("I'm particularly interested in technical support options."),
        ScriptedTurn::bot(
            "Perfect! Our technical support includes:\n\
             • 24/7 online assistance\n• Live chat support\n• Phone support during business hours\n\
             • Comprehensive documentation\n• Video tutorials\n\n\
             Would you like me to connect you with a technical specialist?",
        ),
    ]
}

/// A message delivered to the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Connection status codes, numbered as the Direct Line client numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConnectionState {
    Uninitialized = 0,
    Connecting = 1,
    Online = 2,
    FailedToConnect = 4,
}

impl ConnectionState {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Plays a scripted conversation without any network access
pub struct SimulatedTransport {
    script: Vec<ScriptedTurn>,
    status: ConnectionState,
    reply_delay: Duration,
    outbox: mpsc::UnboundedSender<Activity>,
    inbox: Option<mpsc::UnboundedReceiver<Activity>>,
    next_id: Arc<AtomicU64>,
    reply_cursor: Arc<AtomicUsize>,
}

impl SimulatedTransport {
    pub fn new(script: Vec<ScriptedTurn>) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        Self {
            script,
            status: ConnectionState::Online,
            reply_delay: Duration::from_millis(DEFAULT_TURN_DELAY_MS),
            outbox,
            inbox: Some(inbox),
            next_id: Arc::new(AtomicU64::new(1)),
            reply_cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn script(&self) -> &[ScriptedTurn] {
        &self.script
    }

    /// Activity stream; can only be taken once
    pub fn take_activities(&mut self) -> Option<mpsc::UnboundedReceiver<Activity>> {
        self.inbox.take()
    }

    pub fn status(&self) -> ConnectionState {
        self.status
    }

    /// Force a connection status, for exercising widget status handling
    pub fn simulate_connection_state(&mut self, state: ConnectionState) {
        debug!(state = state.code(), "simulated connection state");
        self.status = state;
    }

    /// Replay the whole script from the start, one turn after another
    pub fn replay(&self) {
        let script = self.script.clone();
        let outbox = self.outbox.clone();
        let next_id = Arc::clone(&self.next_id);

        tokio::spawn(async move {
            for turn in script {
                let activity = Activity {
                    id: format!("sim-{}", next_id.fetch_add(1, Ordering::Relaxed)),
                    speaker: turn.speaker,
                    text: turn.text,
                    timestamp: Utc::now(),
                };
                if outbox.send(activity).is_err() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(turn.delay_ms)).await;
            }
        });
    }

    /// Echo a user message now, then answer with the next scripted bot line.
    ///
    /// Returns the id assigned to the echoed activity.
    pub fn post_activity(&self, text: impl Into<String>) -> String {
        let id = format!("sim-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let _ = self.outbox.send(Activity {
            id: id.clone(),
            speaker: Speaker::User,
            text: text.into(),
            timestamp: Utc::now(),
        });

        let bot_lines: Vec<String> = self
            .script
            .iter()
            .filter(|turn| turn.speaker == Speaker::Bot)
            .map(|turn| turn.text.clone())
            .collect();
        if bot_lines.is_empty() {
            return id;
        }

        let reply_index = self.reply_cursor.fetch_add(1, Ordering::Relaxed) % bot_lines.len();
        let reply = bot_lines[reply_index].clone();
        let outbox = self.outbox.clone();
        let next_id = Arc::clone(&self.next_id);
        let delay = self.reply_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = outbox.send(Activity {
                id: format!("sim-{}", next_id.fetch_add(1, Ordering::Relaxed)),
                speaker: Speaker::Bot,
                text: reply,
                timestamp: Utc::now(),
            });
        });

        id
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(default_script())
    }
}

/// A real Direct Line session established from a token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLineConnection {
    pub token: String,
}

/// What the mounted widget talks to
pub enum Transport {
    Simulated(SimulatedTransport),
    DirectLine(DirectLineConnection),
}

impl Transport {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Transport::Simulated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    #[test]
    fn test_default_script_alternates_speakers() {
        let script = default_script();
        assert_eq!(script.len(), 5);
        for (i, turn) in script.iter().enumerate() {
            let expected = if i % 2 == 0 { Speaker::Bot } else { Speaker::User };
            assert_eq!(turn.speaker, expected);
            assert_eq!(turn.delay_ms, DEFAULT_TURN_DELAY_MS);
        }
    }

    #[test]
    fn test_connection_state_codes() {
        assert_eq!(ConnectionState::Uninitialized.code(), 0);
        assert_eq!(ConnectionState::Connecting.code(), 1);
        assert_eq!(ConnectionState::Online.code(), 2);
        assert_eq!(ConnectionState::FailedToConnect.code(), 4);
    }

    #[test]
    fn test_turn_deserializes_with_default_delay() {
        let turn: ScriptedTurn =
            serde_json::from_str(r#"{"speaker":"user","text":"hi"}"#).unwrap();
        assert_eq!(turn, ScriptedTurn::user("hi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_spaces_turns_cumulatively() {
        let mut transport = SimulatedTransport::default();
        let mut activities = transport.take_activities().unwrap();
        let start = Instant::now();
        transport.replay();

        for (i, turn) in default_script().iter().enumerate() {
            let activity = activities.recv().await.unwrap();
            assert_eq!(activity.text, turn.text);
            assert_eq!(
                start.elapsed().as_millis() / 1000,
                i as u128,
                "turn {} arrived at the wrong time",
                i
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_activity_echoes_then_replies() {
        let mut transport = SimulatedTransport::new(vec![
            ScriptedTurn::bot("first"),
            ScriptedTurn::user("ignored"),
            ScriptedTurn::bot("second"),
        ]);
        let mut activities = transport.take_activities().unwrap();

        let id = transport.post_activity("hello");
        let echo = activities.try_recv().unwrap();
        assert_eq!(echo.id, id);
        assert_eq!(echo.speaker, Speaker::User);
        assert!(activities.try_recv().is_err());

        sleep(Duration::from_millis(1001)).await;
        let reply = activities.try_recv().unwrap();
        assert_eq!(reply.speaker, Speaker::Bot);
        assert_eq!(reply.text, "first");
        assert_ne!(reply.id, id);

        transport.post_activity("again");
        sleep(Duration::from_millis(1001)).await;
        let _echo = activities.try_recv().unwrap();
        assert_eq!(activities.try_recv().unwrap().text, "second");
    }

    #[tokio::test]
    async fn test_user_only_script_never_replies() {
        let mut transport = SimulatedTransport::new(vec![ScriptedTurn::user("hi")])
            .with_reply_delay(Duration::from_millis(1));
        let mut activities = transport.take_activities().unwrap();
        transport.post_activity("hello");
        sleep(Duration::from_millis(20)).await;
        assert!(activities.try_recv().is_ok());
        assert!(activities.try_recv().is_err());
    }

    #[test]
    fn test_simulate_connection_state() {
        let mut transport = SimulatedTransport::default();
        assert_eq!(transport.status(), ConnectionState::Online);
        transport.simulate_connection_state(ConnectionState::FailedToConnect);
        assert_eq!(transport.status(), ConnectionState::FailedToConnect);
    }
}
