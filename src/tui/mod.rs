//! Terminal chat widget for previewing themes without a browser
//!
//! Messages are drawn as colored bubbles using the palette resolved from the
//! current style options. A re-render redraws the whole transcript.

pub mod spinner;
pub mod theme;

pub use spinner::LoadingSpinner;
pub use theme::{parse_hex, Palette};

use crate::preview::{
    Activity, ChatWidget, PreviewError, SimulatedTransport, Speaker, Transport,
};
use crate::style::StyleOptions;
use async_trait::async_trait;
use crossterm::style::Stylize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const SEND_BOX_HINT: &str = "Type your message";

/// Format one activity as a colored bubble line
pub fn format_bubble(palette: &Palette, activity: &Activity, bot_initials: &str) -> String {
    match activity.speaker {
        Speaker::Bot => format!(
            "{} {}",
            format!(" {} ", bot_initials).with(palette.background).on(palette.send_button),
            format!(" {} ", activity.text).with(palette.bot_text).on(palette.bot_bubble),
        ),
        Speaker::User => format!(
            "      {}",
            format!(" {} ", activity.text).with(palette.user_text).on(palette.user_bubble),
        ),
    }
}

/// Format the send box drawn under the transcript
pub fn format_send_box(palette: &Palette) -> String {
    format!(
        "{}{}",
        format!(" {:<40}", SEND_BOX_HINT).with(palette.dim).on(palette.send_box),
        " ➤ ".with(palette.send_button).on(palette.send_box),
    )
}

struct Screen {
    palette: Palette,
    transcript: Vec<Activity>,
    bot_initials: String,
    echo: bool,
}

impl Screen {
    fn push(&mut self, activity: Activity) {
        if self.echo {
            println!("{}", format_bubble(&self.palette, &activity, &self.bot_initials));
        }
        self.transcript.push(activity);
    }

    fn redraw(&self) {
        if !self.echo {
            return;
        }
        println!();
        for activity in &self.transcript {
            println!("{}", format_bubble(&self.palette, activity, &self.bot_initials));
        }
        println!("{}", format_send_box(&self.palette));
    }
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chat widget that draws into the terminal
pub struct TerminalWidget {
    screen: Arc<Mutex<Screen>>,
    spinner: LoadingSpinner,
    transport: Option<SimulatedTransport>,
    printer: Option<JoinHandle<()>>,
    scroll: u32,
}

impl TerminalWidget {
    /// Widget that prints to stdout
    pub fn new() -> Self {
        Self::build(true, LoadingSpinner::new())
    }

    /// Widget that keeps its transcript without drawing anything
    pub fn quiet() -> Self {
        Self::build(false, LoadingSpinner::hidden())
    }

    fn build(echo: bool, spinner: LoadingSpinner) -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen {
                palette: Palette::default(),
                transcript: Vec::new(),
                bot_initials: "BOT".to_string(),
                echo,
            })),
            spinner,
            transport: None,
            printer: None,
            scroll: 0,
        }
    }

    pub fn with_bot_initials(self, initials: impl Into<String>) -> Self {
        lock(&self.screen).bot_initials = initials.into();
        self
    }

    pub fn palette(&self) -> Palette {
        lock(&self.screen).palette
    }

    /// Activities received so far
    pub fn transcript(&self) -> Vec<Activity> {
        lock(&self.screen).transcript.clone()
    }

    /// Send a user message through the simulated transport.
    ///
    /// Returns `None` when the widget is not attached to one.
    pub fn send(&self, text: &str) -> Option<String> {
        self.transport.as_ref().map(|t| t.post_activity(text))
    }
}

impl Default for TerminalWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalWidget {
    fn drop(&mut self) {
        if let Some(printer) = self.printer.take() {
            printer.abort();
        }
    }
}

#[async_trait]
impl ChatWidget for TerminalWidget {
    async fn load(&mut self) -> Result<(), PreviewError> {
        self.spinner.start("Loading chat widget...");
        Ok(())
    }

    fn attach(&mut self, transport: Transport) {
        if let Some(printer) = self.printer.take() {
            printer.abort();
        }
        lock(&self.screen).transcript.clear();
        self.transport = None;

        match transport {
            Transport::Simulated(mut simulated) => {
                let Some(mut activities) = simulated.take_activities() else {
                    return;
                };
                let screen = Arc::clone(&self.screen);
                self.printer = Some(tokio::spawn(async move {
                    while let Some(activity) = activities.recv().await {
                        debug!(id = %activity.id, "activity received");
                        lock(&screen).push(activity);
                    }
                }));
                simulated.replay();
                self.transport = Some(simulated);
                info!("terminal preview attached to scripted conversation");
            }
            Transport::DirectLine(connection) => {
                self.spinner.stop();
                info!(
                    token_len = connection.token.len(),
                    "terminal preview attached to Direct Line"
                );
                if lock(&self.screen).echo {
                    println!(
                        "{}",
                        "Connected to Direct Line. Conversation runs in the browser widget.".dark_grey()
                    );
                }
            }
        }
    }

    fn render(&mut self, style: &StyleOptions) {
        self.spinner.stop();
        let mut screen = lock(&self.screen);
        screen.palette = Palette::from_style(style);
        screen.redraw();
        // Redrawing starts from the top
        self.scroll = 0;
    }

    fn scroll_offset(&self) -> u32 {
        self.scroll
    }

    fn restore_scroll(&mut self, offset: u32) {
        self.scroll = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::ScriptedTurn;
    use crossterm::style::Color;
    use std::time::Duration;

    fn script() -> Vec<ScriptedTurn> {
        vec![
            ScriptedTurn::bot("Hello").with_delay(100),
            ScriptedTurn::user("Hi there").with_delay(100),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_collects_scripted_turns() {
        let mut widget = TerminalWidget::quiet();
        widget.load().await.unwrap();
        widget.attach(Transport::Simulated(SimulatedTransport::new(script())));

        tokio::time::sleep(Duration::from_millis(250)).await;
        let transcript = widget.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].text, "Hello");
        assert_eq!(transcript[1].speaker, Speaker::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_echoes_and_replies() {
        let mut widget = TerminalWidget::quiet();
        widget.attach(Transport::Simulated(
            SimulatedTransport::new(script()).with_reply_delay(Duration::from_millis(50)),
        ));
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert!(widget.send("What colors?").is_some());
        tokio::time::sleep(Duration::from_millis(100)).await;

        let transcript = widget.transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[2].text, "What colors?");
        assert_eq!(transcript[3].text, "Hello");
    }

    #[test]
    fn test_render_updates_palette_and_resets_scroll() {
        let mut widget = TerminalWidget::quiet();
        widget.restore_scroll(7);

        let mut style = StyleOptions::empty();
        style.set("bubbleBackground", "#000000");
        widget.render(&style);

        assert_eq!(widget.palette().bot_bubble, Color::Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(widget.scroll_offset(), 0);
    }

    #[tokio::test]
    async fn test_spinner_runs_until_first_render() {
        let mut widget = TerminalWidget::quiet();
        widget.load().await.unwrap();
        assert!(widget.spinner.is_active());

        widget.render(&StyleOptions::empty());
        assert!(!widget.spinner.is_active());
    }

    #[test]
    fn test_send_without_transport() {
        let widget = TerminalWidget::quiet();
        assert!(widget.send("hello").is_none());
    }

    #[test]
    fn test_format_bubble_contains_text() {
        let activity = Activity {
            id: "sim-1".to_string(),
            speaker: Speaker::Bot,
            text: "Welcome".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let line = format_bubble(&Palette::default(), &activity, "OB");
        assert!(line.contains("Welcome"));
        assert!(line.contains("OB"));
        assert!(format_send_box(&Palette::default()).contains(SEND_BOX_HINT));
    }
}
