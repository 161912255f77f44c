//! Preview renderer: mounts a chat widget and keeps its style current

use super::{
    DirectLineConnection, PreviewError, PreviewState, ScriptedTurn, SimulatedTransport,
    StyleDebouncer, TokenClient, TokenSource, Transport, DEFAULT_DEBOUNCE,
};
use crate::style::StyleOptions;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The widget being previewed.
///
/// Re-rendering is allowed to reset the scroll position; the renderer captures it
/// before and restores it after every render.
#[async_trait]
pub trait ChatWidget: Send {
    /// Load whatever the widget needs before it can render
    async fn load(&mut self) -> Result<(), PreviewError>;

    /// Connect the widget to its conversation source
    fn attach(&mut self, transport: Transport);

    fn render(&mut self, style: &StyleOptions);

    fn scroll_offset(&self) -> u32;

    fn restore_scroll(&mut self, offset: u32);
}

/// Where the preview conversation comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Mock(Vec<ScriptedTurn>),
    Live { token_endpoint: String },
}

pub struct PreviewRenderer<W> {
    widget: W,
    state: PreviewState,
    mode: TransportMode,
    tokens: Arc<dyn TokenSource>,
    style: StyleOptions,
    debounce: Duration,
    renders: usize,
}

impl<W: ChatWidget> PreviewRenderer<W> {
    pub fn new(widget: W, mode: TransportMode, style: StyleOptions) -> Self {
        Self {
            widget,
            state: PreviewState::Loading,
            mode,
            tokens: Arc::new(TokenClient::new()),
            style,
            debounce: DEFAULT_DEBOUNCE,
            renders: 0,
        }
    }

    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    /// Number of renders performed so far
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Load the widget and connect its transport.
    ///
    /// Load and token failures land in [`PreviewState::Error`]; only calling this
    /// outside the loading state is an `Err`.
    pub async fn mount(&mut self) -> Result<&PreviewState, PreviewError> {
        if self.state != PreviewState::Loading {
            return Err(PreviewError::InvalidTransition {
                from: self.state.name().to_string(),
                to: "mounted".to_string(),
            });
        }

        let next = match self.try_mount().await {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "preview failed to load");
                PreviewState::Error(e.to_string())
            }
        };
        self.state.transition(next)?;
        info!(state = %self.state, "preview mounted");
        Ok(&self.state)
    }

    async fn try_mount(&mut self) -> Result<PreviewState, PreviewError> {
        self.widget.load().await?;

        let (transport, next) = match &self.mode {
            TransportMode::Mock(script) => (
                Transport::Simulated(SimulatedTransport::new(script.clone())),
                PreviewState::Mock,
            ),
            TransportMode::Live { token_endpoint } => {
                let token = self.tokens.fetch_token(token_endpoint).await?;
                (
                    Transport::DirectLine(DirectLineConnection { token }),
                    PreviewState::Loaded,
                )
            }
        };

        self.widget.attach(transport);
        let style = self.style.clone();
        self.paint(&style);
        Ok(next)
    }

    /// Leave the error state and mount again
    pub async fn retry(&mut self) -> Result<&PreviewState, PreviewError> {
        if !matches!(self.state, PreviewState::Error(_)) {
            return Err(PreviewError::InvalidTransition {
                from: self.state.name().to_string(),
                to: PreviewState::Loading.name().to_string(),
            });
        }
        self.state.transition(PreviewState::Loading)?;
        self.mount().await
    }

    /// Switch between the scripted and the real transport, remounting the widget
    pub async fn set_mode(&mut self, mode: TransportMode) -> Result<&PreviewState, PreviewError> {
        self.mode = mode;
        if self.state != PreviewState::Loading {
            self.state.transition(PreviewState::Loading)?;
        }
        self.mount().await
    }

    /// Apply a style immediately. Before mount it is only remembered.
    pub fn apply_style(&mut self, style: StyleOptions) {
        self.style = style;
        if self.state.is_mounted() {
            let style = self.style.clone();
            self.paint(&style);
        }
    }

    fn paint(&mut self, style: &StyleOptions) {
        let offset = self.widget.scroll_offset();
        self.widget.render(style);
        self.widget.restore_scroll(offset);
        self.renders += 1;
        debug!(renders = self.renders, scroll = offset, "preview rendered");
    }

    /// Follow style updates until the sender goes away, debouncing bursts
    pub async fn run(&mut self, mut styles: watch::Receiver<StyleOptions>) {
        let (debouncer, mut settled) = StyleDebouncer::spawn(self.debounce);

        loop {
            tokio::select! {
                changed = styles.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = styles.borrow_and_update().clone();
                    debouncer.push(snapshot);
                }
                Some(style) = settled.recv() => self.apply_style(style),
            }
        }

        drop(debouncer);
        while let Some(style) = settled.recv().await {
            self.apply_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::default_script;
    use tokio::time::sleep;

    #[derive(Default)]
    struct FakeWidget {
        failing_loads: usize,
        loads: usize,
        simulated: Option<bool>,
        rendered: Vec<StyleOptions>,
        scroll: u32,
    }

    #[async_trait]
    impl ChatWidget for FakeWidget {
        async fn load(&mut self) -> Result<(), PreviewError> {
            self.loads += 1;
            if self.failing_loads > 0 {
                self.failing_loads -= 1;
                return Err(PreviewError::WidgetLoad("script blocked".to_string()));
            }
            Ok(())
        }

        fn attach(&mut self, transport: Transport) {
            self.simulated = Some(transport.is_simulated());
        }

        fn render(&mut self, style: &StyleOptions) {
            self.rendered.push(style.clone());
            self.scroll = 0;
        }

        fn scroll_offset(&self) -> u32 {
            self.scroll
        }

        fn restore_scroll(&mut self, offset: u32) {
            self.scroll = offset;
        }
    }

    struct StaticToken(Option<&'static str>);

    #[async_trait]
    impl TokenSource for StaticToken {
        async fn fetch_token(&self, _endpoint: &str) -> Result<String, PreviewError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| PreviewError::TokenEndpoint("403 Forbidden".to_string()))
        }
    }

    fn mock_renderer(widget: FakeWidget) -> PreviewRenderer<FakeWidget> {
        PreviewRenderer::new(
            widget,
            TransportMode::Mock(default_script()),
            StyleOptions::default(),
        )
    }

    fn accent(value: &str) -> StyleOptions {
        let mut style = StyleOptions::default();
        style.set("accent", value);
        style
    }

    #[tokio::test]
    async fn test_mock_mount() {
        let mut renderer = mock_renderer(FakeWidget::default());
        assert_eq!(renderer.mount().await.unwrap(), &PreviewState::Mock);
        assert_eq!(renderer.widget().simulated, Some(true));
        assert_eq!(renderer.render_count(), 1);
    }

    #[tokio::test]
    async fn test_live_mount_uses_token() {
        let mut renderer = PreviewRenderer::new(
            FakeWidget::default(),
            TransportMode::Live {
                token_endpoint: "https://example.com/token?api-version=1".to_string(),
            },
            StyleOptions::default(),
        )
        .with_token_source(Arc::new(StaticToken(Some("abc"))));

        assert_eq!(renderer.mount().await.unwrap(), &PreviewState::Loaded);
        assert_eq!(renderer.widget().simulated, Some(false));
    }

    #[tokio::test]
    async fn test_token_failure_is_error_state() {
        let mut renderer = PreviewRenderer::new(
            FakeWidget::default(),
            TransportMode::Live {
                token_endpoint: "https://example.com/token".to_string(),
            },
            StyleOptions::default(),
        )
        .with_token_source(Arc::new(StaticToken(None)));

        let state = renderer.mount().await.unwrap().clone();
        assert!(matches!(state, PreviewState::Error(ref msg) if msg.contains("403")));
        assert_eq!(renderer.render_count(), 0);
    }

    #[tokio::test]
    async fn test_retry_after_load_failure() {
        let mut renderer = mock_renderer(FakeWidget {
            failing_loads: 1,
            ..FakeWidget::default()
        });

        assert!(matches!(renderer.mount().await.unwrap(), PreviewState::Error(_)));
        assert_eq!(renderer.retry().await.unwrap(), &PreviewState::Mock);
        assert_eq!(renderer.widget().loads, 2);
    }

    #[tokio::test]
    async fn test_retry_only_from_error() {
        let mut renderer = mock_renderer(FakeWidget::default());
        renderer.mount().await.unwrap();
        assert!(renderer.retry().await.is_err());
        assert!(renderer.mount().await.is_err());
    }

    #[tokio::test]
    async fn test_set_mode_remounts() {
        let mut renderer = mock_renderer(FakeWidget::default())
            .with_token_source(Arc::new(StaticToken(Some("abc"))));
        renderer.mount().await.unwrap();

        let state = renderer
            .set_mode(TransportMode::Live {
                token_endpoint: "https://example.com/token".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(state, &PreviewState::Loaded);
        assert_eq!(renderer.widget().loads, 2);
    }

    #[tokio::test]
    async fn test_scroll_position_survives_render() {
        let mut renderer = mock_renderer(FakeWidget::default());
        renderer.mount().await.unwrap();
        renderer.widget_mut().scroll = 240;

        renderer.apply_style(accent("#FF0000"));

        assert_eq!(renderer.widget().scroll, 240);
        assert_eq!(renderer.widget().rendered.len(), 2);
    }

    #[tokio::test]
    async fn test_style_before_mount_is_used_at_mount() {
        let mut renderer = mock_renderer(FakeWidget::default());
        renderer.apply_style(accent("#123456"));
        assert_eq!(renderer.render_count(), 0);

        renderer.mount().await.unwrap();
        assert_eq!(renderer.widget().rendered[0].color("accent"), Some("#123456"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_coalesces_burst() {
        let (tx, rx) = watch::channel(StyleOptions::default());
        let mut renderer = mock_renderer(FakeWidget::default());
        renderer.mount().await.unwrap();

        let handle = tokio::spawn(async move {
            renderer.run(rx).await;
            renderer
        });

        for i in 0..5 {
            tx.send(accent(&format!("#00000{}", i))).unwrap();
            sleep(Duration::from_millis(10)).await;
        }
        sleep(Duration::from_millis(300)).await;
        drop(tx);

        let renderer = handle.await.unwrap();
        assert_eq!(renderer.render_count(), 2);
        let last = renderer.widget().rendered.last().unwrap();
        assert_eq!(last.color("accent"), Some("#000004"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_renders_each_spaced_update() {
        let (tx, rx) = watch::channel(StyleOptions::default());
        let mut renderer = mock_renderer(FakeWidget::default());
        renderer.mount().await.unwrap();

        let handle = tokio::spawn(async move {
            renderer.run(rx).await;
            renderer
        });

        for i in 0..3 {
            tx.send(accent(&format!("#AAAAA{}", i))).unwrap();
            sleep(Duration::from_millis(200)).await;
        }
        drop(tx);

        let renderer = handle.await.unwrap();
        assert_eq!(renderer.render_count(), 4);
    }
}
