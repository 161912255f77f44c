//! Copilot Theme Kit CLI - browse, preview and export chat widget themes

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use copilot_theme_kit::{
    bridge::{serve_stdio, FsHost, HostBridge},
    config::Config,
    export::{
        default_file_name, embed_html, render_html, CanvasConfig, ExportContext, ExportFormat,
        HtmlVariant,
    },
    preview::{
        default_script, PreviewRenderer, PreviewState, ScriptedTurn, TokenClient, TokenSource,
        TransportMode,
    },
    studio::ThemeStudio,
    style::StyleValue,
    theme::{list_themes, search_themes, ColorKey, Theme, ThemeCategory},
    tui::{parse_hex, TerminalWidget},
};
use crossterm::style::Stylize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "copilot-theme-kit")]
#[command(about = "Design, preview and export Copilot Studio chat widget themes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog themes
    Themes {
        /// Filter by name, description or category
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category (default, modern, dark, light, custom)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show every color of a theme
    Show {
        /// Theme id
        id: String,
    },

    /// Export a theme as JSON, CSS or SCSS
    Export {
        /// Theme id (default: configured theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Output format (json, css, scss)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Color overrides as key=value (e.g. accentColor=#FF0000)
        #[arg(long = "override", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Output file, or - for stdout (default: <output_dir>/<theme>-theme.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a demo page or production canvas
    Html {
        /// Theme id (default: configured theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Page variant (demo, canvas)
        #[arg(short, long, default_value = "canvas")]
        variant: String,

        /// Token endpoint baked into the canvas
        #[arg(long)]
        token_endpoint: Option<String>,

        /// Bot avatar initials
        #[arg(long)]
        initials: Option<String>,

        /// Color overrides as key=value
        #[arg(long = "override", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Output file, or - for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the widget style options for a theme
    StyleOptions {
        /// Theme id (default: configured theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Extra style options as key=value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,
    },

    /// Generate an embeddable page that renders the widget with a theme's style options
    Embed {
        /// Theme id (default: configured theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Token endpoint for the page
        #[arg(long)]
        token_endpoint: Option<String>,

        /// Output file, or - for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview a theme in the terminal
    Preview {
        /// Theme id (default: configured theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Style changes applied after the widget mounts, as key=value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,

        /// Talk to a real agent instead of the scripted conversation
        #[arg(long)]
        live: bool,

        /// Token endpoint for live mode
        #[arg(long)]
        token_endpoint: Option<String>,

        /// Message to send once the widget is mounted
        #[arg(long)]
        say: Option<String>,

        /// How long to keep the preview open, in seconds
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Check that a token endpoint hands out Direct Line tokens
    CheckEndpoint {
        /// Token endpoint URL
        url: String,
    },

    /// Serve the webview message bridge over stdin/stdout
    Bridge {
        /// Directory exports are written to (default: configured output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Directory holding bundled media
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Show only specific section (theme, preview, export)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., theme.default_theme, preview.debounce_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries exports and bridge replies
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Themes { search, category } => {
            run_themes(search, category)?;
        }
        Commands::Show { id } => {
            run_show(&id)?;
        }
        Commands::Export {
            theme,
            format,
            overrides,
            output,
        } => {
            run_export(theme, &format, overrides, output).await?;
        }
        Commands::Html {
            theme,
            variant,
            token_endpoint,
            initials,
            overrides,
            output,
        } => {
            run_html(theme, &variant, token_endpoint, initials, overrides, output).await?;
        }
        Commands::StyleOptions { theme, sets } => {
            run_style_options(theme, sets)?;
        }
        Commands::Embed {
            theme,
            token_endpoint,
            output,
        } => {
            run_embed(theme, token_endpoint, output).await?;
        }
        Commands::Preview {
            theme,
            sets,
            live,
            token_endpoint,
            say,
            duration,
        } => {
            run_preview(theme, sets, live, token_endpoint, say, duration).await?;
        }
        Commands::CheckEndpoint { url } => {
            check_endpoint(&url).await?;
        }
        Commands::Bridge { output_dir, assets } => {
            run_bridge(output_dir, assets).await?;
        }
        Commands::Config(cmd) => {
            run_config_command(cmd).await?;
        }
    }

    Ok(())
}

fn parse_pair(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", raw);
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn open_studio(config: &Config, theme: Option<String>) -> Result<ThemeStudio> {
    let id = theme.unwrap_or_else(|| config.theme.default_theme.clone());
    Ok(ThemeStudio::with_theme(&id)?)
}

fn apply_overrides(studio: &mut ThemeStudio, overrides: &[String]) -> Result<()> {
    for raw in overrides {
        let (key, value) = parse_pair(raw)?;
        studio.update_override_str(&key, value)?;
    }
    Ok(())
}

async fn write_output(contents: &str, path: &Path) -> Result<()> {
    if path == Path::new("-") {
        println!("{}", contents);
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn swatch(value: &str) -> String {
    match parse_hex(value) {
        Some(color) => format!("{}", "    ".on(color)),
        None => "    ".to_string(),
    }
}

fn run_themes(search: Option<String>, category: Option<String>) -> Result<()> {
    let category = category
        .map(|c| c.parse::<ThemeCategory>())
        .transpose()?;
    let themes: Vec<&Theme> = match &search {
        Some(term) => search_themes(term),
        None => list_themes().iter().collect(),
    };

    let mut shown = 0;
    for theme in themes
        .into_iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
    {
        println!(
            "{} {:<20} {:<22} {}",
            swatch(theme.colors.get(ColorKey::PrimaryButtonBackground)),
            theme.id.as_str().bold(),
            theme.name,
            format!("[{}]", theme.category).dark_grey()
        );
        println!("     {}", theme.description);
        shown += 1;
    }

    if shown == 0 {
        println!("No themes match");
    }
    Ok(())
}

fn run_show(id: &str) -> Result<()> {
    let studio = ThemeStudio::with_theme(id)?;
    let theme = studio
        .selected_theme()
        .ok_or_else(|| anyhow!("No theme selected"))?;

    println!("{} ({})", theme.name.as_str().bold(), theme.id);
    println!("{}", theme.description);
    if !theme.tags.is_empty() {
        println!("Tags: {}", theme.tags.join(", "));
    }

    let mut group = None;
    for key in ColorKey::ALL {
        if group != Some(key.group()) {
            group = Some(key.group());
            println!();
            println!("{}", key.group().title().bold());
        }
        let value = theme.colors.get(key);
        println!("  {} {:<28} {}", swatch(value), key.label(), value);
    }
    Ok(())
}

async fn run_export(
    theme: Option<String>,
    format: &str,
    overrides: Vec<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let format: ExportFormat = format.parse()?;
    let mut studio = open_studio(&config, theme)?;
    apply_overrides(&mut studio, &overrides)?;

    let ctx = ExportContext::default().with_version(config.export.extension_version.clone());
    let contents = studio.export(format, &ctx)?;

    let path = match output {
        Some(path) => path,
        None => {
            let theme = studio
                .selected_theme()
                .ok_or_else(|| anyhow!("No theme selected"))?;
            config.export.output_dir.join(default_file_name(theme, format))
        }
    };

    info!(format = %format, overrides = overrides.len(), "exporting theme");
    write_output(&contents, &path).await
}

async fn run_html(
    theme: Option<String>,
    variant: &str,
    token_endpoint: Option<String>,
    initials: Option<String>,
    overrides: Vec<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let variant: HtmlVariant = variant.parse()?;
    let mut studio = open_studio(&config, theme)?;
    apply_overrides(&mut studio, &overrides)?;

    let theme = studio
        .effective_theme()
        .ok_or_else(|| anyhow!("No theme selected"))?;
    let initials = initials.unwrap_or_else(|| config.export.bot_avatar_initials.clone());
    let canvas = CanvasConfig::from_colors(&theme.colors, initials);
    let endpoint = token_endpoint.or_else(|| config.export.canvas_token_endpoint.clone());

    let page = render_html(variant, &canvas, endpoint.as_deref());
    let path = output.unwrap_or_else(|| config.export.output_dir.join(variant.default_file_name()));
    write_output(&page, &path).await?;

    if variant == HtmlVariant::Canvas && endpoint.is_none() {
        println!("Remember to replace the token endpoint placeholder before deploying.");
    }
    Ok(())
}

fn run_style_options(theme: Option<String>, sets: Vec<String>) -> Result<()> {
    let config = Config::load()?;
    let mut studio = open_studio(&config, theme)?;
    for raw in &sets {
        let (key, value) = parse_pair(raw)?;
        studio.set_style_option(key, StyleValue::parse_loose(&value));
    }
    println!("{}", studio.style_options().to_json_pretty()?);
    Ok(())
}

async fn run_embed(
    theme: Option<String>,
    token_endpoint: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let studio = open_studio(&config, theme)?;
    let endpoint = token_endpoint.or_else(|| config.preview.token_endpoint.clone());

    let page = embed_html(studio.style_options(), endpoint.as_deref())?;
    let path = output.unwrap_or_else(|| config.export.output_dir.join("copilot-studio-embed.html"));
    write_output(&page, &path).await
}

async fn run_preview(
    theme: Option<String>,
    sets: Vec<String>,
    live: bool,
    token_endpoint: Option<String>,
    say: Option<String>,
    duration: Option<u64>,
) -> Result<()> {
    let config = Config::load()?;
    let mut studio = open_studio(&config, theme)?;

    let script: Vec<ScriptedTurn> = default_script()
        .into_iter()
        .map(|turn| turn.with_delay(config.preview.mock_turn_delay_ms))
        .collect();
    let mode = if live || !config.preview.use_mock {
        let token_endpoint = token_endpoint
            .or_else(|| config.preview.token_endpoint.clone())
            .ok_or_else(|| anyhow!("Live preview needs --token-endpoint or MCS_TOKEN_ENDPOINT"))?;
        TransportMode::Live { token_endpoint }
    } else {
        TransportMode::Mock(script.clone())
    };

    let widget = TerminalWidget::new().with_bot_initials(config.export.bot_avatar_initials.clone());
    let mut renderer = PreviewRenderer::new(widget, mode, studio.style_options().clone())
        .with_debounce(config.preview.debounce());

    let state = renderer.mount().await?.clone();
    if let PreviewState::Error(reason) = &state {
        bail!("Preview failed to load: {}", reason);
    }
    info!(state = %state, "preview ready");

    if let Some(text) = say {
        if renderer.widget().send(&text).is_none() {
            println!("{}", "Messages can only be sent to the scripted conversation".dark_grey());
        }
    }

    let styles = studio.subscribe();
    let preview = tokio::spawn(async move {
        renderer.run(styles).await;
        renderer
    });

    for raw in &sets {
        let (key, value) = parse_pair(raw)?;
        studio.set_style_option(key, StyleValue::parse_loose(&value));
    }

    let wait = match duration {
        Some(secs) => Duration::from_secs(secs),
        None => {
            let script_ms: u64 = script.iter().map(|turn| turn.delay_ms).sum();
            Duration::from_millis(script_ms + config.preview.debounce_ms) + Duration::from_millis(500)
        }
    };
    tokio::time::sleep(wait).await;

    drop(studio);
    let renderer = preview.await?;
    println!();
    println!(
        "{}",
        format!(
            "Preview closed after {} render(s), {} message(s)",
            renderer.render_count(),
            renderer.widget().transcript().len()
        )
        .dark_grey()
    );
    Ok(())
}

async fn check_endpoint(url: &str) -> Result<()> {
    let client = TokenClient::new();
    println!("Checking token endpoint: {}", url);

    match client.fetch_token(url).await {
        Ok(token) => println!("✓ Token issued ({} characters)", token.len()),
        Err(e) => {
            println!("✗ Token request failed: {}", e);
            return Ok(());
        }
    }

    match client.fetch_channel_settings(url).await {
        Ok(settings) => println!("✓ Direct Line URL: {}", settings.direct_line_url),
        Err(e) => println!("✗ Regional settings unavailable: {}", e),
    }
    Ok(())
}

async fn run_bridge(output_dir: Option<PathBuf>, assets: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let mut host = FsHost::new(output_dir.unwrap_or_else(|| config.export.output_dir.clone()));
    if let Some(assets) = assets {
        host = host.with_asset_root(assets);
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let bridge = HostBridge::new(host, tx)
        .with_studio(ThemeStudio::with_theme(&config.theme.default_theme)?)
        .with_extension_version(config.export.extension_version.clone());

    serve_stdio(bridge, rx).await?;
    Ok(())
}

async fn run_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            config_init(force)?;
        }
        ConfigCommands::Show { section } => {
            config_show(section)?;
        }
        ConfigCommands::Set { key, value } => {
            config_set(&key, &value)?;
        }
        ConfigCommands::Path => {
            config_path();
        }
        ConfigCommands::Validate => {
            config_validate()?;
        }
    }
    Ok(())
}

fn config_init(force: bool) -> Result<()> {
    let path = Config::default_path();

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    config.save()?;

    println!("Configuration file created at: {}", path.display());
    println!();
    println!("To preview against a real agent, set a token endpoint:");
    println!("  copilot-theme-kit config set preview.token_endpoint <url>");
    println!("or export MCS_TOKEN_ENDPOINT=<url>");

    Ok(())
}

fn config_show(section: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let display = if let Some(sec) = section {
        match sec.to_lowercase().as_str() {
            "theme" => toml::to_string_pretty(&config.theme)?,
            "preview" => toml::to_string_pretty(&config.preview)?,
            "export" => toml::to_string_pretty(&config.export)?,
            _ => {
                println!("Unknown section: {}", sec);
                println!("Available: theme, preview, export");
                return Ok(());
            }
        }
    } else {
        toml::to_string_pretty(&config)?
    };

    println!("{}", display);

    println!("\n--- Environment Variables ---");
    for name in ["MCS_THEME", "MCS_TOKEN_ENDPOINT", "MCS_OUTPUT_DIR"] {
        println!(
            "{}: {}",
            name,
            std::env::var(name).unwrap_or_else(|_| "not set".to_string())
        );
    }

    Ok(())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    let Some((section, field)) = key.split_once('.') else {
        println!("Invalid key format. Use: section.key (e.g., preview.debounce_ms)");
        return Ok(());
    };

    match section {
        "theme" => match field {
            "default_theme" => config.theme.default_theme = value.to_string(),
            _ => {
                println!("Unknown theme field: {}", field);
                println!("Available: default_theme");
                return Ok(());
            }
        },
        "preview" => match field {
            "debounce_ms" => config.preview.debounce_ms = value.parse()?,
            "mock_turn_delay_ms" => config.preview.mock_turn_delay_ms = value.parse()?,
            "use_mock" => config.preview.use_mock = value.parse()?,
            "token_endpoint" => config.preview.token_endpoint = optional(value),
            _ => {
                println!("Unknown preview field: {}", field);
                println!("Available: debounce_ms, mock_turn_delay_ms, use_mock, token_endpoint");
                return Ok(());
            }
        },
        "export" => match field {
            "output_dir" => config.export.output_dir = PathBuf::from(value),
            "extension_version" => config.export.extension_version = value.to_string(),
            "bot_avatar_initials" => config.export.bot_avatar_initials = value.to_string(),
            "canvas_token_endpoint" => config.export.canvas_token_endpoint = optional(value),
            _ => {
                println!("Unknown export field: {}", field);
                println!("Available: output_dir, extension_version, bot_avatar_initials, canvas_token_endpoint");
                return Ok(());
            }
        },
        _ => {
            println!("Unknown section: {}", section);
            println!("Available: theme, preview, export");
            return Ok(());
        }
    }

    config.validate()?;
    config.save()?;
    println!("Set {} = {}", key, value);

    Ok(())
}

fn config_path() {
    let path = Config::default_path();
    println!("{}", path.display());

    if path.exists() {
        println!("(file exists)");
    } else {
        println!("(file does not exist - run 'config init' to create)");
    }
}

fn config_validate() -> Result<()> {
    let config = Config::load()?;
    match config.validate() {
        Ok(()) => println!("✓ Configuration is valid"),
        Err(e) => {
            println!("✗ {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
