use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::api::ApiService;
use crate::config::AppConfig;
use crate::internal::chatbot::ChatbotPresenter;
use crate::internal::models::{AnalysisResult, Article, Sentiment};
use crate::internal::preference::{ThemePreference, ThemeStore};
use crate::utils::format::{format_confidence, format_received_at};
use crate::utils::theme_loader::{self, TuiTheme};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

/// Fixed link-out for therapist discovery. Fire-and-forget; no state.
const THERAPIST_SEARCH_URL: &str = "https://www.google.com/search?q=Therapist+near+me";

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Actions/messages sent through the app action channel.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Analyze,
    AnalysisLoaded(AnalysisResult),
    AnalysisFailed(String),
    FetchNews(Sentiment),
    ArticlesLoaded(Vec<Article>),
    NewsFailed(String),
    NavigateUp,
    NavigateDown,
    OpenArticle,
    OpenTherapistSearch,
    ToggleTheme,
    ToggleChatbot,
}

/// Main application state. Read by the render layer, mutated only in
/// `handle_action` on the event-loop task.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub input: String,
    pub input_mode: InputMode,
    pub result: Option<AnalysisResult>,
    pub articles: Vec<Article>,
    pub article_list_state: ListState,
    /// Admission control for analysis submissions; only one in flight.
    pub loading: bool,
    /// Display-only; news fetches are never gated.
    pub news_loading: bool,
    pub chatbot: ChatbotPresenter,
    pub theme_store: ThemeStore,
    pub theme: TuiTheme,
    pub api_service: Arc<ApiService>,
    pub config: AppConfig,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new() -> Self {
        let config = AppConfig::load();
        let theme_store = match ThemeStore::load_or_create() {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Failed to load theme preference: {e}");
                ThemeStore::new()
            }
        };
        Self::with_parts(config, theme_store)
    }

    /// Build an `App` without touching the config directory (used by tests).
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_parts(config, ThemeStore::new())
    }

    fn with_parts(config: AppConfig, theme_store: ThemeStore) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let api_service = Arc::new(ApiService::new(config.network.clone()));

        let theme = Self::palette_for(&config, theme_store.preference());
        tracing::info!(theme = %theme_store.preference(), "Applied startup theme preference");

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            input: String::new(),
            input_mode: InputMode::Normal,
            result: None,
            articles: Vec::new(),
            article_list_state: ListState::default(),
            loading: false,
            news_loading: false,
            chatbot: ChatbotPresenter::new(),
            theme_store,
            theme,
            api_service,
            config,
            action_tx,
            action_rx,
        }
    }

    fn palette_for(config: &AppConfig, preference: ThemePreference) -> TuiTheme {
        if let Some(path) = &config.theme_file {
            match theme_loader::load_theme(Path::new(path), preference) {
                Ok(theme) => return theme,
                Err(e) => tracing::error!("Failed to load theme file {path}: {e}"),
            }
        }
        TuiTheme::for_preference(preference)
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    // Check for terminal events
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Editing => self.handle_editing_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_editing_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let _ = self.action_tx.send(Action::Analyze);
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Quit);
            }
            KeyCode::Char('e') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Enter => {
                let _ = self.action_tx.send(Action::Analyze);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let _ = self.action_tx.send(Action::NavigateDown);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let _ = self.action_tx.send(Action::NavigateUp);
            }
            KeyCode::Char('o') => {
                let _ = self.action_tx.send(Action::OpenArticle);
            }
            KeyCode::Char('t') => {
                let _ = self.action_tx.send(Action::ToggleTheme);
            }
            KeyCode::Char('c') => {
                let _ = self.action_tx.send(Action::ToggleChatbot);
            }
            KeyCode::Char('T') => {
                let _ = self.action_tx.send(Action::OpenTherapistSearch);
            }
            _ => {}
        }
    }

    pub async fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Analyze => {
                let text = self.input.trim().to_string();
                if text.is_empty() {
                    // Nothing to analyze; not an error, no state change.
                    return;
                }
                if self.loading {
                    tracing::debug!("Analysis already in flight; submission rejected");
                    return;
                }

                self.loading = true;
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();

                tokio::spawn(async move {
                    match api.analyze(&text).await {
                        Ok(result) => {
                            let _ = tx.send(Action::AnalysisLoaded(result));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::AnalysisFailed(format!("{e:#}")));
                        }
                    }
                });
            }
            Action::AnalysisLoaded(result) => {
                let sentiment = result.sentiment;
                self.chatbot.observe(result.chatbot_reply.as_deref());
                self.result = Some(result);
                self.loading = false;
                // The news fetch is chained strictly after the result commit.
                let _ = self.action_tx.send(Action::FetchNews(sentiment));
            }
            Action::AnalysisFailed(msg) => {
                // Prior result stays; the failure goes to the log only.
                self.loading = false;
                tracing::error!("Analysis request failed: {msg}");
            }
            Action::FetchNews(sentiment) => {
                self.news_loading = true;
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();

                tokio::spawn(async move {
                    match api.fetch_news(sentiment).await {
                        Ok(articles) => {
                            let _ = tx.send(Action::ArticlesLoaded(articles));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::NewsFailed(format!("{e:#}")));
                        }
                    }
                });
            }
            Action::ArticlesLoaded(articles) => {
                // Concurrent fetches race; the last response to land wins.
                self.articles = articles;
                self.news_loading = false;
                match self.article_list_state.selected() {
                    _ if self.articles.is_empty() => self.article_list_state.select(None),
                    None => self.article_list_state.select(Some(0)),
                    Some(i) if i >= self.articles.len() => {
                        self.article_list_state.select(Some(self.articles.len() - 1));
                    }
                    Some(_) => {}
                }
            }
            Action::NewsFailed(msg) => {
                // Keep the most recent successful list on screen.
                self.news_loading = false;
                tracing::error!("News request failed: {msg}");
            }
            Action::NavigateUp => self.select_prev(),
            Action::NavigateDown => self.select_next(),
            Action::OpenArticle => {
                if let Some(index) = self.article_list_state.selected()
                    && let Some(article) = self.articles.get(index)
                    && !article.url.is_empty()
                {
                    let _ = open::that(&article.url);
                }
            }
            Action::OpenTherapistSearch => {
                let _ = open::that(THERAPIST_SEARCH_URL);
            }
            Action::ToggleTheme => {
                let next = self.theme_store.preference().toggled();
                // Apply to the rendering surface first, then persist; one
                // toggle, both effects.
                self.theme = Self::palette_for(&self.config, next);
                if let Err(e) = self.theme_store.set(next) {
                    tracing::error!("Failed to persist theme preference: {e}");
                }
            }
            Action::ToggleChatbot => self.chatbot.toggle(),
        }
    }

    fn select_next(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.article_list_state.selected() {
            Some(i) => {
                if i >= self.articles.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.article_list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.article_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.articles.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.article_list_state.select(Some(i));
    }

    pub fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_top_bar(f, chunks[0]);
        self.render_input(f, chunks[1]);
        self.render_result(f, chunks[2]);
        self.render_content(f, chunks[3]);
        self.render_support(f, chunks[4]);
        self.render_status_bar(f, chunks[5]);

        self.render_chatbot_popup(f);
    }

    fn render_top_bar(&self, f: &mut Frame, area: Rect) {
        let top_bar_text = format!("Theme: {}", self.theme_store.preference());

        let p = Paragraph::new(top_bar_text)
            .alignment(Alignment::Right)
            .style(
                Style::default()
                    .bg(self.theme.background)
                    .fg(self.theme.muted),
            );
        f.render_widget(p, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let (text, style) = match self.input_mode {
            InputMode::Editing => (
                format!("{}█", self.input),
                Style::default().fg(self.theme.foreground),
            ),
            InputMode::Normal if self.input.is_empty() => (
                "Enter your thoughts here...".to_string(),
                Style::default().fg(self.theme.muted),
            ),
            InputMode::Normal => (
                self.input.clone(),
                Style::default().fg(self.theme.foreground),
            ),
        };

        let title = format!("Mental Health Signals v{}", self.app_version);
        let p = Paragraph::new(text)
            .style(style.bg(self.theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if self.input_mode == InputMode::Editing {
                        self.theme.accent
                    } else {
                        self.theme.border
                    }))
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }

    fn render_result(&self, f: &mut Frame, area: Rect) {
        let Some(result) = &self.result else {
            let p = Paragraph::new("No analysis yet. Press e to enter your thoughts.")
                .style(
                    Style::default()
                        .fg(self.theme.muted)
                        .bg(self.theme.background),
                )
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(self.theme.border)),
                );
            f.render_widget(p, area);
            return;
        };

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let sentiment_color = match result.sentiment {
            Sentiment::Positive => self.theme.positive,
            Sentiment::Negative => self.theme.negative,
            Sentiment::Neutral => self.theme.neutral,
        };

        let sentiment = Paragraph::new(Line::from(Span::styled(
            result.sentiment.to_string(),
            Style::default()
                .fg(sentiment_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .style(Style::default().bg(self.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .title("Sentiment")
                .title_style(Style::default().fg(self.theme.foreground)),
        );
        f.render_widget(sentiment, cards[0]);

        let confidence = Paragraph::new(Line::from(vec![
            Span::styled(
                format_confidence(result.confidence),
                Style::default()
                    .fg(self.theme.positive)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" at {}", format_received_at(&result.received_at)),
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(self.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .title("Confidence")
                .title_style(Style::default().fg(self.theme.foreground)),
        );
        f.render_widget(confidence, cards[1]);
    }

    fn render_content(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.render_articles(f, columns[0]);
        self.render_songs(f, columns[1]);
    }

    fn render_articles(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = if self.news_loading && self.articles.is_empty() {
            vec![ListItem::new(Span::styled(
                "Loading articles...",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            self.articles
                .iter()
                .map(|article| {
                    let content = Line::from(vec![
                        Span::styled(
                            article.title.clone(),
                            Style::default().fg(self.theme.accent),
                        ),
                        Span::styled(
                            format!(" ({})", article.source_name),
                            Style::default().fg(self.theme.muted),
                        ),
                    ]);
                    ListItem::new(content)
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border))
                    .title("Latest News Articles")
                    .title_style(Style::default().fg(self.theme.foreground)),
            )
            .style(Style::default().bg(self.theme.background))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.article_list_state);
    }

    fn render_songs(&self, f: &mut Frame, area: Rect) {
        let songs: &[String] = self
            .result
            .as_ref()
            .map(|r| r.recommended_songs.as_slice())
            .unwrap_or_default();

        let items: Vec<ListItem> = songs
            .iter()
            .map(|song| {
                ListItem::new(Span::styled(
                    format!("♪ {song}"),
                    Style::default().fg(self.theme.foreground),
                ))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border))
                    .title("Recommended Songs")
                    .title_style(Style::default().fg(self.theme.foreground)),
            )
            .style(Style::default().bg(self.theme.background));
        f.render_widget(list, area);
    }

    fn render_support(&self, f: &mut Frame, area: Rect) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);

        let helpline = Paragraph::new(vec![
            Line::from(Span::styled(
                "1-800-273-8255",
                Style::default()
                    .fg(self.theme.negative)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Reach out if you're feeling overwhelmed.",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().bg(self.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .title("24/7 Helpline")
                .title_style(Style::default().fg(self.theme.foreground)),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(helpline, cards[0]);

        let tip = match self.result.as_ref().map(|r| r.sentiment) {
            Some(Sentiment::Negative) => "Practice mindfulness and deep breathing.",
            _ => "Keep a gratitude journal for positive thoughts.",
        };
        let wellness = Paragraph::new(Span::styled(tip, Style::default().fg(self.theme.foreground)))
            .alignment(Alignment::Center)
            .style(Style::default().bg(self.theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border))
                    .title("Wellness Resources")
                    .title_style(Style::default().fg(self.theme.foreground)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(wellness, cards[1]);

        let therapist = Paragraph::new(vec![
            Line::from(Span::styled(
                "Connect with licensed therapists near you.",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                "Press T to search.",
                Style::default().fg(self.theme.accent),
            )),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().bg(self.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .title("Find a Therapist")
                .title_style(Style::default().fg(self.theme.foreground)),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(therapist, cards[2]);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = if self.loading {
            "Analyzing...".to_string()
        } else if self.news_loading {
            "Fetching articles...".to_string()
        } else {
            match self.input_mode {
                InputMode::Editing => {
                    "Editing: type your thoughts | Enter: Analyze | Esc: Done".to_string()
                }
                InputMode::Normal => {
                    "e: Edit | Enter: Analyze | j/k: Articles | o: Open | c: Chatbot | T: Therapist | t: Theme | q: Quit"
                        .to_string()
                }
            }
        };

        let p = Paragraph::new(status).style(
            Style::default()
                .bg(self.theme.selection_bg)
                .fg(self.theme.selection_fg),
        );
        f.render_widget(p, area);
    }

    fn render_chatbot_popup(&self, f: &mut Frame) {
        let Some(message) = self.chatbot.visible_message() else {
            return;
        };

        let area = f.area();
        let popup_width = area.width.saturating_sub(4).min(44);
        let inner_width = popup_width.saturating_sub(2).max(1);
        let lines = textwrap::wrap(message, inner_width as usize);
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));

        let popup_x = area.width.saturating_sub(popup_width + 2);
        let popup_y = area.height.saturating_sub(popup_height + 2);
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        let text: Vec<Line> = lines
            .iter()
            .map(|line| Line::from(line.to_string()))
            .collect();

        let popup = Paragraph::new(text)
            .style(
                Style::default()
                    .fg(self.theme.foreground)
                    .bg(self.theme.background),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent))
                    .title("Chatbot Suggestion (c to dismiss)")
                    .title_style(
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
            );

        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
