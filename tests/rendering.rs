use jiff::Zoned;
use ratatui::{Terminal, backend::TestBackend};
use tui_mood_app::app::App;
use tui_mood_app::config::AppConfig;
use tui_mood_app::internal::models::{AnalysisResult, Article, Sentiment};

fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
        }
        out.push('\n');
    }
    out
}

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        sentiment: Sentiment::Positive,
        confidence: 0.87,
        recommended_songs: vec!["Here Comes the Sun".to_string()],
        chatbot_reply: Some("try journaling".to_string()),
        received_at: Zoned::now(),
    }
}

#[test]
fn test_initial_screen_renders_placeholders() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut app = App::with_config(AppConfig::default());

    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());

    assert!(rendered.contains("Mental Health Signals"));
    assert!(rendered.contains("Enter your thoughts here..."));
    assert!(rendered.contains("No analysis yet."));
    assert!(rendered.contains("Latest News Articles"));
    assert!(rendered.contains("24/7 Helpline"));
    assert!(rendered.contains("1-800-273-8255"));
    assert!(rendered.contains("Theme: light"));
}

#[test]
fn test_result_screen_renders_cards_and_lists() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut app = App::with_config(AppConfig::default());

    let result = sample_result();
    app.chatbot.observe(result.chatbot_reply.as_deref());
    app.result = Some(result);
    app.articles = vec![Article {
        title: "Gratitude works".to_string(),
        source_name: "Example".to_string(),
        url: "https://example.com".to_string(),
    }];

    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());

    assert!(rendered.contains("Sentiment"));
    assert!(rendered.contains("Positive"));
    assert!(rendered.contains("87.00%"));
    assert!(rendered.contains("Gratitude works"));
    assert!(rendered.contains("(Example)"));
    assert!(rendered.contains("Recommended Songs"));
    assert!(rendered.contains("♪ Here Comes the Sun"));
    assert!(rendered.contains("Chatbot Suggestion"));
    assert!(rendered.contains("try journaling"));
}

#[test]
fn test_dismissed_chatbot_popup_is_not_rendered() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut app = App::with_config(AppConfig::default());

    let result = sample_result();
    app.chatbot.observe(result.chatbot_reply.as_deref());
    app.result = Some(result);

    app.chatbot.toggle();
    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());

    assert!(!rendered.contains("try journaling"));
    assert!(!rendered.contains("Chatbot Suggestion"));
}

#[test]
fn test_empty_reply_renders_no_popup() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut app = App::with_config(AppConfig::default());

    let mut result = sample_result();
    result.chatbot_reply = None;
    app.chatbot.observe(result.chatbot_reply.as_deref());
    app.result = Some(result);

    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());

    assert!(!rendered.contains("Chatbot Suggestion"));
}

#[test]
fn test_wellness_tip_follows_sentiment() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut app = App::with_config(AppConfig::default());

    let mut result = sample_result();
    result.sentiment = Sentiment::Negative;
    result.chatbot_reply = None;
    app.result = Some(result);

    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());
    assert!(rendered.contains("Practice mindfulness"));

    let mut result = sample_result();
    result.chatbot_reply = None;
    app.chatbot.observe(None);
    app.result = Some(result);

    terminal.draw(|f| app.ui(f)).unwrap();
    let rendered = buffer_text(terminal.backend().buffer());
    assert!(rendered.contains("gratitude journal"));
}
