use arkiva_core::DocumentStatus;
use arkiva_tui::config::{AuthConfig, ConfigError, SummaryConfig, TuiConfig};
use arkiva_tui::keys::{map_key, Action};
use arkiva_tui::theme::{document_status_color, SynthBruteTheme};
use arkiva_tui::widgets::{collapsed_text, COLLAPSED_CHARS};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8000".to_string(),
        request_timeout_ms: 30_000,
        error_log_path: "tmp/arkiva-tui.log".into(),
        documents: vec![1, 2, 3],
        auth: AuthConfig {
            bearer_token: Some("token".to_string()),
        },
        summary: SummaryConfig::default(),
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

#[test]
fn config_requires_base_url() {
    let mut config = base_config();
    config.api_base_url = "   ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "api_base_url",
            ..
        })
    ));
}

#[test]
fn config_rejects_blank_token() {
    let mut config = base_config();
    config.auth.bearer_token = Some(String::new());
    assert!(config.validate().is_err());
}

#[test]
fn config_allows_missing_token() {
    let mut config = base_config();
    config.auth = AuthConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn navigation_keys_consistent() {
    assert_eq!(map_key(key(KeyCode::Char('j'))), Some(Action::MoveDown));
    assert_eq!(map_key(key(KeyCode::Down)), Some(Action::MoveDown));
    assert_eq!(map_key(key(KeyCode::Char('k'))), Some(Action::MoveUp));
    assert_eq!(map_key(key(KeyCode::Up)), Some(Action::MoveUp));
    assert_eq!(map_key(key(KeyCode::Enter)), Some(Action::Open));
    assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Close));
    assert_eq!(map_key(key(KeyCode::Char('x'))), Some(Action::ToggleExpand));
}

#[test]
fn ctrl_c_quits() {
    let event = KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..key(KeyCode::Char('c'))
    };
    assert_eq!(map_key(event), Some(Action::Quit));
}

#[test]
fn status_colors_distinct() {
    let theme = SynthBruteTheme::synthbrute();
    assert_eq!(
        document_status_color(DocumentStatus::Active, &theme),
        theme.success
    );
    assert_ne!(
        document_status_color(DocumentStatus::Active, &theme),
        document_status_color(DocumentStatus::Archived, &theme)
    );
}

proptest! {
    #[test]
    fn summary_timing_validation(
        ttl in 1u64..10_000_000,
        max in prop::option::of(1u32..100),
        placeholder in 1u64..1_000,
        reveal in 1u64..1_000,
        step in 1usize..16
    ) {
        let mut config = base_config();
        config.summary = SummaryConfig {
            cache_ttl_ms: ttl,
            max_generations: max,
            placeholder_interval_ms: placeholder,
            reveal_interval_ms: reveal,
            reveal_step: step,
        };
        prop_assert!(config.validate().is_ok());
        prop_assert_eq!(config.summary.policy().max_generations, max);
    }

    #[test]
    fn zero_summary_values_rejected(which in 0usize..5) {
        let mut summary = SummaryConfig::default();
        match which {
            0 => summary.cache_ttl_ms = 0,
            1 => summary.max_generations = Some(0),
            2 => summary.placeholder_interval_ms = 0,
            3 => summary.reveal_interval_ms = 0,
            _ => summary.reveal_step = 0,
        }
        let mut config = base_config();
        config.summary = summary;
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn unmapped_letters_do_nothing(c in "[abcdefgimnopstuvwyz]") {
        let ch = c.chars().next().unwrap();
        prop_assert!(map_key(key(KeyCode::Char(ch))).is_none());
    }

    #[test]
    fn collapsed_text_is_a_prefix(text in "[a-zë ]{0,600}", expanded in any::<bool>()) {
        let shown = collapsed_text(&text, expanded);
        if expanded || text.chars().count() <= COLLAPSED_CHARS {
            prop_assert_eq!(shown.as_ref(), text.as_str());
        } else {
            let body = shown.trim_end_matches('…');
            prop_assert!(text.starts_with(body));
            prop_assert!(body.chars().count() <= COLLAPSED_CHARS);
        }
    }
}
