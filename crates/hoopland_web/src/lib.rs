use hoopland_core::core_api::{CoreError, CoreErrorCode, Engine, Session};
use hoopland_core::query::PlayerFilters;
use hoopland_render::{
    JsonStyle, TextRenderOptions, render_json_overview, render_overview_text,
    render_players_json,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebRenderOptions {
    pub league_index: Option<usize>,
    pub json_output: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebSearchOptions {
    pub league_index: Option<usize>,
    pub query: String,
    pub filters: PlayerFilters,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        let code = match err.code {
            CoreErrorCode::Parse | CoreErrorCode::Io => "parse_failed",
            CoreErrorCode::UnsupportedShape | CoreErrorCode::EmptyLeagueList => {
                "unsupported_file"
            }
            CoreErrorCode::InvalidLeagueIndex => "invalid_league",
            _ => "invalid_options",
        };
        Self::new(code, err.message)
    }
}

#[wasm_bindgen]
pub fn render_save_text(save_bytes: &[u8], options: JsValue) -> Result<String, JsValue> {
    let parsed_options: WebRenderOptions =
        parse_options(options).map_err(|err| err.to_js_value())?;
    render_save_text_impl(save_bytes, &parsed_options).map_err(|err| err.to_js_value())
}

#[wasm_bindgen]
pub fn search_save_players(save_bytes: &[u8], options: JsValue) -> Result<String, JsValue> {
    let parsed_options: WebSearchOptions =
        parse_options(options).map_err(|err| err.to_js_value())?;
    search_save_players_impl(save_bytes, &parsed_options).map_err(|err| err.to_js_value())
}

fn open_session(save_bytes: &[u8], league_index: Option<usize>) -> Result<Session, WebError> {
    if save_bytes.is_empty() {
        return Err(WebError::new(
            "unsupported_file",
            "The uploaded file is empty. Please provide a Hoopland .json save.",
        ));
    }

    let mut session = Engine::new().open_bytes(save_bytes)?;
    if let Some(index) = league_index {
        session.switch_league(index)?;
    }
    Ok(session)
}

fn render_save_text_impl(
    save_bytes: &[u8],
    options: &WebRenderOptions,
) -> Result<String, WebError> {
    let session = open_session(save_bytes, options.league_index)?;

    if options.json_output {
        let value = render_json_overview(&session, JsonStyle::CanonicalV1);
        return to_pretty_json(&value);
    }

    Ok(render_overview_text(
        &session,
        TextRenderOptions {
            verbose: options.verbose,
        },
    ))
}

fn search_save_players_impl(
    save_bytes: &[u8],
    options: &WebSearchOptions,
) -> Result<String, WebError> {
    let session = open_session(save_bytes, options.league_index)?;
    let players = session.search_players(&options.query, &options.filters);
    to_pretty_json(&render_players_json(&players, session.skill_catalog()))
}

fn to_pretty_json(value: &serde_json::Value) -> Result<String, WebError> {
    serde_json::to_string_pretty(value).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to serialize rendered JSON output: {err}"),
        )
    })
}

fn parse_options<T>(options: JsValue) -> Result<T, WebError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if options.is_null() || options.is_undefined() {
        return Ok(T::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web options: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use hoopland_core::query::PlayerFilters;

    use super::{
        WebRenderOptions, WebSearchOptions, render_save_text_impl, search_save_players_impl,
    };

    #[test]
    fn render_save_text_impl_renders_desktop_fixture() {
        let bytes = fixture_bytes("tests/fixtures/desktop_save.json");
        let rendered = render_save_text_impl(&bytes, &WebRenderOptions::default())
            .expect("desktop fixture should render");
        assert!(rendered.starts_with("Hoopland League (NBA)"));
        assert!(rendered.contains(" ::: Teams :::"));
    }

    #[test]
    fn render_save_text_impl_switches_mobile_league() {
        let bytes = fixture_bytes("tests/fixtures/mobile_save.json");
        let options = WebRenderOptions {
            league_index: Some(1),
            ..WebRenderOptions::default()
        };
        let rendered = render_save_text_impl(&bytes, &options).expect("league 1 should render");
        assert!(rendered.starts_with("College League (COLLEGE)"));
        assert!(rendered.contains(" * 1  College League (COLLEGE)"));
    }

    #[test]
    fn render_save_text_impl_reports_bad_league() {
        let bytes = fixture_bytes("tests/fixtures/mobile_save.json");
        let options = WebRenderOptions {
            league_index: Some(9),
            ..WebRenderOptions::default()
        };
        let err = render_save_text_impl(&bytes, &options).expect_err("league 9 should fail");
        assert_eq!(err.code, "invalid_league");
    }

    #[test]
    fn render_save_text_impl_rejects_empty_and_malformed_payloads() {
        let err = render_save_text_impl(&[], &WebRenderOptions::default())
            .expect_err("empty payload should fail");
        assert_eq!(err.code, "unsupported_file");

        let err = render_save_text_impl(b"{\"teams\": [", &WebRenderOptions::default())
            .expect_err("truncated payload should fail");
        assert_eq!(err.code, "parse_failed");
    }

    #[test]
    fn render_save_text_impl_can_emit_json() {
        let bytes = fixture_bytes("tests/fixtures/desktop_save.json");
        let options = WebRenderOptions {
            json_output: true,
            ..WebRenderOptions::default()
        };
        let rendered = render_save_text_impl(&bytes, &options).expect("json output should render");

        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("json output should parse");
        assert_eq!(parsed["format"], "desktop");
        assert_eq!(parsed["league_name"], "Hoopland League");
        assert!(parsed.get("teams").is_some());
    }

    #[test]
    fn search_save_players_impl_applies_query_and_filters() {
        let bytes = fixture_bytes("tests/fixtures/desktop_save.json");
        let options = WebSearchOptions {
            query: "power".to_string(),
            filters: PlayerFilters {
                min_rating: Some(70.0),
                ..PlayerFilters::default()
            },
            ..WebSearchOptions::default()
        };
        let rendered = search_save_players_impl(&bytes, &options).expect("search should render");

        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("json output should parse");
        let ids: Vec<i64> = parsed
            .as_array()
            .expect("players array")
            .iter()
            .filter_map(|p| p["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![20]);
    }

    fn fixture_bytes(relative_path: &str) -> Vec<u8> {
        let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(relative_path);
        fs::read(full_path).expect("fixture bytes should be readable")
    }
}
