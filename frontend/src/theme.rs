use crate::storage::{read_json, KeyValueStore, THEME_JSON_KEY, THEME_MODE_KEY};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement};
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(()),
        }
    }
}

pub fn stored_mode<S: KeyValueStore + ?Sized>(store: &S) -> ThemeMode {
    store
        .get_item(THEME_MODE_KEY)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

pub fn store_mode<S: KeyValueStore + ?Sized>(store: &S, mode: ThemeMode) {
    if let Err(e) = store.set_item(THEME_MODE_KEY, mode.as_str()) {
        log::warn!("Could not persist theme mode: {}", e);
    }
}

/// CSS custom properties for `mode`, in the order they are applied: the
/// stored theme document's raw variables, its colors for `mode` (or the
/// built-in palette), then its typography and layout settings.
pub fn theme_variables<S: KeyValueStore + ?Sized>(store: &S, mode: ThemeMode) -> Vec<(String, String)> {
    let theme: Option<Value> = read_json(store, THEME_JSON_KEY);
    let mut vars = Vec::new();
    if let Some(theme) = &theme {
        vars.extend(raw_variables(theme));
    }
    vars.extend(
        theme
            .as_ref()
            .and_then(|t| computed_colors(t, mode))
            .unwrap_or_else(|| fallback_palette(mode)),
    );
    if let Some(theme) = &theme {
        vars.extend(typography_variables(theme));
        vars.extend(layout_variables(theme));
    }
    vars
}

/// Strings, numbers and booleans become CSS values; anything else is skipped.
fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn object_entries<'a>(value: Option<&'a Value>) -> impl Iterator<Item = (&'a String, &'a Value)> {
    value.and_then(Value::as_object).into_iter().flatten()
}

fn raw_variables(theme: &Value) -> Vec<(String, String)> {
    let vars = theme.get("actualCSSVariables");
    ["layout", "borders", "typography", "colors", "animations", "easing"]
        .iter()
        .flat_map(|group| object_entries(vars.and_then(|v| v.get(*group))))
        .filter_map(|(name, value)| css_value(value).map(|v| (name.clone(), v)))
        .collect()
}

fn computed_colors(theme: &Value, mode: ThemeMode) -> Option<Vec<(String, String)>> {
    let colors = theme.get("actualComputedColors")?.get(mode.as_str())?;
    let lookups = [
        ("--color-background", "/background/hex"),
        ("--color-text", "/text/hex"),
        ("--color-accent", "/accent/hex"),
        ("--color-surface", "/surface/header"),
        ("--color-border", "/border/subtle"),
    ];
    Some(pointer_variables(colors, &lookups))
}

fn typography_variables(theme: &Value) -> Vec<(String, String)> {
    let typography = theme.get("typographySystem");
    let styles = object_entries(typography.and_then(|t| t.get("textStyles")))
        .filter_map(|(name, value)| css_value(value).map(|v| (format!("--{name}"), v)));
    let spacing = object_entries(typography.and_then(|t| t.get("letterSpacing")))
        .filter_map(|(name, value)| css_value(value).map(|v| (format!("--ls-{name}"), v)));
    styles.chain(spacing).collect()
}

fn layout_variables(theme: &Value) -> Vec<(String, String)> {
    let Some(layout) = theme.get("layoutSystem") else {
        return Vec::new();
    };
    let lookups = [
        ("--page-max-width", "/maxWidths/page"),
        ("--prose-max-width", "/maxWidths/prose"),
        ("--header-height", "/spacing/headerHeight"),
        ("--page-padding-inline", "/spacing/pageInline"),
        ("--page-padding-block", "/spacing/pageBlock"),
    ];
    pointer_variables(layout, &lookups)
}

fn pointer_variables(source: &Value, lookups: &[(&str, &str)]) -> Vec<(String, String)> {
    lookups
        .iter()
        .filter_map(|(name, pointer)| {
            source
                .pointer(pointer)
                .and_then(css_value)
                .map(|v| (name.to_string(), v))
        })
        .collect()
}

fn fallback_palette(mode: ThemeMode) -> Vec<(String, String)> {
    let colors = match mode {
        ThemeMode::Light => [
            ("--color-background", "#F7F8F8"),
            ("--color-text", "#08090A"),
            ("--color-border", "rgba(0,0,0,0.08)"),
            ("--color-surface", "rgba(255,255,255,0.8)"),
        ],
        ThemeMode::Dark => [
            ("--color-background", "#08090A"),
            ("--color-text", "#F7F8F8"),
            ("--color-border", "rgba(255,255,255,0.08)"),
            ("--color-surface", "rgba(10,10,10,0.8)"),
        ],
    };
    colors.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Sets `data-theme` and the theme variables on `<html>`.
pub fn apply_theme<S: KeyValueStore + ?Sized>(store: &S, mode: ThemeMode) {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if root.set_attribute("data-theme", mode.as_str()).is_err() {
        log::warn!("Could not set data-theme");
    }
    if let Ok(element) = root.dyn_into::<HtmlElement>() {
        let style = element.style();
        for (name, value) in theme_variables(store, mode) {
            if let Err(e) = style.set_property(&name, &value) {
                log::warn!("Could not set {} to {}: {:?}", name, value, e);
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    pub mode: ThemeMode,
    pub on_toggle: Callback<ThemeMode>,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    let onclick = {
        let next = props.mode.toggled();
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(next))
    };
    let label = match props.mode {
        ThemeMode::Light => "🌙 Dark",
        ThemeMode::Dark => "☀️ Light",
    };
    html! {
        <button type="button" class="btn btn-sm btn-outline-secondary" {onclick}>{ label }</button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_unknown_mode_falls_back_to_light() {
        let store = MemoryStorage::default();
        assert_eq!(stored_mode(&store), ThemeMode::Light);
        store.set_item(THEME_MODE_KEY, "sepia").unwrap();
        assert_eq!(stored_mode(&store), ThemeMode::Light);
        store_mode(&store, ThemeMode::Dark);
        assert_eq!(stored_mode(&store), ThemeMode::Dark);
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_stored_theme_colors_win() {
        let store = MemoryStorage::default();
        store
            .set_item(
                THEME_JSON_KEY,
                r##"{"actualComputedColors":{"dark":{"background":{"hex":"#000000"},"accent":{"hex":"#5E6AD2"}}}}"##,
            )
            .unwrap();
        assert_eq!(
            theme_variables(&store, ThemeMode::Dark),
            vars(&[("--color-background", "#000000"), ("--color-accent", "#5E6AD2")])
        );
        assert_eq!(theme_variables(&store, ThemeMode::Light), fallback_palette(ThemeMode::Light));
    }

    #[test]
    fn test_typography_and_layout_are_applied() {
        let store = MemoryStorage::default();
        store
            .set_item(
                THEME_JSON_KEY,
                r#"{
                    "actualCSSVariables": {"borders": {"--radius": "8px"}, "layout": {"--gap": 4, "--skip": {"x": 1}}},
                    "typographySystem": {"textStyles": {"title-size": "2rem"}, "letterSpacing": {"tight": "-0.02em"}},
                    "layoutSystem": {"maxWidths": {"page": "1200px"}, "spacing": {"headerHeight": "64px"}}
                }"#,
            )
            .unwrap();
        let mut expected = vars(&[("--gap", "4"), ("--radius", "8px")]);
        expected.extend(fallback_palette(ThemeMode::Light));
        expected.extend(vars(&[
            ("--title-size", "2rem"),
            ("--ls-tight", "-0.02em"),
            ("--page-max-width", "1200px"),
            ("--header-height", "64px"),
        ]));
        assert_eq!(theme_variables(&store, ThemeMode::Light), expected);
    }

    #[test]
    fn test_corrupt_theme_json_is_dropped() {
        let store = MemoryStorage::default();
        store.set_item(THEME_JSON_KEY, "{oops").unwrap();
        assert_eq!(theme_variables(&store, ThemeMode::Dark), fallback_palette(ThemeMode::Dark));
        assert_eq!(store.get_item(THEME_JSON_KEY), None);
    }
}
