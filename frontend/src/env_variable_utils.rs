use crate::config::AppConfig;
use lazy_static::lazy_static;
use web_sys::window;

lazy_static! {
    pub static ref APP_CONFIG: AppConfig = AppConfig::from_lookup(get_env_var);
}

/// Reads a value from the `window.ENV_CONFIG` object injected by `index.html`.
pub fn get_env_var(key: &str) -> Option<String> {
    let window = window()?;

    let env_config = js_sys::Reflect::get(&window, &"ENV_CONFIG".into()).ok()?;

    if env_config.is_undefined() {
        log::warn!("ENV_CONFIG is undefined - environment variables not loaded");
        return None;
    }

    let value = js_sys::Reflect::get(&env_config, &key.into()).ok()?;

    if !value.is_undefined() {
        value.as_string()
    } else {
        log::debug!("Environment variable '{}' is undefined", key);
        None
    }
}

pub fn get_api_base_url() -> &'static str {
    &APP_CONFIG.backend_url
}

pub fn get_app_name() -> &'static str {
    &APP_CONFIG.app_name
}

pub fn is_debug_mode() -> bool {
    APP_CONFIG.debug_mode
}
