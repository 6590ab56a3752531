mod categories;
mod config;
mod dialogs;
mod env_variable_utils;
mod error;
mod gateway;
mod logging;
mod models;
mod router;
mod saved;
mod scripts;
mod search;
mod services;
mod storage;
mod theme;
mod utils;

use crate::config::PersistenceMode;
use crate::env_variable_utils::{get_api_base_url, get_app_name, is_debug_mode, APP_CONFIG};
use crate::router::{switch, NavBar, Route};
use crate::services::AppServices;
use crate::storage::migration::{migrate_local_data, MigrationOutcome};
use crate::theme::{apply_theme, stored_mode};
use chrono::Utc;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub services: AppServices,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let render = {
        let services = props.services.clone();
        Callback::from(move |route: Route| switch(route, &services))
    };

    html! {
        <BrowserRouter>
            <NavBar services={props.services.clone()} />
            <Switch<Route> {render} />
        </BrowserRouter>
    }
}

/// Pushes anything saved on this device to the backend the first time the
/// app runs in remote mode.
fn spawn_migration(services: &AppServices) {
    let services = services.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = migrate_local_data(
            &services.storage,
            &*services.snapshots,
            &*services.categories,
            Utc::now(),
        )
        .await;
        match outcome {
            Ok(MigrationOutcome::AlreadyDone) => log::debug!("Local data already migrated"),
            Ok(MigrationOutcome::Completed(report)) => log::info!(
                "Migrated local data: preferences={}, history entries={}, categories={:?}",
                report.preferences,
                report.history_entries,
                report.categories
            ),
            Err(e) => log::warn!("Local data migration failed, will retry next start: {}", e),
        }
    });
}

fn main() {
    logging::init(is_debug_mode());

    let services = AppServices::from_config(&APP_CONFIG);
    apply_theme(&services.storage, stored_mode(&services.storage));
    if APP_CONFIG.persistence == PersistenceMode::Remote {
        spawn_migration(&services);
    }

    log::info!(
        "NAME: \"{}\", API: \"{}\" DEBUG: \"{}\"",
        get_app_name(),
        get_api_base_url(),
        is_debug_mode()
    );

    yew::Renderer::<App>::with_props(AppProps { services }).render();
}
