use crate::categories::components::CategoriesPage;
use crate::categories::manager::CategoryManager;
use crate::dialogs::BrowserDialog;
use crate::env_variable_utils::{get_app_name, APP_CONFIG};
use crate::models::{Category, SaveVideoRequest, SearchResultItem};
use crate::saved::api::save_video;
use crate::saved::components::SavedVideosPage;
use crate::scripts::components::ScriptExtractorPage;
use crate::search::api::execute_search;
use crate::search::channel_picker::ChannelPicker;
use crate::search::components::{HistoryPanel, PageStatus, ResultsView, SearchFormPanel, StatusBanner};
use crate::search::form::SearchForm;
use crate::search::history::{HistoryAction, HistoryManager, SearchHistory};
use crate::search::results::ResultSetController;
use crate::search::search_options::{FilterCriteria, SortKey};
use crate::search::selection::ChannelSelection;
use crate::search::session::{apply_response, SearchDisposition, SearchSequencer};
use crate::services::AppServices;
use crate::storage::preferences::PreferenceStore;
use crate::theme::{apply_theme, store_mode, stored_mode, ThemeMode, ThemeToggle};
use chrono::Utc;
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/channels")]
    Channels,
    #[at("/saved")]
    Saved,
    #[at("/scripts")]
    Scripts,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(route: Route, services: &AppServices) -> Html {
    match route {
        Route::Home => html! { <SearchApp services={services.clone()} /> },
        Route::Channels => html! { <CategoriesPage services={services.clone()} /> },
        Route::Saved => html! { <SavedVideosPage /> },
        Route::Scripts => html! { <ScriptExtractorPage /> },
        Route::NotFound => html! {
            <div class="container py-5 text-center">
                <h1 class="h3 mb-3">{"404 - Page Not Found"}</h1>
                <Link<Route> to={Route::Home}>{"Go back to search"}</Link<Route>>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
    pub services: AppServices,
}

#[function_component(NavBar)]
pub fn nav_bar(props: &NavBarProps) -> Html {
    let mode = use_state(|| stored_mode(&props.services.storage));

    let on_toggle = {
        let mode = mode.clone();
        let storage = props.services.storage.clone();
        Callback::from(move |next: ThemeMode| {
            store_mode(&storage, next);
            apply_theme(&storage, next);
            mode.set(next);
        })
    };

    html! {
        <nav class="navbar navbar-expand border-bottom mb-3">
            <div class="container">
                <Link<Route> to={Route::Home} classes="navbar-brand">{ get_app_name() }</Link<Route>>
                <div class="navbar-nav me-auto">
                    <Link<Route> to={Route::Home} classes="nav-link">{ "Search" }</Link<Route>>
                    <Link<Route> to={Route::Channels} classes="nav-link">{ "Channels" }</Link<Route>>
                    <Link<Route> to={Route::Saved} classes="nav-link">{ "Saved" }</Link<Route>>
                    <Link<Route> to={Route::Scripts} classes="nav-link">{ "Scripts" }</Link<Route>>
                </div>
                <ThemeToggle mode={*mode} {on_toggle} />
            </div>
        </nav>
    }
}

/// Ids saved from the current result set; dispatch always sees the latest set.
#[derive(Default, PartialEq)]
struct SavedIds(HashSet<String>);

impl Reducible for SavedIds {
    type Action = String;

    fn reduce(self: Rc<Self>, id: String) -> Rc<Self> {
        let mut ids = self.0.clone();
        ids.insert(id);
        Rc::new(SavedIds(ids))
    }
}

#[derive(Properties, PartialEq)]
pub struct SearchAppProps {
    pub services: AppServices,
}

#[function_component(SearchApp)]
pub fn search_app(props: &SearchAppProps) -> Html {
    let prefs = use_state(|| PreferenceStore::new(props.services.snapshots.clone()));
    let history_store = use_state(|| HistoryManager::new(props.services.snapshots.clone()));
    let history = use_reducer(SearchHistory::default);
    let form = use_state(SearchForm::default);
    let selection = use_state(|| ChannelSelection::new(APP_CONFIG.max_selected_channels));
    let controller = use_state(|| ResultSetController::new(APP_CONFIG.page_size));
    let sequencer = use_state(SearchSequencer::default);
    let status = use_state(PageStatus::default);
    let reported_count = use_state(|| None::<usize>);
    let categories = use_state(Vec::<Category>::new);
    let saved_ids = use_reducer(SavedIds::default);

    // Restore saved settings, history and the category list once.
    {
        let prefs = prefs.clone();
        let history_store = history_store.clone();
        let history = history.dispatcher();
        let form = form.clone();
        let selection = selection.clone();
        let categories = categories.clone();
        let category_backend = props.services.categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let saved = prefs.load_form().await;
                selection.set(ChannelSelection::with_channels(
                    APP_CONFIG.max_selected_channels,
                    saved.channels.clone(),
                ));
                form.set(saved);

                match history_store.load().await {
                    Ok(loaded) => history.dispatch(HistoryAction::Loaded(loaded)),
                    Err(e) => log::warn!("Could not load search history: {}", e),
                }

                let mut manager = CategoryManager::new(category_backend);
                match manager.load().await {
                    Ok(()) => categories.set(manager.categories().to_vec()),
                    Err(e) => log::warn!("Could not load categories: {}", e),
                }
            });
            || ()
        });
    }

    let persist = {
        let prefs = prefs.clone();
        move |snapshot: SearchForm| {
            let prefs = (*prefs).clone();
            spawn_local(async move {
                if let Err(e) = prefs.save_form(&snapshot).await {
                    log::warn!("Could not save search settings: {}", e);
                }
            });
        }
    };

    let on_form_change = {
        let form = form.clone();
        Callback::from(move |next: SearchForm| form.set(next))
    };

    let on_selection_change = {
        let form = form.clone();
        let selection = selection.clone();
        let persist = persist.clone();
        Callback::from(move |next: ChannelSelection| {
            let mut snapshot = (*form).clone();
            snapshot.channels = next.channels().to_vec();
            persist(snapshot.clone());
            form.set(snapshot);
            selection.set(next);
        })
    };

    let on_warning = {
        let status = status.clone();
        Callback::from(move |message: String| status.set(PageStatus::Warning(message)))
    };

    let on_submit = {
        let controller = controller.clone();
        let sequencer = sequencer.clone();
        let status = status.clone();
        let reported_count = reported_count.clone();
        let selection = selection.clone();
        let history = history.clone();
        let history_store = history_store.clone();
        let persist = persist.clone();
        Callback::from(move |submitted: SearchForm| {
            let mut snapshot = submitted;
            snapshot.channels = selection.channels().to_vec();
            if let Err(e) = snapshot.validate(APP_CONFIG.min_views_floor) {
                status.set(PageStatus::Warning(e.to_string()));
                return;
            }

            persist(snapshot.clone());
            {
                let history = history.clone();
                let store = (*history_store).clone();
                let form = snapshot.clone();
                spawn_local(async move {
                    match store.record(&history, form, Utc::now()).await {
                        Ok(Some(entry)) => history.dispatch(HistoryAction::Recorded(entry)),
                        Ok(None) => {}
                        Err(e) => log::warn!("Could not record search history: {}", e),
                    }
                });
            }

            let ticket = sequencer.issue();
            status.set(PageStatus::Loading);
            let controller = controller.clone();
            let sequencer = (*sequencer).clone();
            let status = status.clone();
            let reported_count = reported_count.clone();
            spawn_local(async move {
                let response = execute_search(&snapshot).await;
                let mut next = (*controller).clone();
                match apply_response(&mut next, &sequencer, ticket, response) {
                    SearchDisposition::Loaded { count } => {
                        log::info!("Search returned {} Shorts", count);
                        controller.set(next);
                        reported_count.set(Some(count));
                        status.set(PageStatus::Idle);
                    }
                    SearchDisposition::Stale => {}
                    SearchDisposition::QuotaExceeded(message) => {
                        status.set(PageStatus::QuotaExceeded(message))
                    }
                    SearchDisposition::Failed(message) => {
                        log::error!("Search failed: {}", message);
                        status.set(PageStatus::Error(message))
                    }
                }
            });
        })
    };

    let on_reset = {
        let prefs = prefs.clone();
        let form = form.clone();
        let selection = selection.clone();
        Callback::from(move |_| {
            let prefs = (*prefs).clone();
            let form = form.clone();
            let selection = selection.clone();
            spawn_local(async move {
                match prefs.reset(&BrowserDialog).await {
                    Ok(Some(defaults)) => {
                        selection.set(ChannelSelection::new(APP_CONFIG.max_selected_channels));
                        form.set(defaults);
                    }
                    Ok(None) => {}
                    Err(e) => log::warn!("Could not reset search settings: {}", e),
                }
            });
        })
    };

    let on_sort = {
        let controller = controller.clone();
        Callback::from(move |key: SortKey| {
            let mut next = (*controller).clone();
            next.apply_sort(key);
            controller.set(next);
        })
    };

    let on_filter = {
        let controller = controller.clone();
        Callback::from(move |criteria: FilterCriteria| {
            let mut next = (*controller).clone();
            next.apply_filter(criteria);
            controller.set(next);
        })
    };

    let on_load_more = {
        let controller = controller.clone();
        Callback::from(move |_| {
            let mut next = (*controller).clone();
            if next.next_page() {
                controller.set(next);
            }
        })
    };

    let on_save = {
        let saved_ids = saved_ids.clone();
        let status = status.clone();
        Callback::from(move |item: SearchResultItem| {
            let saved_ids = saved_ids.clone();
            let status = status.clone();
            spawn_local(async move {
                match save_video(&SaveVideoRequest::from(&item)).await {
                    Ok(()) => saved_ids.dispatch(item.id.clone()),
                    Err(e) => status.set(PageStatus::Warning(format!("Could not save video: {e}"))),
                }
            });
        })
    };

    let on_replay = {
        let history = history.clone();
        let form = form.clone();
        let selection = selection.clone();
        Callback::from(move |index: usize| {
            if let Some(replayed) = history.replay(index) {
                selection.set(ChannelSelection::with_channels(
                    APP_CONFIG.max_selected_channels,
                    replayed.channels.clone(),
                ));
                form.set(replayed);
            }
        })
    };

    let on_clear_history = {
        let history = history.clone();
        let history_store = history_store.clone();
        Callback::from(move |_| {
            let history = history.clone();
            let store = (*history_store).clone();
            spawn_local(async move {
                match store.clear(&history, &BrowserDialog).await {
                    Ok(true) => history.dispatch(HistoryAction::Cleared),
                    Ok(false) => {}
                    Err(e) => log::warn!("Could not clear search history: {}", e),
                }
            });
        })
    };

    let loading = *status == PageStatus::Loading;

    html! {
        <div class="container pb-5">
            <SearchFormPanel
                form={(*form).clone()}
                {loading}
                on_change={on_form_change}
                {on_submit}
                {on_reset}
            >
                <ChannelPicker
                    selection={(*selection).clone()}
                    categories={(*categories).clone()}
                    on_change={on_selection_change}
                    {on_warning}
                />
            </SearchFormPanel>

            <HistoryPanel
                entries={history.list().to_vec()}
                {on_replay}
                on_clear={on_clear_history}
            />

            <StatusBanner status={(*status).clone()} />

            <ResultsView
                controller={(*controller).clone()}
                reported_count={*reported_count}
                {on_sort}
                {on_filter}
                {on_load_more}
                on_save={Some(on_save)}
                saved_ids={saved_ids.0.clone()}
            />
        </div>
    }
}
