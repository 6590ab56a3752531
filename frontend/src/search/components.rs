use crate::models::SearchResultItem;
use crate::search::api::check_api_status;
use crate::search::card::VideoCard;
use crate::search::form::{NumericField, SearchForm};
use crate::search::history::SearchHistoryEntry;
use crate::search::results::ResultSetController;
use crate::search::search_options::{event_value, FilterCriteria, SearchOptionsDropdowns, SortKey};
use crate::utils::format_number;
use std::collections::{HashMap, HashSet};
use yew::prelude::*;

const REGIONS: [(&str, &str); 6] = [
    ("US", "United States"),
    ("KR", "South Korea"),
    ("JP", "Japan"),
    ("GB", "United Kingdom"),
    ("IN", "India"),
    ("BR", "Brazil"),
];

const LANGUAGES: [(&str, &str); 5] = [
    ("en", "English"),
    ("ko", "Korean"),
    ("ja", "Japanese"),
    ("es", "Spanish"),
    ("pt", "Portuguese"),
];

#[derive(Properties, PartialEq)]
pub struct SearchFormPanelProps {
    pub form: SearchForm,
    pub loading: bool,
    pub on_change: Callback<SearchForm>,
    pub on_submit: Callback<SearchForm>,
    pub on_reset: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(SearchFormPanel)]
pub fn search_form_panel(props: &SearchFormPanelProps) -> Html {
    // Each field rebuilds the form from the current props.
    let field = |apply: fn(&mut SearchForm, String)| {
        let form = props.form.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let mut next = form.clone();
            apply(&mut next, event_value(&e).unwrap_or_default());
            on_change.emit(next);
        })
    };

    let on_keyword = field(|f, v| f.keyword = v);
    let on_title = field(|f, v| f.title_contains = v);
    let on_region = field(|f, v| f.region_code = v);
    let on_language = field(|f, v| f.language = v);

    // Rejected numeric text stays in its input together with the reason.
    let field_errors = use_state(HashMap::<NumericField, (String, String)>::new);
    let numeric = |field: NumericField, placeholder: &'static str| {
        let onchange = {
            let form = props.form.clone();
            let on_change = props.on_change.clone();
            let field_errors = field_errors.clone();
            Callback::from(move |e: Event| {
                let raw = event_value(&e).unwrap_or_default();
                let mut next = form.clone();
                let mut errors = (*field_errors).clone();
                match next.set_numeric(field, &raw) {
                    Ok(()) => {
                        errors.remove(&field);
                        on_change.emit(next);
                    }
                    Err(err) => {
                        errors.insert(field, (raw, err.to_string()));
                    }
                }
                field_errors.set(errors);
            })
        };
        let (value, error) = match field_errors.get(&field) {
            Some((raw, message)) => (raw.clone(), Some(message.clone())),
            None => (props.form.numeric_text(field), None),
        };
        html! {
            <>
                <label class="form-label">{ field.label() }</label>
                <input type="text" inputmode="numeric"
                    class={classes!("form-control", error.is_some().then_some("is-invalid"))}
                    {placeholder} {value} {onchange} />
                if let Some(message) = error {
                    <div class="invalid-feedback d-block">{ message }</div>
                }
            </>
        }
    };

    let on_submit = {
        let form = props.form.clone();
        let on_submit = props.on_submit.clone();
        let blocked = !field_errors.is_empty();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !blocked {
                on_submit.emit(form.clone());
            }
        })
    };

    let on_reset = {
        let on_reset = props.on_reset.clone();
        let field_errors = field_errors.clone();
        Callback::from(move |_: MouseEvent| {
            field_errors.set(HashMap::new());
            on_reset.emit(())
        })
    };

    let form = &props.form;

    html! {
        <form onsubmit={on_submit} class="search-form card card-body mb-4">
            <div class="row g-3">
                <div class="col-md-6">
                    <label class="form-label">{ "Keyword" }</label>
                    <input type="text" class="form-control" placeholder="e.g. cooking"
                        value={form.keyword.clone()} onchange={on_keyword} />
                </div>
                <div class="col-md-6">
                    <label class="form-label">{ "Title contains" }</label>
                    <input type="text" class="form-control"
                        value={form.title_contains.clone()} onchange={on_title} />
                </div>
                <div class="col-md-3">{ numeric(NumericField::MinViews, "") }</div>
                <div class="col-md-3">{ numeric(NumericField::MaxViews, "No limit") }</div>
                <div class="col-md-2">{ numeric(NumericField::DaysAgo, "") }</div>
                <div class="col-md-2">{ numeric(NumericField::MaxResults, "") }</div>
                <div class="col-md-2">{ numeric(NumericField::DurationMax, "") }</div>
                <div class="col-md-3">
                    <label class="form-label">{ "Region" }</label>
                    <select class="form-select" onchange={on_region}>
                        { for REGIONS.iter().map(|(code, name)| html! {
                            <option value={*code} selected={form.region_code == *code}>{ *name }</option>
                        }) }
                    </select>
                </div>
                <div class="col-md-3">
                    <label class="form-label">{ "Language" }</label>
                    <select class="form-select" onchange={on_language}>
                        { for LANGUAGES.iter().map(|(code, name)| html! {
                            <option value={*code} selected={form.language == *code}>{ *name }</option>
                        }) }
                    </select>
                </div>
                <div class="col-12">
                    { props.children.clone() }
                </div>
            </div>
            <div class="d-flex gap-2 mt-3">
                <button type="submit" class="btn btn-primary" disabled={props.loading}>
                    { if props.loading { "Searching..." } else { "Search" } }
                </button>
                <button type="button" class="btn btn-outline-secondary" onclick={on_reset}>
                    { "Reset settings" }
                </button>
            </div>
        </form>
    }
}

/// Banner state above the result grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Warning(String),
    Error(String),
    QuotaExceeded(String),
}

#[derive(Properties, PartialEq)]
pub struct StatusBannerProps {
    pub status: PageStatus,
}

#[function_component(StatusBanner)]
pub fn status_banner(props: &StatusBannerProps) -> Html {
    match &props.status {
        PageStatus::Idle => html! {},
        PageStatus::Loading => html! {
            <div class="text-center my-4">
                <div class="spinner-border text-primary" role="status"></div>
                <p class="mt-2">{ "Searching Shorts..." }</p>
            </div>
        },
        PageStatus::Warning(message) => html! {
            <div class="alert alert-warning">{ message }</div>
        },
        PageStatus::Error(message) => html! {
            <div class="alert alert-danger">
                <strong>{ "Search failed: " }</strong>{ message }
            </div>
        },
        PageStatus::QuotaExceeded(message) => html! { <QuotaPanel message={message.clone()} /> },
    }
}

#[derive(Properties, PartialEq)]
pub struct QuotaPanelProps {
    pub message: String,
}

#[function_component(QuotaPanel)]
pub fn quota_panel(props: &QuotaPanelProps) -> Html {
    let check_result = use_state(|| None::<Result<String, String>>);
    let checking = use_state(|| false);

    let on_check = {
        let check_result = check_result.clone();
        let checking = checking.clone();
        Callback::from(move |_: MouseEvent| {
            let check_result = check_result.clone();
            let checking = checking.clone();
            checking.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let result = check_api_status().await.map_err(|e| e.to_string());
                check_result.set(Some(result));
                checking.set(false);
            });
        })
    };

    html! {
        <div class="alert alert-warning quota-panel">
            <h5 class="alert-heading">{ "YouTube API quota exceeded" }</h5>
            <p>{ &props.message }</p>
            <p class="small mb-2">{ "The daily quota resets at midnight Pacific Time." }</p>
            <button type="button" class="btn btn-sm btn-outline-dark" onclick={on_check} disabled={*checking}>
                { if *checking { "Checking..." } else { "Check API status" } }
            </button>
            {
                match &*check_result {
                    Some(Ok(message)) => html! { <p class="small text-success mt-2 mb-0">{ message }</p> },
                    Some(Err(message)) => html! { <p class="small text-danger mt-2 mb-0">{ message }</p> },
                    None => html! {},
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultsViewProps {
    pub controller: ResultSetController,
    /// Count reported by the backend for the last search.
    pub reported_count: Option<usize>,
    pub on_sort: Callback<SortKey>,
    pub on_filter: Callback<FilterCriteria>,
    pub on_load_more: Callback<()>,
    #[prop_or_default]
    pub on_save: Option<Callback<SearchResultItem>>,
    #[prop_or_default]
    pub saved_ids: HashSet<String>,
}

#[function_component(ResultsView)]
pub fn results_view(props: &ResultsViewProps) -> Html {
    let controller = &props.controller;
    if controller.fetched_count() == 0 {
        return match props.reported_count {
            Some(_) => html! {
                <p class="text-center text-muted my-4">{ "No Shorts matched your search." }</p>
            },
            None => html! {},
        };
    }

    let on_load_more = {
        let on_load_more = props.on_load_more.clone();
        Callback::from(move |_: MouseEvent| on_load_more.emit(()))
    };

    let summary = if controller.is_filtered() {
        format!(
            "Showing {} of {} filtered ({} fetched)",
            controller.displayed_count(),
            format_number(controller.total_count() as u64),
            format_number(controller.fetched_count() as u64)
        )
    } else {
        format!(
            "Showing {} of {}",
            controller.displayed_count(),
            format_number(controller.total_count() as u64)
        )
    };

    html! {
        <section class="results">
            <SearchOptionsDropdowns
                sort_key={controller.sort_key()}
                criteria={controller.criteria().clone()}
                on_sort_change={props.on_sort.clone()}
                on_filter_change={props.on_filter.clone()}
            />
            <p class="small text-muted">{ summary }</p>
            if controller.total_count() == 0 {
                <p class="text-center text-muted my-4">{ "No results match the current filters." }</p>
            }
            <div class="row row-cols-1 row-cols-sm-2 row-cols-md-3 row-cols-lg-4 g-3">
                { for controller.displayed_items().into_iter().map(|item| html! {
                    <VideoCard
                        key={item.id.clone()}
                        item={item.clone()}
                        on_save={props.on_save.clone()}
                        saved={props.saved_ids.contains(&item.id)}
                    />
                }) }
            </div>
            if controller.has_more() {
                <div class="text-center my-4">
                    <button type="button" class="btn btn-outline-primary" onclick={on_load_more}>
                        { "Load more" }
                    </button>
                </div>
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryPanelProps {
    pub entries: Vec<SearchHistoryEntry>,
    pub on_replay: Callback<usize>,
    pub on_clear: Callback<()>,
}

#[function_component(HistoryPanel)]
pub fn history_panel(props: &HistoryPanelProps) -> Html {
    if props.entries.is_empty() {
        return html! {};
    }

    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    html! {
        <div class="card mb-4 search-history">
            <div class="card-header d-flex justify-content-between align-items-center">
                <span>{ "Recent searches" }</span>
                <button type="button" class="btn btn-sm btn-link text-danger" onclick={on_clear}>
                    { "Clear" }
                </button>
            </div>
            <ul class="list-group list-group-flush">
                { for props.entries.iter().enumerate().map(|(index, entry)| {
                    let on_replay = props.on_replay.clone();
                    html! {
                        <li class="list-group-item list-group-item-action d-flex justify-content-between"
                            onclick={move |_| on_replay.emit(index)}>
                            <span>{ entry.summary() }</span>
                            <span class="small text-muted">{ &entry.formatted_date }</span>
                        </li>
                    }
                }) }
            </ul>
        </div>
    }
}
