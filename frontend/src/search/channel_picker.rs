use crate::config::CHANNEL_SEARCH_DEBOUNCE_MS;
use crate::dialogs::BrowserDialog;
use crate::models::{Category, ChannelHit, SelectedChannel};
use crate::search::api::search_channels;
use crate::search::debounce::{channel_query, DebounceGate};
use crate::search::search_options::event_value;
use crate::search::selection::ChannelSelection;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::platform::time::sleep;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChannelPickerProps {
    pub selection: ChannelSelection,
    pub categories: Vec<Category>,
    pub on_change: Callback<ChannelSelection>,
    pub on_warning: Callback<String>,
}

#[function_component(ChannelPicker)]
pub fn channel_picker(props: &ChannelPickerProps) -> Html {
    let query = use_state(String::new);
    let hits = use_state(Vec::<ChannelHit>::new);
    let searching = use_state(|| false);
    let gate = use_mut_ref(DebounceGate::default);

    let on_input = {
        let query = query.clone();
        let hits = hits.clone();
        let searching = searching.clone();
        let gate = gate.borrow().clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            query.set(value.clone());

            let generation = gate.arm();
            let Some(text) = channel_query(&value) else {
                hits.set(Vec::new());
                searching.set(false);
                return;
            };

            let gate = gate.clone();
            let hits = hits.clone();
            let searching = searching.clone();
            spawn_local(async move {
                sleep(Duration::from_millis(CHANNEL_SEARCH_DEBOUNCE_MS)).await;
                if !gate.should_fire(generation) {
                    return;
                }
                searching.set(true);
                let result = search_channels(&text).await;
                // A newer keystroke may have armed the gate while we waited.
                if !gate.should_fire(generation) {
                    return;
                }
                searching.set(false);
                match result {
                    Ok(found) => hits.set(found),
                    Err(e) => {
                        log::error!("Channel search failed: {}", e);
                        hits.set(Vec::new());
                    }
                }
            });
        })
    };

    let on_pick = {
        let selection = props.selection.clone();
        let on_change = props.on_change.clone();
        let on_warning = props.on_warning.clone();
        let query = query.clone();
        let hits = hits.clone();
        let gate = gate.borrow().clone();
        Callback::from(move |hit: ChannelHit| {
            let mut next = selection.clone();
            match next.add(SelectedChannel::from(hit)) {
                Ok(()) => {
                    gate.cancel();
                    query.set(String::new());
                    hits.set(Vec::new());
                    on_change.emit(next);
                }
                Err(e) => on_warning.emit(e.to_string()),
            }
        })
    };

    let on_remove = {
        let selection = props.selection.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |channel_id: String| {
            let mut next = selection.clone();
            if next.remove(&channel_id) {
                on_change.emit(next);
            }
        })
    };

    let on_clear = {
        let selection = props.selection.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = selection.clone();
            if next.clear(&BrowserDialog) {
                on_change.emit(next);
            }
        })
    };

    let on_category = {
        let selection = props.selection.clone();
        let categories = props.categories.clone();
        let on_change = props.on_change.clone();
        let on_warning = props.on_warning.clone();
        Callback::from(move |e: Event| {
            let Some(id) = event_value(&e).filter(|v| !v.is_empty()) else {
                return;
            };
            let Some(category) = categories.iter().find(|c| c.id == id) else {
                return;
            };
            let mut next = selection.clone();
            let skipped = next.replace_with(category.channels.clone());
            if skipped > 0 {
                on_warning.emit(format!(
                    "Only the first {} channels of '{}' were selected",
                    next.capacity(),
                    category.name
                ));
            }
            on_change.emit(next);
        })
    };

    let selection = &props.selection;

    html! {
        <div class="channel-picker mb-3">
            <label class="form-label">
                { format!("Channels ({}/{})", selection.len(), selection.capacity()) }
            </label>

            if !props.categories.is_empty() {
                <select class="form-select form-select-sm mb-2" onchange={on_category}>
                    <option value="" selected=true>{ "Load channels from a category..." }</option>
                    { for props.categories.iter().map(|c| html! {
                        <option value={c.id.clone()}>
                            { format!("{} ({})", c.name, c.channels.len()) }
                        </option>
                    }) }
                </select>
            }

            <div class="position-relative">
                <input
                    type="text"
                    class="form-control"
                    placeholder="Search channels by name..."
                    value={(*query).clone()}
                    oninput={on_input}
                />
                if *searching {
                    <div class="small text-muted mt-1">{ "Searching..." }</div>
                }
                if !hits.is_empty() {
                    <ul class="list-group channel-search-results">
                        { for hits.iter().map(|hit| {
                            let on_pick = on_pick.clone();
                            let picked = hit.clone();
                            let thumbnail = SelectedChannel::from(hit.clone()).thumbnail;
                            html! {
                                <li class="list-group-item list-group-item-action d-flex align-items-center"
                                    onclick={move |_| on_pick.emit(picked.clone())}>
                                    <img src={thumbnail} class="rounded-circle me-2" width="32" height="32" alt="" />
                                    <div>
                                        <div>{ &hit.title }</div>
                                        if let Some(description) = &hit.description {
                                            <div class="small text-muted text-truncate">{ description }</div>
                                        }
                                    </div>
                                </li>
                            }
                        }) }
                    </ul>
                }
            </div>

            if !selection.is_empty() {
                <div class="selected-channels d-flex flex-wrap gap-2 mt-2">
                    { for selection.channels().iter().map(|channel| {
                        let on_remove = on_remove.clone();
                        let id = channel.id.clone();
                        html! {
                            <span class="badge bg-light text-dark border d-flex align-items-center">
                                <img src={channel.thumbnail.clone()} class="rounded-circle me-1" width="20" height="20" alt="" />
                                { &channel.title }
                                <button type="button" class="btn-close btn-sm ms-1" aria-label="Remove"
                                    onclick={move |_| on_remove.emit(id.clone())} />
                            </span>
                        }
                    }) }
                    <button type="button" class="btn btn-sm btn-outline-danger" onclick={on_clear}>
                        { "Clear all" }
                    </button>
                </div>
            }
        </div>
    }
}
