use crate::dialogs::{BrowserDialog, Confirm};
use crate::models::SavedVideo;
use crate::saved::api::{delete_saved, list_saved, update_notes, Pagination};
use crate::saved::{sort_saved, SavedSort, SAVED_PER_PAGE};
use crate::search::search_options::event_value;
use crate::utils::{format_compact, format_date, format_date_time};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[function_component(SavedVideosPage)]
pub fn saved_videos_page() -> Html {
    let videos = use_state(Vec::<SavedVideo>::new);
    let pagination = use_state(Pagination::default);
    let page = use_state(|| 1usize);
    let sort = use_state(SavedSort::default);
    let loading = use_state(|| true);
    let error_message = use_state(Option::<String>::default);
    let notice = use_state(Option::<String>::default);

    {
        let videos = videos.clone();
        let pagination = pagination.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        let sort = *sort;
        use_effect_with(*page, move |page| {
            let page = *page;
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match list_saved(page, SAVED_PER_PAGE).await {
                    Ok(result) => {
                        let mut list = result.videos;
                        sort_saved(&mut list, sort);
                        videos.set(list);
                        pagination.set(result.pagination);
                        error_message.set(None);
                    }
                    Err(e) => {
                        log::error!("Failed to load saved videos: {}", e);
                        error_message.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_sort = {
        let videos = videos.clone();
        let sort = sort.clone();
        Callback::from(move |e: Event| {
            if let Some(next) = event_value(&e).as_deref().and_then(SavedSort::from_key) {
                let mut list = (*videos).clone();
                sort_saved(&mut list, next);
                videos.set(list);
                sort.set(next);
            }
        })
    };

    let on_delete = {
        let videos = videos.clone();
        let pagination = pagination.clone();
        let notice = notice.clone();
        let error_message = error_message.clone();
        Callback::from(move |video: SavedVideo| {
            if !BrowserDialog.confirm(&format!("Remove '{}' from saved videos?", video.video_title)) {
                return;
            }
            let videos = videos.clone();
            let pagination = pagination.clone();
            let notice = notice.clone();
            let error_message = error_message.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match delete_saved(video.id).await {
                    Ok(()) => {
                        let list: Vec<_> =
                            videos.iter().filter(|v| v.id != video.id).cloned().collect();
                        videos.set(list);
                        let mut counts = *pagination;
                        counts.total = counts.total.saturating_sub(1);
                        pagination.set(counts);
                        notice.set(Some("Video removed".to_string()));
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }
            });
        })
    };

    let on_notes = {
        let videos = videos.clone();
        let notice = notice.clone();
        let error_message = error_message.clone();
        Callback::from(move |(id, notes): (i64, String)| {
            let videos = videos.clone();
            let notice = notice.clone();
            let error_message = error_message.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match update_notes(id, &notes).await {
                    Ok(()) => {
                        let list: Vec<_> = videos
                            .iter()
                            .cloned()
                            .map(|mut v| {
                                if v.id == id {
                                    v.notes = Some(notes.clone()).filter(|n| !n.is_empty());
                                }
                                v
                            })
                            .collect();
                        videos.set(list);
                        notice.set(Some("Notes saved".to_string()));
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }
            });
        })
    };

    let go_to = |target: usize| {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(target))
    };

    html! {
        <div class="container py-4">
            <div class="d-flex justify-content-between align-items-center mb-3">
                <h2 class="h4 mb-0">
                    { format!("Saved videos ({})", pagination.total) }
                </h2>
                <select class="form-select form-select-sm w-auto" onchange={on_sort}>
                    { for SavedSort::all_variants().into_iter().map(|s| html! {
                        <option value={s.key()} selected={s == *sort}>{ s.display_name() }</option>
                    }) }
                </select>
            </div>

            if let Some(message) = &*notice {
                <div class="alert alert-success py-2">{ message }</div>
            }
            if let Some(message) = &*error_message {
                <div class="alert alert-danger py-2">{ format!("Error: {message}") }</div>
            }

            if *loading {
                <div class="text-center my-4"><div class="spinner-border" role="status"></div></div>
            } else if videos.is_empty() {
                <p class="text-center text-muted my-4">{ "No saved videos yet." }</p>
            } else {
                <div class="row row-cols-1 row-cols-md-2 g-3">
                    { for videos.iter().map(|video| html! {
                        <SavedVideoCard
                            key={video.id}
                            video={video.clone()}
                            on_delete={on_delete.clone()}
                            on_notes={on_notes.clone()}
                        />
                    }) }
                </div>
            }

            if pagination.pages > 1 {
                <nav class="d-flex justify-content-center gap-2 mt-4">
                    <button class="btn btn-sm btn-outline-primary" disabled={*page <= 1}
                        onclick={go_to(page.saturating_sub(1).max(1))}>
                        { "Previous" }
                    </button>
                    <span class="px-2 py-1 small">{ format!("Page {} of {}", *page, pagination.pages) }</span>
                    <button class="btn btn-sm btn-outline-primary" disabled={*page >= pagination.pages}
                        onclick={go_to((*page + 1).min(pagination.pages))}>
                        { "Next" }
                    </button>
                </nav>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SavedVideoCardProps {
    video: SavedVideo,
    on_delete: Callback<SavedVideo>,
    on_notes: Callback<(i64, String)>,
}

#[function_component(SavedVideoCard)]
fn saved_video_card(props: &SavedVideoCardProps) -> Html {
    let editing = use_state(|| false);
    let draft = use_state(|| props.video.notes.clone().unwrap_or_default());
    let video = &props.video;

    let on_edit = {
        let editing = editing.clone();
        let draft = draft.clone();
        let notes = video.notes.clone().unwrap_or_default();
        Callback::from(move |_: MouseEvent| {
            draft.set(notes.clone());
            editing.set(true);
        })
    };

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            draft.set(e.target_unchecked_into::<HtmlTextAreaElement>().value());
        })
    };

    let on_save_notes = {
        let editing = editing.clone();
        let draft = draft.clone();
        let on_notes = props.on_notes.clone();
        let id = video.id;
        Callback::from(move |_: MouseEvent| {
            on_notes.emit((id, draft.trim().to_string()));
            editing.set(false);
        })
    };

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let video = video.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(video.clone()))
    };

    html! {
        <div class="col">
            <div class="card h-100 d-flex flex-row">
                <a href={video.video_url.clone()} target="_blank" rel="noopener">
                    <img src={video.thumbnail_url.clone()} class="saved-thumb" alt={video.video_title.clone()} />
                </a>
                <div class="card-body">
                    <h6 class="card-title">{ &video.video_title }</h6>
                    <p class="small text-muted mb-1">
                        <a href={format!("https://www.youtube.com/channel/{}", video.channel_id)}
                            target="_blank" rel="noopener" class="text-decoration-none">
                            { &video.channel_title }
                        </a>
                    </p>
                    <p class="small mb-1">
                        { format!("{} views · {}s", format_compact(video.view_count), video.duration) }
                        if let Some(published) = &video.published_at {
                            { format!(" · {}", format_date(published)) }
                        }
                    </p>
                    <p class="small text-muted mb-2">{ format!("Saved {}", format_date_time(&video.saved_at)) }</p>
                    if *editing {
                        <textarea class="form-control form-control-sm mb-2" rows="3"
                            value={(*draft).clone()} oninput={on_draft} />
                        <button class="btn btn-sm btn-primary me-2" onclick={on_save_notes}>{ "Save notes" }</button>
                    } else {
                        if let Some(notes) = &video.notes {
                            <p class="small fst-italic mb-2">{ notes }</p>
                        }
                        <button class="btn btn-sm btn-outline-secondary me-2" onclick={on_edit}>{ "Notes" }</button>
                    }
                    <button class="btn btn-sm btn-outline-danger" onclick={on_delete}>{ "Delete" }</button>
                </div>
            </div>
        </div>
    }
}
