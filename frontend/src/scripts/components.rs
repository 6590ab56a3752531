use crate::error::ValidationError;
use crate::scripts::api::extract_scripts;
use crate::scripts::{
    bundle_file_name, combined_text, ExtractedScript, ScriptRequest, DEFAULT_VIDEO_COUNT,
    MAX_VIDEO_COUNT, MIN_VIDEO_COUNT,
};
use chrono::Utc;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Writes `text` through `navigator.clipboard.writeText`.
async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let navigator = Reflect::get(&window, &"navigator".into()).map_err(|e| format!("{e:?}"))?;
    let clipboard = Reflect::get(&navigator, &"clipboard".into()).map_err(|e| format!("{e:?}"))?;
    if clipboard.is_undefined() {
        return Err("clipboard is unavailable".to_string());
    }
    let write_text = Reflect::get(&clipboard, &"writeText".into())
        .map_err(|e| format!("{e:?}"))?
        .dyn_into::<Function>()
        .map_err(|_| "writeText is not a function".to_string())?;
    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| format!("{e:?}"))?;
    JsFuture::from(promise.unchecked_into::<Promise>())
        .await
        .map(|_| ())
        .map_err(|e| format!("{e:?}"))
}

fn text_download_href(text: &str) -> String {
    format!("data:text/plain;charset=utf-8,{}", urlencoding::encode(text))
}

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Copied(String),
    Failed(String),
}

#[function_component(ScriptExtractorPage)]
pub fn script_extractor_page() -> Html {
    let channel_url = use_state(String::new);
    let video_count = use_state(|| DEFAULT_VIDEO_COUNT.to_string());
    let auto_translate = use_state(|| false);
    let field_error = use_state(Option::<ValidationError>::default);
    let loading = use_state(|| false);
    let scripts = use_state(|| None::<Vec<ExtractedScript>>);
    let error_message = use_state(Option::<String>::default);
    let notice = use_state(Option::<Notice>::default);

    let on_url = {
        let channel_url = channel_url.clone();
        let field_error = field_error.clone();
        Callback::from(move |e: InputEvent| {
            channel_url.set(e.target_unchecked_into::<HtmlInputElement>().value());
            field_error.set(None);
        })
    };
    let on_count = {
        let video_count = video_count.clone();
        let field_error = field_error.clone();
        Callback::from(move |e: InputEvent| {
            video_count.set(e.target_unchecked_into::<HtmlInputElement>().value());
            field_error.set(None);
        })
    };
    let on_translate = {
        let auto_translate = auto_translate.clone();
        Callback::from(move |e: Event| {
            auto_translate.set(e.target_unchecked_into::<HtmlInputElement>().checked())
        })
    };

    let on_submit = {
        let channel_url = channel_url.clone();
        let video_count = video_count.clone();
        let auto_translate = auto_translate.clone();
        let field_error = field_error.clone();
        let loading = loading.clone();
        let scripts = scripts.clone();
        let error_message = error_message.clone();
        let notice = notice.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match ScriptRequest::new(&channel_url, &video_count, *auto_translate) {
                Ok(request) => request,
                Err(e) => {
                    field_error.set(Some(e));
                    return;
                }
            };

            loading.set(true);
            error_message.set(None);
            notice.set(None);
            scripts.set(None);
            let loading = loading.clone();
            let scripts = scripts.clone();
            let error_message = error_message.clone();
            spawn_local(async move {
                match extract_scripts(&request).await {
                    Ok(found) => {
                        log::info!("Extracted {} scripts", found.len());
                        scripts.set(Some(found));
                    }
                    Err(e) => {
                        log::error!("Script extraction failed: {}", e);
                        error_message.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let copy = {
        let notice = notice.clone();
        move |text: String, label: String| {
            let notice = notice.clone();
            Callback::from(move |_: MouseEvent| {
                let notice = notice.clone();
                let text = text.clone();
                let label = label.clone();
                spawn_local(async move {
                    match copy_to_clipboard(&text).await {
                        Ok(()) => notice.set(Some(Notice::Copied(label))),
                        Err(e) => {
                            log::warn!("Clipboard write failed: {}", e);
                            notice.set(Some(Notice::Failed(e)));
                        }
                    }
                });
            })
        }
    };

    let invalid = |belongs: fn(&ValidationError) -> bool| {
        (*field_error).as_ref().filter(|e| belongs(e)).map(ToString::to_string)
    };
    let url_error = invalid(|e| {
        matches!(
            e,
            ValidationError::Required { .. } | ValidationError::InvalidChannelUrl(_)
        )
    });
    let count_error = invalid(|e| matches!(e, ValidationError::OutOfRange { .. }));

    let notice_view = match &*notice {
        Some(Notice::Copied(label)) => html! {
            <div class="alert alert-success py-2">{ format!("Copied {label} to the clipboard") }</div>
        },
        Some(Notice::Failed(reason)) => html! {
            <div class="alert alert-warning py-2">{ format!("Could not copy: {reason}") }</div>
        },
        None => html! {},
    };

    let results = match &*scripts {
        None => html! {},
        Some(list) if list.is_empty() => html! {
            <div class="alert alert-info">{ "No videos with captions found" }</div>
        },
        Some(list) => {
            let all_text = combined_text(list);
            let bundle_name = bundle_file_name(list, Utc::now().date_naive());
            html! {
                <>
                    <div class="d-flex align-items-center gap-2 mb-3">
                        <h2 class="h5 mb-0 me-auto">{ format!("{} scripts", list.len()) }</h2>
                        <button class="btn btn-sm btn-outline-secondary"
                            onclick={copy(all_text.clone(), "all scripts".to_string())}>
                            { "Copy all" }
                        </button>
                        <a class="btn btn-sm btn-outline-primary"
                            href={text_download_href(&all_text)} download={bundle_name}>
                            { "Download all" }
                        </a>
                    </div>
                    <div class="row g-3">
                        { for list.iter().map(|script| {
                            let text = script.to_text();
                            html! {
                                <div class="col-md-6">
                                    <div class="card h-100">
                                        <div class="card-body">
                                            <h3 class="h6 card-title">
                                                <a href={script.video_url.clone()} target="_blank" rel="noopener">
                                                    { script.title.clone() }
                                                </a>
                                            </h3>
                                            <p class="text-muted small mb-2">{ script.duration_label() }</p>
                                            <p class="card-text small script-preview">{ script.preview() }</p>
                                        </div>
                                        <div class="card-footer d-flex gap-2">
                                            <button class="btn btn-sm btn-outline-secondary"
                                                onclick={copy(text.clone(), format!("\"{}\"", script.title))}>
                                                { "Copy" }
                                            </button>
                                            <a class="btn btn-sm btn-outline-primary"
                                                href={text_download_href(&text)} download={script.file_name()}>
                                                { "Download" }
                                            </a>
                                        </div>
                                    </div>
                                </div>
                            }
                        }) }
                    </div>
                </>
            }
        }
    };

    html! {
        <div class="container pb-5">
            <h1 class="h4 mb-3">{ "Script extractor" }</h1>
            <form class="card card-body mb-3" onsubmit={on_submit}>
                <div class="row g-3 align-items-end">
                    <div class="col-md-6">
                        <label class="form-label" for="script-channel">{ "Channel URL" }</label>
                        <input id="script-channel" type="text"
                            class={classes!("form-control", url_error.is_some().then_some("is-invalid"))}
                            placeholder="https://www.youtube.com/@channel"
                            value={(*channel_url).clone()} oninput={on_url} />
                        if let Some(message) = url_error {
                            <div class="invalid-feedback d-block">{ message }</div>
                        }
                    </div>
                    <div class="col-md-2">
                        <label class="form-label" for="script-count">{ "Videos" }</label>
                        <input id="script-count" type="number"
                            min={MIN_VIDEO_COUNT.to_string()} max={MAX_VIDEO_COUNT.to_string()}
                            class={classes!("form-control", count_error.is_some().then_some("is-invalid"))}
                            value={(*video_count).clone()} oninput={on_count} />
                        if let Some(message) = count_error {
                            <div class="invalid-feedback d-block">{ message }</div>
                        }
                    </div>
                    <div class="col-md-2">
                        <div class="form-check">
                            <input id="script-translate" type="checkbox" class="form-check-input"
                                checked={*auto_translate} onchange={on_translate} />
                            <label class="form-check-label" for="script-translate">{ "Auto-translate" }</label>
                        </div>
                    </div>
                    <div class="col-md-2">
                        <button type="submit" class="btn btn-primary w-100" disabled={*loading}>
                            { "Extract" }
                        </button>
                    </div>
                </div>
            </form>

            if *loading {
                <div class="text-center py-4">
                    <div class="spinner-border text-primary" role="status"></div>
                    <p class="mt-2 text-muted">{ "Fetching captions..." }</p>
                </div>
            }
            if let Some(message) = &*error_message {
                <div class="alert alert-danger">{ message }</div>
            }
            { notice_view }
            { results }
        </div>
    }
}
