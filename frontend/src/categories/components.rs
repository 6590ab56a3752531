use crate::categories::manager::CategoryManager;
use crate::dialogs::BrowserDialog;
use crate::env_variable_utils::APP_CONFIG;
use crate::models::Category;
use crate::search::channel_picker::ChannelPicker;
use crate::search::selection::ChannelSelection;
use crate::services::AppServices;
use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Toast-like line above the category list.
#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct CategoriesPageProps {
    pub services: AppServices,
}

#[function_component(CategoriesPage)]
pub fn categories_page(props: &CategoriesPageProps) -> Html {
    let manager = use_state(|| CategoryManager::new(props.services.categories.clone()));
    let notice = use_state(Option::<Notice>::default);
    let name = use_state(String::new);
    let description = use_state(String::new);
    let import_text = use_state(String::new);

    {
        let manager = manager.clone();
        let notice = notice.clone();
        use_effect_with((), move |_| {
            let mut loaded = (*manager).clone();
            spawn_local(async move {
                match loaded.load().await {
                    Ok(()) => manager.set(loaded),
                    Err(e) => {
                        log::error!("Failed to load categories: {}", e);
                        notice.set(Some(Notice::Error(format!("Could not load categories: {e}"))));
                    }
                }
            });
            || ()
        });
    }

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| name.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_description = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            description.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let on_import_text = {
        let import_text = import_text.clone();
        Callback::from(move |e: InputEvent| {
            import_text.set(e.target_unchecked_into::<HtmlTextAreaElement>().value())
        })
    };

    let on_create = {
        let manager = manager.clone();
        let notice = notice.clone();
        let name = name.clone();
        let description = description.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let mut next = (*manager).clone();
            let manager = manager.clone();
            let notice = notice.clone();
            let name = name.clone();
            let description = description.clone();
            spawn_local(async move {
                match next.create(&name, &description).await {
                    Ok(category) => {
                        notice.set(Some(Notice::Success(format!("Category '{}' added", category.name))));
                        name.set(String::new());
                        description.set(String::new());
                        manager.set(next);
                    }
                    Err(e) => notice.set(Some(Notice::Warning(e.to_string()))),
                }
            });
        })
    };

    let on_delete = {
        let manager = manager.clone();
        let notice = notice.clone();
        Callback::from(move |id: String| {
            let mut next = (*manager).clone();
            let manager = manager.clone();
            let notice = notice.clone();
            spawn_local(async move {
                match next.delete(&id, &BrowserDialog).await {
                    Ok(Some(category)) => {
                        notice.set(Some(Notice::Success(format!("Category '{}' deleted", category.name))));
                        manager.set(next);
                    }
                    Ok(None) => {}
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_remove_channel = {
        let manager = manager.clone();
        let notice = notice.clone();
        Callback::from(move |(id, channel_id): (String, String)| {
            let mut next = (*manager).clone();
            let manager = manager.clone();
            let notice = notice.clone();
            spawn_local(async move {
                match next.remove_channel(&id, &channel_id, &BrowserDialog).await {
                    Ok(true) => {
                        notice.set(Some(Notice::Success("Channel removed".to_string())));
                        manager.set(next);
                    }
                    Ok(false) => {}
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_add_channels = {
        let manager = manager.clone();
        let notice = notice.clone();
        Callback::from(move |(id, selection): (String, ChannelSelection)| {
            let mut next = (*manager).clone();
            let manager = manager.clone();
            let notice = notice.clone();
            spawn_local(async move {
                match next.add_channels(&id, selection.channels()).await {
                    Ok(Some(report)) => {
                        let message = report.message();
                        if report.added > 0 {
                            notice.set(Some(Notice::Success(message)));
                            manager.set(next);
                        } else {
                            notice.set(Some(Notice::Warning(message)));
                        }
                    }
                    Ok(None) => notice.set(Some(Notice::Error("Unknown category".to_string()))),
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_import = {
        let manager = manager.clone();
        let notice = notice.clone();
        let import_text = import_text.clone();
        Callback::from(move |merge: bool| {
            let mut next = (*manager).clone();
            let manager = manager.clone();
            let notice = notice.clone();
            let raw = (*import_text).clone();
            let import_text = import_text.clone();
            spawn_local(async move {
                let result = if merge {
                    next.merge(&raw).await.map(|report| Some(report.message()))
                } else {
                    next.import(&raw, &BrowserDialog)
                        .await
                        .map(|count| count.map(|n| format!("Imported {} categories", n)))
                };
                match result {
                    Ok(Some(message)) => {
                        notice.set(Some(Notice::Success(message)));
                        import_text.set(String::new());
                        manager.set(next);
                    }
                    Ok(None) => {}
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let export_link = match manager.export(Utc::now()) {
        Ok((file_name, json)) => html! {
            <a class="btn btn-sm btn-outline-primary"
                href={format!("data:application/json;charset=utf-8,{}", urlencoding::encode(&json))}
                download={file_name}>
                { "Export categories" }
            </a>
        },
        Err(e) => {
            log::error!("Export failed: {}", e);
            html! {}
        }
    };

    let notice_html = match &*notice {
        Some(Notice::Success(m)) => html! { <div class="alert alert-success py-2">{ m }</div> },
        Some(Notice::Warning(m)) => html! { <div class="alert alert-warning py-2">{ m }</div> },
        Some(Notice::Error(m)) => html! { <div class="alert alert-danger py-2">{ m }</div> },
        None => html! {},
    };

    html! {
        <div class="container py-4">
            <h2 class="h4 mb-3">{ "Channel categories" }</h2>
            { notice_html }

            <form class="card card-body mb-4" onsubmit={on_create}>
                <div class="row g-2">
                    <div class="col-md-4">
                        <input type="text" class="form-control" placeholder="Category name"
                            value={(*name).clone()} oninput={on_name} />
                    </div>
                    <div class="col-md-6">
                        <input type="text" class="form-control" placeholder="Description (optional)"
                            value={(*description).clone()} oninput={on_description} />
                    </div>
                    <div class="col-md-2 d-grid">
                        <button type="submit" class="btn btn-primary">{ "Add category" }</button>
                    </div>
                </div>
            </form>

            if manager.categories().is_empty() {
                <p class="text-muted">{ "No categories yet." }</p>
            }
            <div class="row row-cols-1 row-cols-lg-2 g-3 mb-4">
                { for manager.categories().iter().map(|category| html! {
                    <CategoryCard
                        key={category.id.clone()}
                        category={category.clone()}
                        on_delete={on_delete.clone()}
                        on_remove_channel={on_remove_channel.clone()}
                        on_add_channels={on_add_channels.clone()}
                    />
                }) }
            </div>

            <div class="card card-body">
                <h3 class="h6">{ "Share" }</h3>
                <div class="mb-2">{ export_link }</div>
                <textarea class="form-control mb-2" rows="4"
                    placeholder="Paste an exported categories file here"
                    value={(*import_text).clone()} oninput={on_import_text} />
                <div class="d-flex gap-2">
                    <button type="button" class="btn btn-sm btn-outline-danger"
                        onclick={{ let on_import = on_import.clone(); move |_| on_import.emit(false) }}>
                        { "Replace all" }
                    </button>
                    <button type="button" class="btn btn-sm btn-outline-success"
                        onclick={move |_| on_import.emit(true)}>
                        { "Merge" }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CategoryCardProps {
    category: Category,
    on_delete: Callback<String>,
    on_remove_channel: Callback<(String, String)>,
    on_add_channels: Callback<(String, ChannelSelection)>,
}

#[function_component(CategoryCard)]
fn category_card(props: &CategoryCardProps) -> Html {
    let adding = use_state(|| false);
    let pending = use_state(|| ChannelSelection::new(APP_CONFIG.max_selected_channels));
    let warning = use_state(Option::<String>::default);
    let category = &props.category;

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let id = category.id.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
    };

    let on_toggle_add = {
        let adding = adding.clone();
        Callback::from(move |_: MouseEvent| adding.set(!*adding))
    };

    let on_pending = {
        let pending = pending.clone();
        let warning = warning.clone();
        Callback::from(move |selection: ChannelSelection| {
            warning.set(None);
            pending.set(selection);
        })
    };

    let on_warning = {
        let warning = warning.clone();
        Callback::from(move |message: String| warning.set(Some(message)))
    };

    let on_confirm_add = {
        let on_add_channels = props.on_add_channels.clone();
        let pending = pending.clone();
        let adding = adding.clone();
        let id = category.id.clone();
        Callback::from(move |_: MouseEvent| {
            if pending.is_empty() {
                return;
            }
            on_add_channels.emit((id.clone(), (*pending).clone()));
            pending.set(ChannelSelection::new(pending.capacity()));
            adding.set(false);
        })
    };

    html! {
        <div class="col">
            <div class="card h-100">
                <div class="card-header d-flex justify-content-between align-items-center">
                    <div>
                        <strong>{ &category.name }</strong>
                        <span class="badge bg-secondary ms-2">{ category.channels.len().to_string() }</span>
                    </div>
                    <div class="d-flex gap-1">
                        <button class="btn btn-sm btn-outline-primary" onclick={on_toggle_add}>
                            { if *adding { "Cancel" } else { "Add channels" } }
                        </button>
                        <button class="btn btn-sm btn-outline-danger" onclick={on_delete}>{ "Delete" }</button>
                    </div>
                </div>
                <div class="card-body">
                    if let Some(description) = &category.description {
                        <p class="small text-muted">{ description }</p>
                    }
                    if *adding {
                        <ChannelPicker
                            selection={(*pending).clone()}
                            categories={Vec::<Category>::new()}
                            on_change={on_pending}
                            on_warning={on_warning}
                        />
                        if let Some(message) = &*warning {
                            <div class="small text-warning mb-2">{ message }</div>
                        }
                        <button class="btn btn-sm btn-primary mb-3" disabled={pending.is_empty()} onclick={on_confirm_add}>
                            { format!("Add {} channels", pending.len()) }
                        </button>
                    }
                    if category.channels.is_empty() {
                        <p class="small text-muted mb-0">{ "No channels in this category." }</p>
                    } else {
                        <ul class="list-unstyled mb-0">
                            { for category.channels.iter().map(|channel| {
                                let on_remove = props.on_remove_channel.clone();
                                let ids = (category.id.clone(), channel.id.clone());
                                html! {
                                    <li class="d-flex align-items-center mb-1">
                                        <img src={channel.thumbnail.clone()} class="rounded-circle me-2" width="24" height="24" alt="" />
                                        <a href={format!("https://www.youtube.com/channel/{}", channel.id)} target="_blank" rel="noopener"
                                            class="flex-grow-1 text-decoration-none">{ &channel.title }</a>
                                        <button class="btn btn-sm btn-link text-danger"
                                            onclick={move |_| on_remove.emit(ids.clone())}>{ "Remove" }</button>
                                    </li>
                                }
                            }) }
                        </ul>
                    }
                </div>
            </div>
        </div>
    }
}
