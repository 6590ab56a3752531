use crate::models::SearchResultItem;
use crate::utils::{format_compact, format_date};
use yew::prelude::*;

/// Display strings for one result card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardModel {
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub thumbnail: String,
    pub watch_url: String,
    pub channel_title: String,
    pub channel_url: String,
    pub views: String,
    pub likes: String,
    pub comments: String,
    pub published: String,
    pub duration: String,
}

impl From<&SearchResultItem> for CardModel {
    fn from(item: &SearchResultItem) -> Self {
        let translated = item
            .translated_title
            .as_ref()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && *t != item.title);
        let (title, original_title) = match translated {
            Some(t) => (t.to_string(), Some(item.title.clone())),
            None => (item.title.clone(), None),
        };

        Self {
            id: item.id.clone(),
            title,
            original_title,
            thumbnail: item.thumbnail.clone(),
            watch_url: item.watch_url(),
            channel_title: item.channel_title.clone(),
            channel_url: item.channel_url(),
            views: format_compact(item.view_count),
            likes: format_compact(item.like_count),
            comments: format_compact(item.comment_count),
            published: format_date(&item.published_at),
            duration: format!("{}s", item.duration),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoCardProps {
    pub item: SearchResultItem,
    #[prop_or_default]
    pub on_save: Option<Callback<SearchResultItem>>,
    #[prop_or_default]
    pub saved: bool,
}

#[function_component(VideoCard)]
pub fn video_card(props: &VideoCardProps) -> Html {
    let card = CardModel::from(&props.item);

    let save_button = props.on_save.as_ref().map(|on_save| {
        let on_click = {
            let on_save = on_save.clone();
            let item = props.item.clone();
            Callback::from(move |_: MouseEvent| on_save.emit(item.clone()))
        };
        html! {
            <button
                type="button"
                class="btn btn-sm btn-outline-secondary w-100 mt-1"
                onclick={on_click}
                disabled={props.saved}
            >
                { if props.saved { "Saved" } else { "Save" } }
            </button>
        }
    });

    html! {
        <div class="col">
            <div class="card h-100 video-card">
                <a href={card.watch_url.clone()} target="_blank" rel="noopener">
                    <img src={card.thumbnail.clone()} class="card-img-top" alt={card.title.clone()} loading="lazy" />
                </a>
                <div class="card-body">
                    <h6 class="card-title">{ &card.title }</h6>
                    if let Some(original) = &card.original_title {
                        <p class="card-text small text-muted fst-italic">{ original }</p>
                    }
                    <p class="card-text small text-muted">
                        <a href={card.channel_url.clone()} target="_blank" rel="noopener" class="text-decoration-none">
                            { &card.channel_title }
                        </a>
                    </p>
                    <div class="stats d-flex justify-content-between small">
                        <span title="Views">{ "👁️ " }{ &card.views }</span>
                        <span title="Likes">{ "👍 " }{ &card.likes }</span>
                        <span title="Comments">{ "💬 " }{ &card.comments }</span>
                    </div>
                    <div class="mt-2 small text-muted">
                        { "📅 " }{ &card.published }{ " • ⏱️ " }{ &card.duration }
                    </div>
                </div>
                <div class="card-footer">
                    <a href={card.watch_url.clone()} target="_blank" rel="noopener" class="btn btn-sm btn-danger w-100">
                        { "Watch Short" }
                    </a>
                    { for save_button }
                </div>
            </div>
        </div>
    }
}
