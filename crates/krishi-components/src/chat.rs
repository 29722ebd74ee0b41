//! Chat assistant page: text, voice and plant-image input

use crate::media::{self, Recorder};
use crate::{alert, confirm, navigate_to, use_api, use_query_language};
use gloo_timers::callback::Timeout;
use krishi_core::{ChatId, HistoryEntry, Language, Text, ValidationError};
use krishi_state::{ChatBubble, ChatSession, InputTab, RecorderState, ReplyOutcome, chat_href};
use leptos::ev::KeyboardEvent;
use leptos::html::{Div, Input};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};

/// How long the healthy-plant celebration stays up
const CELEBRATION_MS: u32 = 3_000;
/// Pause before offering a fresh chat after a session error
const SESSION_PROMPT_DELAY_MS: u32 = 500;

#[component]
pub fn ChatPage() -> impl IntoView {
    let language = use_query_language();
    let chat_id = use_query_map()
        .get_untracked()
        .get("chat_id")
        .filter(|id| !id.is_empty())
        .map(ChatId::new);

    let session = RwSignal::new(ChatSession::new(chat_id, language));
    let api = StoredValue::new(use_api());
    let recorder = StoredValue::new_local(None::<Recorder>);
    let image = RwSignal::new_local(None::<File>);
    let draft = RwSignal::new(String::new());
    let read_aloud = RwSignal::new(false);
    let creating = RwSignal::new(false);
    let celebrate = RwSignal::new(false);
    let messages_ref = NodeRef::<Div>::new();
    let image_ref = NodeRef::<Input>::new();
    // object URLs behind image bubbles, released when the page goes away
    let previews = StoredValue::new(Vec::<String>::new());

    // ========================================================================
    // Session actions
    // ========================================================================

    let reload_history = move || {
        let client = api.get_value();
        spawn_local(async move {
            match client.chat_history().await {
                Ok(history) => session.update(|s| s.set_history(&history.chats)),
                Err(e) => tracing::error!("loading chat history failed: {}", e),
            }
        });
    };

    let new_chat = move || {
        if creating.get_untracked() {
            return;
        }
        creating.set(true);
        let client = api.get_value();
        spawn_local(async move {
            match client.create_chat(language).await {
                Ok(id) => {
                    tracing::info!(chat_id = %id, "chat created");
                    navigate_to(&chat_href(&id, language));
                }
                Err(e) => {
                    tracing::error!("creating chat failed: {}", e);
                    alert(language.t(Text::CreateChatFailed));
                    creating.set(false);
                }
            }
        });
    };

    let delete_chat = move |id: ChatId| {
        if !confirm(language.t(Text::ConfirmDeleteChat)) {
            return;
        }
        let client = api.get_value();
        spawn_local(async move {
            match client.delete_chat(&id).await {
                Ok(()) if session.with_untracked(|s| s.is_current(&id)) => new_chat(),
                Ok(()) => reload_history(),
                Err(e) => {
                    tracing::error!(chat_id = %id, "deleting chat failed: {}", e);
                    alert(language.t(Text::DeleteChatFailed));
                }
            }
        });
    };

    let settle = move |outcome: ReplyOutcome| {
        if let Some(url) = &outcome.audio_url {
            media::play_audio(url);
        }
        if outcome.celebrate {
            celebrate.set(true);
            Timeout::new(CELEBRATION_MS, move || celebrate.set(false)).forget();
        }
        if outcome.offer_new_chat {
            Timeout::new(SESSION_PROMPT_DELAY_MS, move || {
                if confirm(language.t(Text::SessionProblem)) {
                    new_chat();
                }
            })
            .forget();
        }
        reload_history();
    };

    // ========================================================================
    // Text
    // ========================================================================

    let send_text = move || {
        let raw = draft.get_untracked();
        let request = match session.try_update(|s| s.begin_text(&raw)) {
            Some(Ok(request)) => request,
            Some(Err(ValidationError::EmptyMessage)) | None => return,
            Some(Err(e)) => {
                let outcome = session.try_update(|s| s.finish_text(Err(e.to_string())));
                settle(outcome.unwrap_or_default());
                return;
            }
        };
        draft.set(String::new());

        let client = api.get_value();
        spawn_local(async move {
            let result = client.process_text(&request).await.map_err(|e| e.to_string());
            let outcome = session.try_update(|s| s.finish_text(result)).unwrap_or_default();
            settle(outcome);
        });
    };

    // ========================================================================
    // Voice
    // ========================================================================

    let cancel_recording = move || {
        recorder.update_value(|slot| {
            if let Some(active) = slot.take() {
                active.cancel();
            }
        });
    };

    let start_recording = move || {
        if let Some(Err(e)) = session.try_update(|s| s.start_recording()) {
            alert(e.localized(language));
            return;
        }
        spawn_local(async move {
            let started = match media::open_microphone().await {
                Ok(stream) => Recorder::start(stream),
                Err(e) => Err(e),
            };
            match started {
                Ok(active) => recorder.set_value(Some(active)),
                Err(e) => {
                    tracing::warn!("microphone unavailable: {:?}", e);
                    session.update(|s| s.microphone_failed());
                }
            }
        });
    };

    let stop_recording = move || {
        let mut taken = None;
        recorder.update_value(|slot| taken = slot.take());
        let Some(active) = taken else {
            return;
        };
        session.update(|s| s.stop_recording());

        active.stop(move |clip| {
            let chat_id = session.with_untracked(|s| s.chat_id.clone());
            let client = api.get_value();
            spawn_local(async move {
                let result = match (clip, chat_id) {
                    (Ok(blob), Some(chat_id)) => client
                        .process_voice(&blob, language, &chat_id)
                        .await
                        .map_err(|e| e.to_string()),
                    (Ok(_), None) => Err(ValidationError::NoChatSession.to_string()),
                    (Err(e), _) => Err(format!("{:?}", e)),
                };
                let outcome = session.try_update(|s| s.finish_voice(result)).unwrap_or_default();
                settle(outcome);
            });
        });
    };

    let toggle_recording = move |_: leptos::ev::MouseEvent| {
        if session.with_untracked(|s| s.recorder.is_recording()) {
            stop_recording();
        } else {
            start_recording();
        }
    };

    // ========================================================================
    // Image
    // ========================================================================

    let send_image = move || {
        let file = image.get_untracked();
        let preview = file.as_ref().and_then(|f| media::object_url(f));
        match session.try_update(|s| s.begin_image(preview.clone())) {
            Some(Ok(())) => {
                if let Some(url) = preview {
                    previews.update_value(|urls| urls.push(url));
                }
            }
            Some(Err(e)) => {
                if let Some(url) = preview {
                    media::revoke_object_url(&url);
                }
                alert(e.localized(language));
                return;
            }
            None => return,
        }
        let (Some(file), Some(chat_id)) = (file, session.with_untracked(|s| s.chat_id.clone())) else {
            return;
        };
        image.set(None);
        if let Some(input) = image_ref.get_untracked() {
            input.set_value("");
        }

        let client = api.get_value();
        let need_audio = read_aloud.get_untracked();
        spawn_local(async move {
            let result = client
                .process_image(&file, &file.name(), language, need_audio, &chat_id)
                .await
                .map_err(|e| e.to_string());
            let outcome = session.try_update(|s| s.finish_image(result)).unwrap_or_default();
            settle(outcome);
        });
    };

    let switch_tab = move |tab: InputTab| {
        if tab != InputTab::Voice {
            cancel_recording();
            session.update(|s| {
                if s.recorder.is_recording() {
                    s.recorder = RecorderState::Idle;
                }
            });
        }
        session.update(|s| s.tab = tab);
    };

    // ========================================================================
    // Lifecycle
    // ========================================================================

    // A bare /chat visit gets a fresh chat, greeted and written back to the URL
    if session.with_untracked(|s| s.chat_id.is_none()) {
        let navigate = use_navigate();
        let client = api.get_value();
        creating.set(true);
        spawn_local(async move {
            match client.create_chat(language).await {
                Ok(id) => {
                    tracing::info!(chat_id = %id, "chat created for this visit");
                    let href = chat_href(&id, language);
                    session.update(|s| s.adopt(id));
                    navigate(
                        &href,
                        NavigateOptions {
                            replace: true,
                            ..NavigateOptions::default()
                        },
                    );
                }
                Err(e) => {
                    tracing::error!("creating chat failed: {}", e);
                    alert(language.t(Text::CreateChatFailed));
                }
            }
            creating.set(false);
            reload_history();
        });
    } else {
        reload_history();
    }

    on_cleanup(move || {
        cancel_recording();
        previews.update_value(|urls| {
            for url in urls.drain(..) {
                media::revoke_object_url(&url);
            }
        });
    });

    Effect::new(move |_| {
        session.with(|s| (s.bubbles().len(), s.is_typing()));
        if let Some(el) = messages_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let tab = Memo::new(move |_| session.with(|s| s.tab));
    let bubbles = move || session.with(|s| s.bubbles().to_vec());
    let history = move || session.with(|s| s.history().to_vec());

    view! {
        <div class="chat-page" class:voice-active=move || tab.get() == InputTab::Voice>
            <aside class="chat-history">
                <div class="chat-history-header">
                    <h2>{language.t(Text::ChatHistoryTitle)}</h2>
                    <button id="newChatButton" disabled=move || creating.get() on:click=move |_| new_chat()>
                        {move || if creating.get() {
                            language.t(Text::CreatingChat)
                        } else {
                            language.t(Text::NewChat)
                        }}
                    </button>
                </div>
                <ul class="chat-history-list">
                    <For
                        each=history
                        key=|entry| (entry.id.to_string(), entry.preview.clone(), entry.active)
                        children=move |entry| view! {
                            <HistoryItem entry=entry on_delete=Callback::new(move |id| delete_chat(id)) />
                        }
                    />
                </ul>
            </aside>

            <section class="chat-main">
                <header class="chat-toolbar">
                    <LanguageSelect language=language chat_id=session.with_untracked(|s| s.chat_id.clone()) />
                </header>

                <div class="chat-messages" id="chatMessages" node_ref=messages_ref>
                    <For each=bubbles key=|bubble| bubble.id children=|bubble| view! { <Bubble bubble=bubble /> } />
                    <Show when=move || session.with(|s| s.is_typing())>
                        <div class="typing-indicator" id="typingIndicator">
                            <span></span><span></span><span></span>
                        </div>
                    </Show>
                </div>

                <Show when=move || celebrate.get()>
                    <div class="celebration" aria-hidden="true"></div>
                </Show>

                <nav class="input-tabs">
                    {InputTab::ALL
                        .into_iter()
                        .map(move |t| view! {
                            <button
                                class="input-tab"
                                class:active=move || tab.get() == t
                                on:click=move |_| switch_tab(t)
                            >
                                {t.label(language)}
                            </button>
                        })
                        .collect_view()}
                </nav>

                <div class="input-panel" style:display=move || if tab.get() == InputTab::Text { "" } else { "none" }>
                    <input
                        type="text"
                        id="messageInput"
                        placeholder=language.t(Text::TypeMessage)
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                        on:keydown=move |ev: KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                send_text();
                            }
                        }
                    />
                    <button on:click=move |_| send_text()>{language.t(Text::Send)}</button>
                </div>

                <div class="input-panel" style:display=move || if tab.get() == InputTab::Voice { "" } else { "none" }>
                    <button
                        id="recordButton"
                        class:recording=move || session.with(|s| s.recorder.is_recording())
                        on:click=toggle_recording
                    >
                        "🎤"
                    </button>
                    <p id="recordStatus">{move || session.with(|s| s.recorder.status(language))}</p>
                </div>

                <div class="input-panel" style:display=move || if tab.get() == InputTab::Image { "" } else { "none" }>
                    <input
                        type="file"
                        id="imageInput"
                        accept="image/*"
                        node_ref=image_ref
                        on:change=move |ev| {
                            let file = ev
                                .target()
                                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                                .and_then(|input| input.files())
                                .and_then(|files| files.get(0));
                            image.set(file);
                        }
                    />
                    <label class="read-aloud">
                        <input
                            type="checkbox"
                            id="readAloud"
                            prop:checked=move || read_aloud.get()
                            on:change=move |ev| read_aloud.set(event_target_checked(&ev))
                        />
                        {language.t(Text::ReadAloud)}
                    </label>
                    <button on:click=move |_| send_image()>{language.t(Text::AnalyzeImage)}</button>
                </div>
            </section>
        </div>
    }
}

#[component]
fn Bubble(bubble: ChatBubble) -> impl IntoView {
    let class = if bubble.is_user() { "message user-message" } else { "message bot-message" };

    view! {
        <div class=class>
            <div class="message-content" inner_html=bubble.html></div>
            {bubble.image_url.map(|src| view! { <img class="message-image" src=src alt="Uploaded plant" /> })}
            <span class="message-time">{bubble.time}</span>
        </div>
    }
}

#[component]
fn HistoryItem(entry: HistoryEntry, on_delete: Callback<ChatId>) -> impl IntoView {
    let href = entry.href();
    let id = entry.id.clone();

    view! {
        <li class="chat-history-item" class:active=entry.active>
            // a full page load, so the next chat starts from a fresh session
            <a href=href rel="external">
                <span class="chat-title">{entry.title}</span>
                <span class="chat-meta">{entry.created} " · " {entry.language}</span>
                <span class="chat-preview">{entry.preview}</span>
            </a>
            <button class="delete-chat-btn" on:click=move |ev| {
                ev.stop_propagation();
                on_delete.run(id.clone());
            }>
                "🗑"
            </button>
        </li>
    }
}

/// Switching language reloads the page with the same chat
#[component]
fn LanguageSelect(language: Language, chat_id: Option<ChatId>) -> impl IntoView {
    let on_change = move |ev: leptos::ev::Event| {
        let chosen = Language::from_query(Some(&event_target_value(&ev)));
        let href = match &chat_id {
            Some(id) => chat_href(id, chosen),
            None => format!("/chat?language={}", chosen.as_str()),
        };
        navigate_to(&href);
    };

    view! {
        <select id="languageSelector" on:change=on_change>
            {[Language::English, Language::Hindi]
                .into_iter()
                .map(|lang| view! {
                    <option value=lang.as_str() selected={lang == language}>
                        {match lang {
                            Language::English => "English",
                            Language::Hindi => "हिंदी",
                        }}
                    </option>
                })
                .collect_view()}
        </select>
    }
}
