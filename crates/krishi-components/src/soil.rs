//! Soil-report analyser: upload or photograph a report, fill in a missing
//! location, then browse crops, fertilizer advice and crop varieties.

use crate::media::{self, PHOTO_MIME};
use crate::{alert, use_api, use_query_language};
use gloo_timers::callback::Interval;
use krishi_core::{
    CAPTURED_IMAGE_NAME, CropVarieties, CropVariety, FacingMode, ReportKind, SoilAnalysis, Text,
    format_message,
};
use krishi_state::{
    CAROUSEL_INTERVAL_MS, Carousel, SelectedReport, SoilFlow, SoilStage, TransitionError,
    soil::Submission, use_app_state,
};
use leptos::ev;
use leptos::html::Video;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, HtmlInputElement, MediaStream};

/// Report file types the picker offers
const REPORT_ACCEPT: &str = ".pdf,.doc,.docx,.xls,.xlsx,image/*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Upload,
    Camera,
}

#[component]
pub fn SoilReportPage() -> impl IntoView {
    use_query_language();
    let state = use_app_state();
    let language = state.language;
    let api = StoredValue::new(use_api());

    let flow = RwSignal::new_local(SoilFlow::<Blob>::new());
    let preview = RwSignal::new(None::<String>);
    let source = RwSignal::new(Source::Upload);
    let facing = RwSignal::new(FacingMode::default());
    let camera = StoredValue::new_local(None::<MediaStream>);
    let video_ref = NodeRef::<Video>::new();
    let district = RwSignal::new(String::new());
    let region = RwSignal::new(String::new());

    let stage = Memo::new(move |_| flow.with(|f| f.stage()));

    // ========================================================================
    // Camera and selection
    // ========================================================================

    let stop_camera = move || {
        camera.update_value(|slot| {
            if let Some(stream) = slot.take() {
                media::stop_stream(&stream);
            }
        });
        if let Some(video) = video_ref.get_untracked() {
            video.set_src_object(None);
        }
    };

    let start_camera = move || {
        stop_camera();
        let mode = facing.get_untracked();
        spawn_local(async move {
            match media::open_camera(mode).await {
                Ok(stream) => {
                    if let Some(video) = video_ref.get_untracked() {
                        video.set_src_object(Some(&stream));
                    }
                    camera.set_value(Some(stream));
                }
                Err(e) => {
                    tracing::warn!("camera unavailable: {:?}", e);
                    alert(language.get_untracked().t(Text::CameraDenied));
                }
            }
        });
    };

    let set_preview = move |url: Option<String>| {
        preview.update(|current| {
            if let Some(old) = current.take() {
                media::revoke_object_url(&old);
            }
            *current = url;
        });
    };

    let report_error = move |e: TransitionError| match e {
        TransitionError::Validation(v) => alert(v.localized(language.get_untracked())),
        other => tracing::warn!("ignored soil flow event: {}", other),
    };

    let choose = move |report: SelectedReport<Blob>| {
        let url = match report.kind {
            ReportKind::Image => media::object_url(&report.report),
            _ => None,
        };
        match flow.try_update(|f| f.select(report)) {
            Some(Ok(())) => set_preview(url),
            Some(Err(e)) => {
                if let Some(url) = url {
                    media::revoke_object_url(&url);
                }
                report_error(e);
            }
            None => {}
        }
    };

    let on_file = move |event: ev::Event| {
        let input = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
        let Some(file) = input.as_ref().and_then(|i| i.files()).and_then(|files| files.get(0)) else {
            return;
        };
        let (name, mime, size) = (file.name(), file.type_(), file.size());
        choose(SelectedReport::new(Blob::from(file), name, &mime, size));
        if let Some(input) = input {
            input.set_value("");
        }
    };

    let capture = move || {
        let Some(video) = video_ref.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match media::capture_frame(&video).await {
                Ok(blob) => {
                    stop_camera();
                    let size = blob.size();
                    choose(SelectedReport::new(blob, CAPTURED_IMAGE_NAME, PHOTO_MIME, size));
                }
                Err(e) => tracing::error!("capturing photo failed: {:?}", e),
            }
        });
    };

    let discard = move || {
        if let Some(Err(e)) = flow.try_update(|f| f.clear_selection()) {
            report_error(e);
            return;
        }
        set_preview(None);
        if source.get_untracked() == Source::Camera {
            start_camera();
        }
    };

    let switch_source = move |next: Source| {
        if source.get_untracked() == next {
            return;
        }
        source.set(next);
        match next {
            Source::Camera if stage.get_untracked() == SoilStage::Idle => start_camera(),
            Source::Camera => {}
            Source::Upload => stop_camera(),
        }
    };

    let flip_camera = move || {
        facing.update(|f| *f = f.flip());
        start_camera();
    };

    // ========================================================================
    // Submission
    // ========================================================================

    let send = move |submission: Submission<Blob>| {
        let client = api.get_value();
        spawn_local(async move {
            let result = match &submission {
                Submission::Upload(req) => {
                    client
                        .analyze_soil_report(&req.report, &req.file_name, &req.district, &req.state, req.language)
                        .await
                }
                Submission::Complete(req) => client.complete_soil_analysis(req).await,
            };

            match result {
                Ok(analysis) => match flow.try_update(|f| f.receive(analysis)) {
                    Some(Ok(SoilStage::Complete)) => {
                        tracing::info!("soil analysis complete");
                        stop_camera();
                    }
                    Some(Ok(SoilStage::Selected)) => {
                        let message = flow
                            .with_untracked(|f| f.error().map(str::to_string))
                            .unwrap_or_else(|| language.get_untracked().t(Text::SoilProcessFailed).to_string());
                        alert(&message);
                    }
                    Some(Ok(_)) | None => {}
                    Some(Err(e)) => report_error(e),
                },
                Err(e) => {
                    tracing::error!("soil analysis failed: {}", e);
                    let message = e.to_string();
                    flow.update(|f| {
                        if let Err(e) = f.fail(message.clone()) {
                            tracing::warn!("soil flow could not record failure: {}", e);
                        }
                    });
                    alert(&message);
                }
            }
        });
    };

    let process = move || {
        let lang = language.get_untracked();
        match flow.try_update(|f| f.submit(lang)) {
            Some(Ok(request)) => send(Submission::Upload(request)),
            Some(Err(e)) => report_error(e),
            None => {}
        }
    };

    let submit_location = move || {
        let lang = language.get_untracked();
        let (d, s) = (district.get_untracked(), region.get_untracked());
        match flow.try_update(|f| f.supply_location(&d, &s, lang)) {
            Some(Ok(submission)) => send(submission),
            Some(Err(e)) => report_error(e),
            None => {}
        }
    };

    let dismiss_location = move || {
        if stage.get_untracked() == SoilStage::AwaitingLocation {
            flow.update(|f| {
                if let Err(e) = f.dismiss_location() {
                    tracing::warn!("location prompt not dismissed: {}", e);
                }
            });
        }
    };

    let new_analysis = Callback::new(move |()| {
        flow.update(|f| {
            if let Err(e) = f.reset() {
                tracing::warn!("soil flow reset refused: {}", e);
            }
        });
        set_preview(None);
        district.set(String::new());
        region.set(String::new());
        stop_camera();
        source.set(Source::Upload);
    });

    // ========================================================================
    // Lifecycle
    // ========================================================================

    let escape = window_event_listener(ev::keydown, move |e| {
        if e.key() == "Escape" {
            dismiss_location();
        }
    });
    on_cleanup(move || {
        escape.remove();
        stop_camera();
        set_preview(None);
    });

    let t = move |text: Text| move || language.get().t(text);
    let prompt = move || flow.with(|f| f.location_prompt());

    view! {
        <div class="soil-page">
            <header class="soil-header">
                <h1>{t(Text::PageTitle)}</h1>
                <p>{t(Text::PageDescription)}</p>
                <button class="lang-toggle" on:click=move |_| state.toggle_language()>
                    {move || language.get().toggle_label()}
                </button>
            </header>

            <Show
                when=move || stage.get() != SoilStage::Complete
                fallback=move || {
                    flow.with(|f| f.analysis().cloned()).map(|analysis| view! {
                        <SoilResults analysis=analysis on_reset=new_analysis />
                    })
                }
            >
                <section class="upload-card">
                    <h2>{t(Text::UploadTitle)}</h2>
                    <p>{t(Text::UploadInstructions)}</p>

                    <nav class="source-tabs">
                        <button
                            class:active=move || source.get() == Source::Upload
                            on:click=move |_| switch_source(Source::Upload)
                        >
                            {t(Text::UploadTab)}
                        </button>
                        <button
                            class:active=move || source.get() == Source::Camera
                            on:click=move |_| switch_source(Source::Camera)
                        >
                            {t(Text::CameraTab)}
                        </button>
                    </nav>

                    <Show when=move || stage.get() == SoilStage::Idle>
                        <div class="upload-section" style:display=move || if source.get() == Source::Upload { "" } else { "none" }>
                            <label class="drop-zone">
                                <input type="file" accept=REPORT_ACCEPT on:change=on_file />
                                <span>{t(Text::UploadHint)}</span>
                            </label>
                        </div>
                    </Show>

                    <div class="camera-section" style:display=move || {
                        if source.get() == Source::Camera && stage.get() == SoilStage::Idle { "" } else { "none" }
                    }>
                        <video node_ref=video_ref autoplay=true playsinline=true muted=true></video>
                        <div class="camera-controls">
                            <button on:click=move |_| capture()>{t(Text::Capture)}</button>
                            <button on:click=move |_| flip_camera()>{t(Text::SwitchCamera)}</button>
                        </div>
                    </div>

                    {move || flow.with(|f| f.selection().map(|s| (s.file_name.clone(), s.kind))).map(|(name, kind)| {
                        view! {
                            <div class="report-preview">
                                {match (kind, preview.get()) {
                                    (ReportKind::Image, Some(url)) => view! { <img class="preview-image" src=url alt=name.clone() /> }.into_any(),
                                    _ => view! { <img class="preview-icon" src=kind.icon().unwrap_or_default() alt="" /> }.into_any(),
                                }}
                                <span class="preview-name">{name}</span>
                                <button class="preview-discard" on:click=move |_| discard()>
                                    {move || if source.get() == Source::Camera { language.get().t(Text::Retake) } else { "×" }}
                                </button>
                            </div>
                        }
                    })}

                    <button
                        class="process-btn"
                        disabled=move || stage.get() == SoilStage::Submitting
                        on:click=move |_| process()
                    >
                        {t(Text::Process)}
                    </button>
                </section>
            </Show>

            <Show when=move || stage.get() == SoilStage::Submitting>
                <div class="loading-overlay">
                    <div class="loading-box">
                        <div class="spinner"></div>
                        <p>{t(Text::Processing)}</p>
                        <p class="muted">{t(Text::PleaseWait)}</p>
                    </div>
                </div>
            </Show>

            {move || prompt().map(move |ask| view! {
                <div class="modal-backdrop" on:click=move |_| dismiss_location()>
                    <div class="modal" on:click=|e| e.stop_propagation()>
                        <h3>{t(Text::LocationModalTitle)}</h3>
                        <p>{t(Text::LocationModalDesc)}</p>
                        {ask.ask_district.then(move || view! {
                            <label>
                                {t(Text::DistrictLabel)}
                                <input type="text" prop:value=move || district.get() on:input=move |e| district.set(event_target_value(&e)) />
                            </label>
                        })}
                        {ask.ask_state.then(move || view! {
                            <label>
                                {t(Text::StateLabel)}
                                <input type="text" prop:value=move || region.get() on:input=move |e| region.set(event_target_value(&e)) />
                            </label>
                        })}
                        <button on:click=move |_| submit_location()>{t(Text::Submit)}</button>
                    </div>
                </div>
            })}
        </div>
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[component]
fn SoilResults(analysis: SoilAnalysis, on_reset: Callback<()>) -> impl IntoView {
    let language = use_app_state().language;
    let t = move |text: Text| move || language.get().t(text);
    let report_href = analysis.fertilizer_report_href();
    let params = analysis.soil_params.clone();
    let location = analysis.location.clone();
    let crops = analysis.recommendations.crops.clone();
    let fertilizer = analysis.recommendations.fertilizer.clone().filter(|f| !f.trim().is_empty());
    let today = js_sys::Date::new_0().to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED);

    view! {
        <section class="soil-results">
            <header>
                <h2>{t(Text::ResultTitle)}</h2>
                <span id="resultDate">{String::from(today)}</span>
            </header>

            <div class="result-grid">
                <div class="result-card">
                    <h3>{t(Text::SoilParamsTitle)}</h3>
                    <dl>
                        {move || params.rows(language.get()).into_iter().map(|row| view! {
                            <dt>{row.label}</dt>
                            <dd>{row.value}</dd>
                        }).collect_view()}
                    </dl>
                </div>

                <div class="result-card">
                    <h3>{t(Text::LocationInfoTitle)}</h3>
                    <dl>
                        <dt>{t(Text::DistrictLabel)}</dt>
                        <dd id="districtValue">{location.district_label().to_string()}</dd>
                        <dt>{t(Text::StateLabel)}</dt>
                        <dd id="stateValue">{location.state_label().to_string()}</dd>
                    </dl>
                </div>
            </div>

            <div class="result-card">
                <h3>{t(Text::RecommendedCrops)}</h3>
                <div id="cropList" class="crop-list">
                    {crops.into_iter().enumerate().map(|(i, crop)| view! {
                        <div class="crop-item" class:primary-crop={i == 0}>
                            {if i == 0 { "★ " } else { "🌱 " }}
                            {crop}
                        </div>
                    }).collect_view()}
                </div>
            </div>

            <div class="result-card">
                <h3>{t(Text::FertilizerRecommendation)}</h3>
                {match fertilizer {
                    Some(text) => view! { <div class="fertilizer-text" inner_html=format_message(&text)></div> }.into_any(),
                    None => view! { <p class="muted">{t(Text::NoFertilizerRecommendation)}</p> }.into_any(),
                }}
                {report_href.map(|href| view! {
                    // served page carries the embedded report data
                    <a class="report-link" href=href rel="external">{t(Text::ViewFertilizerReport)}</a>
                })}
            </div>

            {analysis.crop_varieties.map(|varieties| view! { <VarietySection varieties=varieties /> })}

            <button class="new-analysis" on:click=move |_| on_reset.run(())>{t(Text::NewAnalysis)}</button>
        </section>
    }
}

#[component]
fn VarietySection(varieties: CropVarieties) -> impl IntoView {
    let language = use_app_state().language;

    if !varieties.has_varieties() {
        return view! {
            <div class="crop-varieties">
                <p class="varieties-notice">{varieties.not_found_notice()}</p>
            </div>
        }
        .into_any();
    }

    let heading = varieties.heading();
    view! {
        <div class="crop-varieties">
            <h3>{heading}</h3>
            <VarietyCarousel varieties=varieties.varieties />
            <p class="varieties-note">{move || language.get().t(Text::VarietiesNote)}</p>
        </div>
    }
    .into_any()
}

/// Auto-advancing slides; hovering pauses, manual moves restart the timer
#[component]
fn VarietyCarousel(varieties: Vec<CropVariety>) -> impl IntoView {
    let count = varieties.len();
    let carousel = RwSignal::new(Carousel::new(count));
    let timer = StoredValue::new_local(None::<Interval>);

    let restart = move || {
        let next = Interval::new(CAROUSEL_INTERVAL_MS, move || carousel.update(Carousel::tick));
        timer.set_value(Some(next));
    };
    restart();
    on_cleanup(move || {
        timer.update_value(|slot| {
            slot.take();
        });
    });

    let step = move |action: fn(&mut Carousel)| {
        carousel.update(action);
        restart();
    };

    view! {
        <div
            class="carousel"
            on:mouseenter=move |_| carousel.update(|c| c.set_paused(true))
            on:mouseleave=move |_| carousel.update(|c| c.set_paused(false))
        >
            <div class="carousel-viewport">
                <div
                    class="carousel-inner"
                    style:transform=move || format!("translateX(-{}%)", carousel.get().index() * 100)
                >
                    {varieties.into_iter().map(|variety| view! { <VarietyCard variety=variety /> }).collect_view()}
                </div>
            </div>
            <div class="carousel-controls">
                <button class="carousel-prev" disabled={count <= 1} on:click=move |_| step(Carousel::prev)>"←"</button>
                <div class="carousel-dots">
                    {(0..count).map(|i| view! {
                        <span
                            class="carousel-dot"
                            class:active=move || carousel.get().index() == i
                            on:click=move |_| {
                                carousel.update(|c| c.go_to(i));
                                restart();
                            }
                        ></span>
                    }).collect_view()}
                </div>
                <button class="carousel-next" disabled={count <= 1} on:click=move |_| step(Carousel::next)>"→"</button>
            </div>
        </div>
    }
}

#[component]
fn VarietyCard(variety: CropVariety) -> impl IntoView {
    let open = RwSignal::new(false);
    let details = variety.details();
    let schedule = variety.fertilizer.clone();

    view! {
        <div class="carousel-slide">
            <div class="variety-card">
                <h4>{variety.variety_name.clone()}</h4>
                <div class="variety-stats">
                    <span>"Yield: " {variety.yield_.clone()}</span>
                    <span>"Maturity: " {variety.maturity_days.clone()} " days"</span>
                </div>
                <p class="variety-traits">{variety.key_traits.clone()}</p>
                <button class="details-toggle" on:click=move |_| open.update(|o| *o = !*o)>
                    {move || if open.get() { "Hide details ▲" } else { "Show details ▼" }}
                </button>
                <div class="details-content" style:display=move || if open.get() { "block" } else { "none" }>
                    {details.into_iter().map(|(label, value)| view! {
                        <div class="details-item">
                            <div class="details-label">{label} ":"</div>
                            <div class="details-value">{value}</div>
                        </div>
                    }).collect_view()}
                    <div class="fertilizer-details">
                        <div class="details-item">
                            <div class="details-label">"Unirrigated:"</div>
                            <div class="details-value">{schedule.unirrigated}</div>
                        </div>
                        <div class="details-item">
                            <div class="details-label">"Irrigated (Early):"</div>
                            <div class="details-value">{schedule.irrigated_early}</div>
                        </div>
                        <div class="details-item">
                            <div class="details-label">"Irrigated (Late):"</div>
                            <div class="details-value">{schedule.irrigated_late}</div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
