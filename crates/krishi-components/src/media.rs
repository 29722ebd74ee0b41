//! Camera, microphone and audio playback over `web-sys`

use js_sys::{Array, Object, Promise, Reflect};
use krishi_core::FacingMode;
use leptos::prelude::window;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, CanvasRenderingContext2d, HtmlAudioElement,
    HtmlCanvasElement, HtmlVideoElement, MediaRecorder, MediaStream, MediaStreamConstraints,
    MediaStreamTrack, Url,
};

/// MIME type of recorded voice clips
pub const AUDIO_MIME: &str = "audio/webm";
/// MIME type of captured photos
pub const PHOTO_MIME: &str = "image/jpeg";

// ============================================================================
// STREAMS
// ============================================================================

async fn user_media(constraints: &MediaStreamConstraints) -> Result<MediaStream, JsValue> {
    let devices = window().navigator().media_devices()?;
    let promise = devices.get_user_media_with_constraints(constraints)?;
    let stream = JsFuture::from(promise).await?;
    stream.dyn_into::<MediaStream>()
}

/// Camera stream with the given facing mode
pub async fn open_camera(facing: FacingMode) -> Result<MediaStream, JsValue> {
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &facing.as_str().into())?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);
    constraints.set_audio(&JsValue::FALSE);
    user_media(&constraints).await
}

pub async fn open_microphone() -> Result<MediaStream, JsValue> {
    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    user_media(&constraints).await
}

/// Stop every track so the device indicator turns off
pub fn stop_stream(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Current video frame as a JPEG blob
pub async fn capture_frame(video: &HtmlVideoElement) -> Result<Blob, JsValue> {
    let canvas = window()
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    context.draw_image_with_html_video_element(video, 0.0, 0.0)?;

    let mut failure = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) = canvas.to_blob_with_type(&resolve, PHOTO_MIME) {
            failure = Some(e);
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }
    JsFuture::from(promise).await?.dyn_into::<Blob>()
}

// ============================================================================
// RECORDER
// ============================================================================

/// Voice recording in progress; chunks accumulate until `stop`
pub struct Recorder {
    recorder: MediaRecorder,
    stream: MediaStream,
    chunks: Rc<RefCell<Vec<Blob>>>,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
}

impl Recorder {
    pub fn start(stream: MediaStream) -> Result<Self, JsValue> {
        let recorder = MediaRecorder::new_with_media_stream(&stream)?;
        let chunks = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&chunks);
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                sink.borrow_mut().push(blob);
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.start()?;
        tracing::debug!("voice recording started");

        Ok(Self {
            recorder,
            stream,
            chunks,
            _on_data: on_data,
        })
    }

    /// Stop recording and hand the assembled clip to `done`
    pub fn stop(self, done: impl FnOnce(Result<Blob, JsValue>) + 'static) {
        let Self {
            recorder,
            stream,
            chunks,
            _on_data,
        } = self;

        let on_stop = Closure::once_into_js(move || {
            // keeps the data handler alive until the last chunk arrives
            drop(_on_data);
            stop_stream(&stream);
            done(assemble(&chunks.borrow()));
        });
        recorder.set_onstop(Some(on_stop.unchecked_ref()));

        if let Err(e) = recorder.stop() {
            tracing::warn!("stopping recorder failed: {:?}", e);
        }
    }

    /// Abandon the recording without producing a clip
    pub fn cancel(self) {
        self.recorder.set_ondataavailable(None);
        if let Err(e) = self.recorder.stop() {
            tracing::debug!("recorder already inactive: {:?}", e);
        }
        stop_stream(&self.stream);
    }
}

fn assemble(chunks: &[Blob]) -> Result<Blob, JsValue> {
    let parts = chunks.iter().collect::<Array>();
    let options = BlobPropertyBag::new();
    options.set_type(AUDIO_MIME);
    Blob::new_with_blob_sequence_and_options(&parts, &options)
}

// ============================================================================
// URLS AND PLAYBACK
// ============================================================================

/// Local URL for previewing a blob
pub fn object_url(blob: &Blob) -> Option<String> {
    Url::create_object_url_with_blob(blob)
        .inspect_err(|e| tracing::warn!("object URL failed: {:?}", e))
        .ok()
}

pub fn revoke_object_url(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        tracing::debug!("revoking object URL failed: {:?}", e);
    }
}

/// Play a reply clip; autoplay refusals are logged
pub fn play_audio(url: &str) {
    match HtmlAudioElement::new_with_src(url).and_then(|audio| audio.play()) {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    tracing::warn!("audio playback refused: {:?}", e);
                }
            });
        }
        Err(e) => tracing::warn!("audio playback failed: {:?}", e),
    }
}
