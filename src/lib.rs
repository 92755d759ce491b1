//! Promogif turns a still image and a promotional caption into a short animated GIF.
//!
//! A render is a pure function of a [`StylingRequest`], a [`RenderConfig`] and a decoded still:
//!
//! - [`TimingPlan`] splits the loop into pre-text, text-animation and post-text phases
//! - [`Evaluator`] maps each frame index to its animation state
//! - [`compile_frame`] turns that state into a [`FramePlan`] of draw ops
//! - a [`FrameBackend`] rasterizes the plan, and a [`FrameSink`] encodes the frames in order
//!
//! [`generate_gif`] wraps the render with the external translation and image-generation
//! collaborators.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;

pub(crate) mod compile;
pub(crate) mod encode;
pub(crate) mod eval;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod services;
pub(crate) mod style;
pub(crate) mod text;
pub(crate) mod timing;

pub use crate::foundation::core::{
    Affine, Canvas, FrameIndex, Point, Rect, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{PromoError, PromoResult};

pub use crate::assets::decode::{
    PreparedImage, decode_base64_image, decode_image, load_image_file,
};
pub use crate::compile::plan::{
    BORDER_WIDTH_PX, BackgroundOp, BorderOp, DrawOp, FramePlan, STROBE_DASH, Shadow, TextLine,
    TextOp, compile_frame,
};
pub use crate::config::{RenderConfig, WORKERS_ENV};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{
    AbortHandle, EncodeOutcome, EncodedGif, FrameSink, InMemorySink, SinkConfig,
};
pub use crate::eval::anim::{TextAnimState, centered_crop, ken_burns_scale};
pub use crate::eval::evaluator::{
    BorderState, DEFAULT_ZOOM_FACTOR, EvalContext, Evaluator, FrameState, rainbow_color,
};
pub use crate::pipeline::generate::{
    Collaborators, GenerationStage, NoopObserver, ProgressObserver, generate_gif,
};
pub use crate::pipeline::sequencer::{
    GifArtifact, render_frame, render_gif, render_gif_with_abort, render_still_frame, run_frames,
};
pub use crate::render::backend::{FrameBackend, FrameRGBA, execute_plan};
pub use crate::render::cpu::CpuBackend;
pub use crate::services::image_gen::{
    FileImageGenerator, GeneratedImage, GenerationParams, ImageGenerator, generate_image,
};
pub use crate::services::prompt::{
    IMAGE_STYLE_KEYWORDS, IdentityTranslator, PromptTranslator, enhance_prompt,
    translate_and_enhance,
};
pub use crate::services::resources::{
    ResourceGuard, ResourceHandle, ScratchFiles, WorkerResources,
};
pub use crate::style::options::{
    BackgroundEffect, BorderEffect, FONTS, FontOption, Layout, TextAnimation, TextSize,
};
pub use crate::style::request::StylingRequest;
pub use crate::text::font::{FontBook, parse_family_list};
pub use crate::text::layout::{BlockPlacement, LINE_HEIGHT_RATIO, TextAlign, place_block};
pub use crate::text::wrap::{MAX_LINE_WIDTH_RATIO, MonospaceMeasure, TextMeasure, wrap_words};
pub use crate::timing::plan::{Phase, TimingPlan, frame_count};
