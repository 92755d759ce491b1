use crate::{
    config::RenderConfig,
    foundation::error::PromoResult,
    pipeline::sequencer::{GifArtifact, render_gif},
    services::image_gen::{ImageGenerator, generate_image},
    services::prompt::{PromptTranslator, translate_and_enhance},
    services::resources::WorkerResources,
    style::request::StylingRequest,
    text::font::FontBook,
};

/// Step of one end-to-end generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStage {
    /// Translating the idea and enhancing it into an image prompt.
    Translating,
    /// Waiting for the still image.
    GeneratingImage,
    /// Rendering and encoding the GIF.
    Rendering,
    /// Finished.
    Done,
}

impl GenerationStage {
    /// Stages in execution order.
    pub const ALL: &'static [Self] = &[
        Self::Translating,
        Self::GeneratingImage,
        Self::Rendering,
        Self::Done,
    ];

    /// One-based step number.
    pub fn step(self) -> u8 {
        match self {
            Self::Translating => 1,
            Self::GeneratingImage => 2,
            Self::Rendering => 3,
            Self::Done => 4,
        }
    }

    /// Status line shown to the requester.
    pub fn message(self) -> &'static str {
        match self {
            Self::Translating => "1/4: 아이디어 번역 및 프롬프트 최적화 중...",
            Self::GeneratingImage => "2/4: AI 이미지 생성 중...",
            Self::Rendering => "3/4: GIF 파일 생성 및 렌더링 중...",
            Self::Done => "4/4: 완성!",
        }
    }
}

/// Receives stage transitions of [`generate_gif`].
pub trait ProgressObserver {
    /// Called when `stage` starts.
    fn on_stage(&mut self, stage: GenerationStage);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_stage(&mut self, _stage: GenerationStage) {}
}

/// External services used by [`generate_gif`].
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Idea translation.
    pub translator: &'a dyn PromptTranslator,
    /// Still image generation.
    pub generator: &'a dyn ImageGenerator,
    /// Encoder scratch resources.
    pub resources: &'a dyn WorkerResources,
}

fn enter(observer: &mut dyn ProgressObserver, stage: GenerationStage) {
    tracing::info!(step = stage.step(), stage = ?stage, "{}", stage.message());
    observer.on_stage(stage);
}

/// Turn an idea and a caption into a finished GIF.
///
/// Each stage fails fast; no stage is retried.
#[tracing::instrument(skip_all)]
pub fn generate_gif(
    request: &StylingRequest,
    collaborators: Collaborators<'_>,
    fonts: FontBook,
    config: &RenderConfig,
    observer: &mut dyn ProgressObserver,
) -> PromoResult<GifArtifact> {
    request.validate_for_generation()?;
    config.validate()?;

    enter(observer, GenerationStage::Translating);
    let prompt = translate_and_enhance(collaborators.translator, &request.image_idea)?;

    enter(observer, GenerationStage::GeneratingImage);
    let image_base64 = generate_image(collaborators.generator, &prompt)?;

    enter(observer, GenerationStage::Rendering);
    let artifact = render_gif(
        request,
        &image_base64,
        fonts,
        config,
        collaborators.resources,
    )?;

    enter(observer, GenerationStage::Done);
    Ok(artifact)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generate.rs"]
mod tests;
