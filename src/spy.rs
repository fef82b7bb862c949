//! Recording backend for unit tests.

use std::sync::{Mutex, PoisonError};

use crate::{
    backend::{Backend, BlitCommand, RenderCommands},
    error::PipelineError,
    frame_gate::FramePermit,
    surface::{PixelSize, SurfaceSettings},
};

/// Backend calls in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Configure(SurfaceSettings<u32>),
    ReleaseTexture,
    BuildPipeline(u32),
    NextDrawable,
    EncodeBlit,
    Finish(usize),
    WaitForPresentedFrames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpyTexture {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) sampleable: bool,
}

impl SpyTexture {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sampleable: true,
        }
    }

    /// A texture in a format the blit pipeline cannot sample.
    pub(crate) fn unsampleable(width: u32, height: u32) -> Self {
        Self {
            sampleable: false,
            ..Self::new(width, height)
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SpyRecorder {
    pub(crate) commands: Vec<String>,
    pub(crate) submitted: bool,
}

pub(crate) struct SpyPass<'p> {
    commands: &'p mut Vec<String>,
}

impl SpyPass<'_> {
    pub(crate) fn push(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }
}

#[derive(Debug)]
pub(crate) struct SpyFrame {
    pub(crate) drawable: usize,
    pub(crate) permit: FramePermit,
}

#[derive(Debug, Default)]
pub(crate) struct SpyExtra {
    pub(crate) invocations: usize,
}

impl RenderCommands<SpyBackend> for SpyExtra {
    fn record(&mut self, pass: &mut SpyPass<'_>) {
        self.invocations += 1;
        pass.push("extra");
    }
}

#[derive(Debug)]
pub(crate) struct SpyBackend {
    calls: Mutex<Vec<Call>>,
    settings: Option<SurfaceSettings<u32>>,
    next_drawable: usize,
    pub(crate) fail_pipeline: bool,
    pub(crate) drawables_available: bool,
    pub(crate) max_dimension: u32,
}

impl Default for SpyBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            settings: None,
            next_drawable: 0,
            fail_pipeline: false,
            drawables_available: true,
            max_dimension: u32::MAX,
        }
    }
}

impl SpyBackend {
    /// A backend whose pipeline builds always fail.
    pub(crate) fn failing() -> Self {
        Self {
            fail_pipeline: true,
            ..Self::default()
        }
    }

    fn log(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) fn last_settings(&self) -> SurfaceSettings<u32> {
        self.settings.unwrap()
    }
}

impl Backend for SpyBackend {
    type Texture = SpyTexture;
    type Format = u32;
    type Drawable = usize;
    type Recorder = SpyRecorder;
    type Pass<'p> = SpyPass<'p>;
    type Fence = u64;
    type Frame = SpyFrame;

    fn texture_size(&self, texture: &SpyTexture) -> PixelSize {
        PixelSize::new(texture.width, texture.height)
    }

    fn can_display(&self, texture: &SpyTexture) -> bool {
        texture.sampleable
    }

    fn release_texture(&mut self) {
        self.log(Call::ReleaseTexture);
    }

    fn max_surface_dimension(&self) -> u32 {
        self.max_dimension
    }

    fn configure(&mut self, settings: &SurfaceSettings<u32>) {
        self.log(Call::Configure(*settings));
        self.settings = Some(*settings);
    }

    fn build_pipeline(
        &mut self,
        settings: &SurfaceSettings<u32>,
    ) -> Result<(), PipelineError> {
        self.log(Call::BuildPipeline(settings.format));
        if self.fail_pipeline {
            return Err(PipelineError::Validation("spy failure".to_owned()));
        }
        Ok(())
    }

    fn next_drawable(&mut self) -> Option<usize> {
        self.log(Call::NextDrawable);
        if !self.drawables_available {
            return None;
        }
        let drawable = self.next_drawable;
        self.next_drawable += 1;
        Some(drawable)
    }

    fn encode_blit(
        &mut self,
        recorder: &mut SpyRecorder,
        _drawable: &usize,
        command: BlitCommand<'_, Self>,
        extra: Option<&mut dyn RenderCommands<Self>>,
    ) {
        self.log(Call::EncodeBlit);
        let mut pass = SpyPass {
            commands: &mut recorder.commands,
        };
        pass.push("begin_pass clear=transparent");
        if let Some(fence) = command.fence {
            pass.push(format!("wait_fence {fence}"));
        }
        pass.push("set_pipeline");
        pass.push(format!(
            "set_projection {} {}",
            command.scale.x, command.scale.y
        ));
        pass.push(format!(
            "bind_texture {}x{}",
            command.texture.width, command.texture.height
        ));
        pass.push("draw strip 0..4");
        if let Some(extra) = extra {
            extra.record(&mut pass);
        }
        pass.push("end_pass");
    }

    fn finish(&mut self, drawable: usize, permit: FramePermit) -> SpyFrame {
        self.log(Call::Finish(drawable));
        SpyFrame { drawable, permit }
    }

    fn wait_for_presented_frames(&mut self) {
        self.log(Call::WaitForPresentedFrames);
    }
}
