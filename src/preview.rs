//! Preview sessions: the live rendering views of the design.
//!
//! Each session owns its own clock, surface state and viewport. Nothing here
//! is process-wide, so the embedded preview and the preview window coexist.

use crate::element::Element;
use crate::error::{PreviewError, SurfaceError};
use crate::render::{self, FrameReport, Placement};
use crate::surface::DrawSurface;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rendering backends the host can be started with, in preference order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    Wgpu,
    Glow,
}

impl Backend {
    pub(crate) const ALL: [Backend; 2] = [Backend::Wgpu, Backend::Glow];

    pub fn renderer(&self) -> eframe::Renderer {
        match self {
            Backend::Wgpu => eframe::Renderer::Wgpu,
            Backend::Glow => eframe::Renderer::Glow,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Wgpu => "wgpu",
            Backend::Glow => "glow",
        })
    }
}

/// Tries each candidate in order; the first success wins.
/// If all fail, the error lists every attempt with its message.
pub(crate) fn launch_with_fallback<T, E: fmt::Display>(
    candidates: &[Backend],
    mut attempt: impl FnMut(Backend) -> Result<T, E>,
) -> Result<(Backend, T), PreviewError> {
    let mut attempts = Vec::new();
    for &backend in candidates {
        match attempt(backend) {
            Ok(value) => {
                info!(%backend, "rendering backend accepted");
                return Ok((backend, value));
            }
            Err(err) => {
                warn!(%backend, %err, "rendering backend failed");
                attempts.push((backend, err.to_string()));
            }
        }
    }
    Err(PreviewError::NoBackend { attempts })
}

/// Maps one launch result for [`launch_with_fallback`]. A failure before the
/// app started is retried on the next backend; once started, the result is final.
pub(crate) fn retry_unless_started<T, E>(
    started: bool,
    result: Result<T, E>,
) -> Result<Result<T, E>, E> {
    match result {
        Err(err) if !started => Err(err),
        other => Ok(other),
    }
}

/// Fixed-interval clock driving repaints while a preview is open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrameClock {
    interval: Duration,
    running: bool,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Delay until the next tick, or `None` once stopped.
    pub fn next_tick(&self) -> Option<Duration> {
        self.is_running().then_some(self.interval)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TeardownStep {
    StopClock,
    ReleaseSurface,
    CloseViewport,
}

impl TeardownStep {
    pub(crate) const ORDER: [TeardownStep; 3] = [
        TeardownStep::StopClock,
        TeardownStep::ReleaseSurface,
        TeardownStep::CloseViewport,
    ];
}

/// Per-session surface bookkeeping.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SurfaceState {
    pub(crate) frames: u64,
    pub(crate) failures: u64,
    pub(crate) last_error: Option<SurfaceError>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TickOutcome {
    Rendered(FrameReport),
    /// The frame was dropped; the next tick tries again.
    Failed(SurfaceError),
    Closed,
}

pub(crate) struct PreviewSession {
    name: &'static str,
    clock: FrameClock,
    surface: Option<SurfaceState>,
    viewport: Option<egui::ViewportId>,
    completed: Vec<TeardownStep>,
}

impl PreviewSession {
    /// A session drawn into the main window.
    pub fn embedded(interval: Duration) -> Self {
        Self::open("embedded preview", interval, None)
    }

    /// A session in its own native viewport.
    pub fn window(interval: Duration) -> Self {
        Self::open(
            "preview window",
            interval,
            Some(egui::ViewportId::from_hash_of("imgui_preview")),
        )
    }

    fn open(name: &'static str, interval: Duration, viewport: Option<egui::ViewportId>) -> Self {
        info!(session = name, ?interval, "preview opened");
        Self {
            name,
            clock: FrameClock::new(interval),
            surface: Some(SurfaceState::default()),
            viewport,
            completed: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_some()
    }

    pub fn viewport(&self) -> Option<egui::ViewportId> {
        self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn state(&self) -> Option<&SurfaceState> {
        self.surface.as_ref()
    }

    /// Steps completed so far, in the order they ran.
    #[cfg(test)]
    pub fn teardown_log(&self) -> &[TeardownStep] {
        &self.completed
    }

    /// Renders one frame of `elements`. Failures are recorded, never propagated.
    pub fn tick<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        elements: &[Element],
        placement: Placement,
    ) -> TickOutcome {
        let name = self.name;
        let Some(state) = self.surface.as_mut() else {
            return TickOutcome::Closed;
        };
        state.frames += 1;
        match render::render_frame(surface, elements, placement) {
            Ok(report) => {
                if state.last_error.take().is_some() {
                    info!(session = name, frame = state.frames, "preview recovered");
                }
                TickOutcome::Rendered(report)
            }
            Err(err) => {
                state.failures += 1;
                warn!(session = name, frame = state.frames, %err, "preview frame failed");
                state.last_error = Some(err.clone());
                TickOutcome::Failed(err)
            }
        }
    }

    /// Releases everything in fixed order. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.completed.is_empty() {
            return;
        }
        for step in TeardownStep::ORDER {
            match step {
                TeardownStep::StopClock => self.clock.stop(),
                TeardownStep::ReleaseSurface => {
                    if let Some(state) = self.surface.take() {
                        debug!(
                            session = self.name,
                            frames = state.frames,
                            failures = state.failures,
                            "surface released"
                        );
                    }
                }
                TeardownStep::CloseViewport => self.viewport = None,
            }
            debug!(session = self.name, ?step, "teardown step done");
            self.completed.push(step);
        }
        info!(session = self.name, "preview closed");
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Result of a failed tick as a one-line status message.
pub(crate) fn describe_failure(err: &SurfaceError) -> String {
    PreviewError::from(err.clone()).to_string()
}
