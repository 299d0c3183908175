// This is free and unencumbered software released into the public domain.

//! Camera state kept around the preview geometry.
//!
//! The controller owns no platform resources. Everything that touches the
//! device, the capture session or the surface goes through [`CameraHost`],
//! and the active lens is remembered as an index into the capability table.

use crate::shared::{
    CameraCapabilities, ControllerConfig, Dimensions, LensCapabilities, LensFacing,
    PreviewError, PreviewGeometry, PreviewResult, Rotation, resolve_preview_geometry,
};
use derive_more::Display;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum FlashMode {
    /// The active lens has no flash unit.
    #[display("none")]
    None,
    #[default]
    #[display("off")]
    Off,
    #[display("auto")]
    Auto,
    #[display("on")]
    On,
    #[display("torch")]
    Torch,
}

impl FlashMode {
    pub const SELECTABLE: [FlashMode; 4] = [Self::Off, Self::Auto, Self::On, Self::Torch];

    #[inline]
    pub fn is_torch(&self) -> bool {
        matches!(self, Self::Torch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureRequest {
    pub flash_mode: FlashMode,
    pub rotation: Rotation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerEvent {
    CameraCountAvailable(usize),
    Bound { lens: usize, facing: LensFacing },
    Unbound,
    FlashModeChanged(FlashMode),
    FocusChanged { x: f32, y: f32 },
    FocusReset,
    ZoomRatioChanged(f32),
    LinearZoomChanged(f32),
    GeometryChanged(PreviewGeometry),
}

/// The platform side of the camera: device, session and surface.
pub trait CameraHost {
    fn unbind_all(&mut self);

    fn bind(&mut self, lens: &LensCapabilities) -> PreviewResult<()>;

    fn configure_preview(&mut self, geometry: &PreviewGeometry) -> PreviewResult<()>;

    /// Applies the still-capture flash mode. The torch is lit only for
    /// [`FlashMode::Torch`].
    fn set_flash_mode(&mut self, mode: FlashMode) -> PreviewResult<()>;

    fn set_zoom_ratio(&mut self, ratio: f32) -> PreviewResult<()>;

    fn start_focus_and_metering(&mut self, x: f32, y: f32) -> PreviewResult<()>;

    fn set_target_rotation(&mut self, _rotation: Rotation) {}

    fn capture(&mut self, request: CaptureRequest) -> PreviewResult<()>;
}

pub struct CameraController<H: CameraHost> {
    host: H,
    config: ControllerConfig,
    capabilities: CameraCapabilities,
    active: Option<usize>,
    prefer_front: bool,
    flash_mode: FlashMode,
    flash_modes: Vec<FlashMode>,
    zoom_ratio: f32,
    rotation: Rotation,
    viewport: Option<Dimensions>,
    geometry: Option<PreviewGeometry>,
    focus: Option<(f32, f32)>,
    scaling: bool,
    events_tx: SyncSender<ControllerEvent>,
    events_rx: Receiver<ControllerEvent>,
}

impl<H: CameraHost> CameraController<H> {
    pub fn new(host: H, config: ControllerConfig) -> PreviewResult<Self> {
        config.validate()?;
        let (events_tx, events_rx) = sync_channel(config.event_capacity);
        Ok(Self {
            host,
            prefer_front: config.prefer_front,
            flash_mode: config.flash_mode,
            rotation: config.rotation,
            config,
            capabilities: CameraCapabilities::default(),
            active: None,
            flash_modes: FlashMode::SELECTABLE.to_vec(),
            zoom_ratio: 1.0,
            viewport: None,
            geometry: None,
            focus: None,
            scaling: false,
            events_tx,
            events_rx,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn events(&self) -> &Receiver<ControllerEvent> {
        &self.events_rx
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn active_lens(&self) -> Option<&LensCapabilities> {
        self.active.and_then(|i| self.capabilities.lens(i))
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    pub fn zoom_ratio(&self) -> f32 {
        self.zoom_ratio
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn geometry(&self) -> Option<&PreviewGeometry> {
        self.geometry.as_ref()
    }

    pub fn focus_point(&self) -> Option<(f32, f32)> {
        self.focus
    }

    pub fn is_front_camera_preferred(&self) -> bool {
        self.prefer_front
    }

    /// Takes effect on the next bind.
    pub fn set_front_camera_preferred(&mut self, prefer_front: bool) {
        self.prefer_front = prefer_front;
    }

    pub fn is_tap_to_focus_enabled(&self) -> bool {
        self.config.tap_to_focus
    }

    pub fn set_tap_to_focus(&mut self, enabled: bool) -> PreviewResult<()> {
        self.config.tap_to_focus = enabled;
        if !enabled {
            self.reset_focus()?;
        }
        Ok(())
    }

    pub fn is_pinch_zoom_enabled(&self) -> bool {
        self.config.pinch_zoom
    }

    pub fn set_pinch_zoom(&mut self, enabled: bool) {
        self.config.pinch_zoom = enabled;
    }

    /// Stores the capability set for this device and binds a lens.
    pub fn start(&mut self, capabilities: CameraCapabilities) -> PreviewResult<()> {
        self.emit(ControllerEvent::CameraCountAvailable(capabilities.camera_count()));
        self.capabilities = capabilities;
        self.bind()
    }

    pub fn stop(&mut self) {
        self.host.unbind_all();
        if self.active.take().is_some() {
            self.emit(ControllerEvent::Unbound);
        }
    }

    /// Toggles between the front and back lens.
    pub fn switch_camera(&mut self) -> PreviewResult<()> {
        self.prefer_front = !self.prefer_front;
        self.bind()
    }

    /// Binds the selected lens. Once the host has bound it, failures while
    /// restoring flash, focus and preview are logged and skipped.
    fn bind(&mut self) -> PreviewResult<()> {
        self.host.unbind_all();
        self.active = None;

        let index = self
            .capabilities
            .select(self.prefer_front)
            .inspect_err(|err| log_failure("selecting camera", err))?;
        let lens = self.capabilities.lens(index).ok_or(PreviewError::NoCamera)?;

        self.host
            .bind(lens)
            .inspect_err(|err| log_failure("binding camera", err))?;

        self.active = Some(index);
        self.zoom_ratio = lens.zoom.min();
        self.emit(ControllerEvent::Bound {
            lens: index,
            facing: lens.facing,
        });
        self.emit(ControllerEvent::ZoomRatioChanged(self.zoom_ratio));
        self.emit(ControllerEvent::LinearZoomChanged(0.0));

        #[cfg(feature = "tracing")]
        asimov_module::tracing::info!(target: "camera_preview", lens = %lens.id, facing = %lens.facing, "camera bound");

        let _ = self
            .set_flash_mode(self.flash_mode)
            .inspect_err(|err| log_failure("applying flash mode", err));
        let _ = self
            .reset_focus()
            .inspect_err(|err| log_failure("resetting focus", err));
        let _ = self.update_geometry();
        Ok(())
    }

    /// Applies `mode`, or [`FlashMode::None`] if the lens has no flash unit.
    pub fn set_flash_mode(&mut self, mode: FlashMode) -> PreviewResult<()> {
        let has_flash = self.active_lens().is_some_and(|l| l.has_flash);
        self.flash_mode = match mode {
            _ if !has_flash => FlashMode::None,
            FlashMode::None => FlashMode::Off,
            mode => mode,
        };
        if self.active.is_some() {
            self.host.set_flash_mode(self.flash_mode)?;
        }
        self.emit(ControllerEvent::FlashModeChanged(self.flash_mode));
        Ok(())
    }

    /// Restricts the modes [`cycle_flash_mode`](Self::cycle_flash_mode)
    /// steps through. `None` restores all of them.
    pub fn set_available_flash_modes(&mut self, modes: Option<Vec<FlashMode>>) -> PreviewResult<()> {
        match modes {
            Some(modes) if modes.is_empty() => {
                Err(PreviewError::invalid_config("flash mode list must not be empty"))
            },
            Some(modes) => {
                self.flash_modes = modes;
                Ok(())
            },
            None => {
                self.flash_modes = FlashMode::SELECTABLE.to_vec();
                Ok(())
            },
        }
    }

    pub fn available_flash_modes(&self) -> &[FlashMode] {
        &self.flash_modes
    }

    pub fn cycle_flash_mode(&mut self) -> PreviewResult<()> {
        let next = match self.flash_modes.iter().position(|m| *m == self.flash_mode) {
            Some(i) if i + 1 < self.flash_modes.len() => i + 1,
            _ => 0,
        };
        self.set_flash_mode(self.flash_modes[next])
    }

    /// Linear zoom in `[0, 1]`; out-of-range values are clamped.
    pub fn set_linear_zoom(&mut self, linear: f32) -> PreviewResult<()> {
        let ratio = self.bound_lens()?.zoom.ratio_for_linear(linear);
        self.apply_zoom(ratio)
    }

    /// Zoom ratio, clamped to what the lens supports.
    pub fn set_zoom_ratio(&mut self, ratio: f32) -> PreviewResult<()> {
        let ratio = self.bound_lens()?.zoom.clamp(ratio);
        self.apply_zoom(ratio)
    }

    /// Pinch gesture step. Ignored unless pinch zoom is enabled.
    pub fn scale_zoom(&mut self, factor: f32) -> PreviewResult<()> {
        if !self.config.pinch_zoom {
            return Ok(());
        }
        self.scaling = true;
        self.set_zoom_ratio(self.zoom_ratio * factor)
    }

    fn apply_zoom(&mut self, ratio: f32) -> PreviewResult<()> {
        let linear = self.bound_lens()?.zoom.linear_for_ratio(ratio);
        self.host.set_zoom_ratio(ratio)?;
        self.zoom_ratio = ratio;
        self.emit(ControllerEvent::ZoomRatioChanged(ratio));
        self.emit(ControllerEvent::LinearZoomChanged(linear));
        Ok(())
    }

    /// End of a touch. Focuses at the point unless it ended a pinch.
    pub fn on_touch_up(&mut self, x: f32, y: f32) -> PreviewResult<()> {
        if core::mem::take(&mut self.scaling) {
            return Ok(());
        }
        self.focus_at(x, y)
    }

    /// Meters at `(x, y)` in viewport pixels when tap-to-focus is enabled.
    pub fn focus_at(&mut self, x: f32, y: f32) -> PreviewResult<()> {
        if !self.config.tap_to_focus {
            return Ok(());
        }
        if self.active.is_some() {
            self.host.start_focus_and_metering(x, y)?;
        }
        self.focus = Some((x, y));
        self.emit(ControllerEvent::FocusChanged { x, y });
        Ok(())
    }

    /// Meters at the viewport center. Does nothing until the surface size
    /// is known.
    pub fn reset_focus(&mut self) -> PreviewResult<()> {
        let Some(viewport) = self.viewport else {
            return Ok(());
        };
        let (x, y) = (viewport.width() as f32 / 2.0, viewport.height() as f32 / 2.0);
        if self.active.is_some() {
            self.host.start_focus_and_metering(x, y)?;
        }
        self.focus = None;
        self.emit(ControllerEvent::FocusReset);
        Ok(())
    }

    /// The surface changed size or the display rotated. Zero-sized surfaces
    /// are deferred until the platform reports a real size.
    pub fn on_surface_changed(
        &mut self,
        width: u32,
        height: u32,
        rotation: Rotation,
    ) -> PreviewResult<Option<PreviewGeometry>> {
        let Ok(viewport) = Dimensions::new(width, height) else {
            #[cfg(feature = "tracing")]
            asimov_module::tracing::debug!(target: "camera_preview", width, height, "deferring zero-sized surface");
            return Ok(None);
        };
        self.viewport = Some(viewport);
        if rotation != self.rotation {
            self.rotation = rotation;
            self.host.set_target_rotation(rotation);
        }
        self.update_geometry()?;
        Ok(self.geometry)
    }

    /// Target rotation for captured images.
    pub fn set_rotation(&mut self, rotation: Rotation) -> PreviewResult<()> {
        self.rotation = rotation;
        self.host.set_target_rotation(rotation);
        self.update_geometry()
    }

    pub fn take_picture(&mut self) -> PreviewResult<()> {
        self.bound_lens()?;
        let request = CaptureRequest {
            flash_mode: self.flash_mode,
            rotation: self.rotation,
        };
        self.host
            .capture(request)
            .inspect_err(|err| log_failure("capturing image", err))
    }

    fn update_geometry(&mut self) -> PreviewResult<()> {
        let (Some(lens), Some(viewport)) = (self.active_lens(), self.viewport) else {
            return Ok(());
        };
        let geometry = resolve_preview_geometry(
            &lens.preview_sizes,
            lens.sensor_orientation,
            viewport,
            self.rotation,
            self.config.size_policy,
            self.config.transform_mode,
        );
        self.host
            .configure_preview(&geometry)
            .inspect_err(|err| log_failure("configuring preview", err))?;
        self.geometry = Some(geometry);
        self.emit(ControllerEvent::GeometryChanged(geometry));
        Ok(())
    }

    fn bound_lens(&self) -> PreviewResult<&LensCapabilities> {
        self.active_lens().ok_or(PreviewError::NotBound)
    }

    fn emit(&self, event: ControllerEvent) {
        // Listeners that went away or fell behind simply miss events.
        let _ = self.events_tx.try_send(event);
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_failure(context: &str, err: &PreviewError) {
    #[cfg(feature = "tracing")]
    asimov_module::tracing::warn!(target: "camera_preview", error = %err, "{context} failed");
}
