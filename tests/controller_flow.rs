//! Controller Flow Tests
//!
//! Drives the controller through bind, surface, flash, zoom and focus
//! changes against a recording host.


use approx::assert_relative_eq;
use camera_preview::shared::{
    AspectRatio, CameraController, CaptureRequest, ControllerConfig, ControllerEvent, Dimensions,
    FlashMode, LensFacing, PreviewError, Rotation, TransformMode,
};
use host_test_utils::*;

fn controller(config: ControllerConfig) -> CameraController<RecordingHost> {
    CameraController::new(RecordingHost::new(), config).unwrap()
}

fn drain(c: &CameraController<RecordingHost>) -> Vec<ControllerEvent> {
    c.events().try_iter().collect()
}

#[test]
fn test_start_binds_preferred_lens_and_reports_count() {
    let mut c = controller(ControllerConfig::new(true));
    c.start(phone_capabilities()).unwrap();

    assert_eq!(c.host().bound_ids(), ["1"]);
    assert_eq!(c.active_lens().unwrap().facing, LensFacing::Front);

    let events = drain(&c);
    assert_eq!(events[0], ControllerEvent::CameraCountAvailable(2));
    assert!(events.contains(&ControllerEvent::Bound {
        lens: 1,
        facing: LensFacing::Front
    }));
    assert!(events.contains(&ControllerEvent::FlashModeChanged(FlashMode::None)));
}

#[test]
fn test_front_preference_falls_back_to_back() {
    let mut c = controller(ControllerConfig::new(true));
    c.start(back_only_capabilities()).unwrap();
    assert_eq!(c.active_lens().unwrap().facing, LensFacing::Back);
    assert!(c.is_front_camera_preferred());
}

#[test]
fn test_switch_camera_rebinds() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    c.switch_camera().unwrap();
    c.switch_camera().unwrap();
    assert_eq!(c.host().bound_ids(), ["0", "1", "0"]);
    assert!(!c.is_front_camera_preferred());
}

#[test]
fn test_bind_failure_is_reported_without_retry() {
    let host = RecordingHost::new().with_broken_lens("1");
    let mut c = CameraController::new(host, ControllerConfig::new(false)).unwrap();
    c.start(phone_capabilities()).unwrap();

    let err = c.switch_camera().unwrap_err();
    assert!(matches!(err, PreviewError::HostError { .. }));
    assert!(c.active_lens().is_none());
    assert_eq!(c.host().bound_ids(), ["0"]);
}

#[test]
fn test_switch_camera_announces_zoom_reset() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    c.set_zoom_ratio(5.0).unwrap();
    drain(&c);

    c.switch_camera().unwrap();
    assert_eq!(c.zoom_ratio(), 1.0);
    let events = drain(&c);
    assert!(events.contains(&ControllerEvent::ZoomRatioChanged(1.0)));
    assert!(events.contains(&ControllerEvent::LinearZoomChanged(0.0)));
}

#[test]
fn test_post_bind_failures_still_configure_preview() {
    let mut host = RecordingHost::new();
    host.fail_flash = true;
    let mut c = CameraController::new(host, ControllerConfig::new(false)).unwrap();
    c.on_surface_changed(1080, 1920, Rotation::Rot0).unwrap();

    c.start(phone_capabilities()).unwrap();
    assert_eq!(c.active_lens().unwrap().id, "0");
    assert!(c.geometry().is_some());
    assert_eq!(c.host().configure_count(), 1);
}

#[test]
fn test_surface_change_configures_preview() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();

    let g = c
        .on_surface_changed(1080, 1920, Rotation::Rot0)
        .unwrap()
        .unwrap();
    assert!(g.sensor_rotated);
    assert_eq!(g.buffer_size, Dimensions::new(1920, 1080).unwrap());
    assert_eq!(c.host().last_geometry(), Some(&g));

    let g = c
        .on_surface_changed(1920, 1080, Rotation::Rot90)
        .unwrap()
        .unwrap();
    assert!(!g.sensor_rotated);
    assert_relative_eq!(g.transform.rotation_degrees(), -90.0, epsilon = 1e-4);
    assert!(
        c.host()
            .calls
            .contains(&HostCall::SetTargetRotation(Rotation::Rot90))
    );
}

#[test]
fn test_surface_before_start_is_applied_on_bind() {
    let mut c = controller(ControllerConfig::new(false).with_transform_mode(TransformMode::Legacy));
    assert_eq!(c.on_surface_changed(1080, 1920, Rotation::Rot0).unwrap(), None);
    c.start(phone_capabilities()).unwrap();
    let g = c.geometry().copied().unwrap();
    assert_eq!(c.host().last_geometry(), Some(&g));
    assert_relative_eq!(g.transform.axis_scale_x(), 1.0, epsilon = 1e-5);
}

#[test]
fn test_bounded_policy_caps_preview() {
    let config = ControllerConfig::new(false).with_bounded_preview();
    let mut c = controller(config);
    c.start(phone_capabilities()).unwrap();
    let g = c
        .on_surface_changed(3200, 1440, Rotation::Rot90)
        .unwrap()
        .unwrap();
    assert!(!g.sensor_rotated);
    assert_eq!(g.buffer_size, Dimensions::new(1920, 1080).unwrap());
}

#[test]
fn test_flash_cycle_and_torch() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    assert_eq!(c.flash_mode(), FlashMode::Off);

    c.cycle_flash_mode().unwrap();
    c.cycle_flash_mode().unwrap();
    c.cycle_flash_mode().unwrap();
    assert_eq!(c.flash_mode(), FlashMode::Torch);
    assert!(c.flash_mode().is_torch());
    c.cycle_flash_mode().unwrap();
    assert_eq!(c.flash_mode(), FlashMode::Off);

    c.set_flash_mode(FlashMode::None).unwrap();
    assert_eq!(c.flash_mode(), FlashMode::Off);
}

#[test]
fn test_zoom_is_clamped_to_lens_range() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    drain(&c);

    c.set_zoom_ratio(25.0).unwrap();
    assert_eq!(c.zoom_ratio(), 10.0);
    c.set_zoom_ratio(0.1).unwrap();
    assert_eq!(c.zoom_ratio(), 1.0);
    c.set_linear_zoom(2.0).unwrap();
    assert_eq!(c.zoom_ratio(), 10.0);
    assert_eq!(c.host().zoom_ratios(), [10.0, 1.0, 10.0]);

    let events = drain(&c);
    assert_eq!(events.len(), 6);
    assert_eq!(events[4], ControllerEvent::ZoomRatioChanged(10.0));
    assert_eq!(events[5], ControllerEvent::LinearZoomChanged(1.0));
}

#[test]
fn test_pinch_zoom_only_when_enabled() {
    let mut c = controller(ControllerConfig::new(false).with_tap_to_focus(true));
    c.start(phone_capabilities()).unwrap();
    c.on_surface_changed(1080, 1920, Rotation::Rot0).unwrap();

    c.scale_zoom(2.0).unwrap();
    assert_eq!(c.zoom_ratio(), 1.0);

    c.set_pinch_zoom(true);
    c.scale_zoom(2.0).unwrap();
    c.scale_zoom(1.5).unwrap();
    assert_relative_eq!(c.zoom_ratio(), 3.0);

    // Lifting the fingers after a pinch does not focus.
    c.on_touch_up(100.0, 100.0).unwrap();
    assert_eq!(c.focus_point(), None);
    c.on_touch_up(100.0, 100.0).unwrap();
    assert_eq!(c.focus_point(), Some((100.0, 100.0)));
}

#[test]
fn test_focus_and_reset() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    c.on_surface_changed(1080, 1920, Rotation::Rot0).unwrap();

    c.focus_at(10.0, 20.0).unwrap();
    assert_eq!(c.focus_point(), None, "tap-to-focus is off by default");

    c.set_tap_to_focus(true).unwrap();
    c.focus_at(10.0, 20.0).unwrap();
    assert_eq!(c.focus_point(), Some((10.0, 20.0)));

    drain(&c);
    c.set_tap_to_focus(false).unwrap();
    assert_eq!(c.focus_point(), None);
    assert_eq!(drain(&c), [ControllerEvent::FocusReset]);
    assert_eq!(c.host().calls.last(), Some(&HostCall::Focus(540.0, 960.0)));
}

#[test]
fn test_disabling_tap_to_focus_sticks_when_reset_fails() {
    let mut c = controller(ControllerConfig::new(false).with_tap_to_focus(true));
    c.start(phone_capabilities()).unwrap();
    c.on_surface_changed(1080, 1920, Rotation::Rot0).unwrap();

    c.host_mut().fail_focus = true;
    assert!(c.set_tap_to_focus(false).is_err());
    assert!(!c.is_tap_to_focus_enabled());
    // Ignored now, so the failing host is never asked.
    c.focus_at(10.0, 20.0).unwrap();
}

#[test]
fn test_fixed_aspect_preview() {
    let config = ControllerConfig::new(false).with_target_aspect(AspectRatio::Ratio4x3);
    let mut c = controller(config);
    c.start(phone_capabilities()).unwrap();
    let g = c
        .on_surface_changed(1080, 2400, Rotation::Rot0)
        .unwrap()
        .unwrap();
    assert_eq!(g.buffer_size, Dimensions::new(1440, 1080).unwrap());
}

#[test]
fn test_take_picture_uses_current_state() {
    let mut c = controller(ControllerConfig::new(false).with_flash_mode(FlashMode::Auto));
    c.start(phone_capabilities()).unwrap();
    c.set_rotation(Rotation::Rot270).unwrap();
    c.take_picture().unwrap();
    assert_eq!(
        c.host().calls.last(),
        Some(&HostCall::Capture(CaptureRequest {
            flash_mode: FlashMode::Auto,
            rotation: Rotation::Rot270,
        }))
    );

    c.host_mut().fail_capture = true;
    assert!(c.take_picture().is_err());
}

#[test]
fn test_stop_unbinds() {
    let mut c = controller(ControllerConfig::new(false));
    c.start(phone_capabilities()).unwrap();
    drain(&c);
    c.stop();
    assert!(c.active_lens().is_none());
    assert_eq!(drain(&c), [ControllerEvent::Unbound]);
    assert!(matches!(c.set_linear_zoom(0.5), Err(PreviewError::NotBound)));
}

#[test]
fn test_full_event_queue_does_not_fail_operations() {
    let mut c = controller(ControllerConfig::new(false).with_event_capacity(1));
    c.start(phone_capabilities()).unwrap();
    for _ in 0..10 {
        c.cycle_flash_mode().unwrap();
    }
    assert_eq!(drain(&c).len(), 1);
}
