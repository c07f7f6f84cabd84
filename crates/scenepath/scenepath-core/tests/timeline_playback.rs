mod common;

use common::{approx, approx_pt, MockHost};
use scenepath_core::{
    AnimationContext, AnimationPath, Config, ObjectId, Point, PlaybackState, Rect, SceneEvent,
    SceneId, UpdateMessage,
};

fn ctx_with_scene(duration_ms: f32, looping: bool) -> (AnimationContext, SceneId) {
    let mut ctx = AnimationContext::init(Config::default());
    let scene = ctx
        .create_scene_with_duration(Rect::new(0.0, 0.0, 400.0, 300.0), duration_ms)
        .unwrap();
    ctx.set_loop(scene, looping);
    (ctx, scene)
}

fn line_path(duration_ms: f32) -> AnimationPath {
    AnimationPath::new(
        vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
        duration_ms,
    )
}

fn count_ended(events: &[SceneEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SceneEvent::PlaybackEnded { .. }))
        .count()
}

#[test]
fn tick_is_noop_while_paused() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    let out = ctx.tick(500.0, &mut host);
    assert!(out.changes.is_empty());
    let s = ctx.scene(scene).unwrap();
    assert_eq!(s.time(), 0.0);
    assert_eq!(s.state(), PlaybackState::Stopped);
}

#[test]
fn loop_wraps_and_keeps_playing() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, true);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.tick(900.0, &mut host);
    approx(ctx.scene(scene).unwrap().time(), 0.9, 1e-5);

    let out = ctx.tick(300.0, &mut host);
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::Looped { .. })));
    assert_eq!(count_ended(&out.events), 0);
    let s = ctx.scene(scene).unwrap();
    approx(s.time(), 0.2, 1e-5);
    assert!(s.is_playing());
    assert_eq!(s.state(), PlaybackState::Playing);
}

#[test]
fn non_loop_stops_at_end_exactly_once() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    let id = host.add_with_id("a", Point::ZERO);
    ctx.scene_mut(scene)
        .unwrap()
        .register_path(id.clone(), line_path(1000.0))
        .unwrap();
    ctx.play(scene);

    ctx.tick(600.0, &mut host);
    let out = ctx.tick(600.0, &mut host);
    assert_eq!(count_ended(&out.events), 1);
    assert_eq!(out.position_of(&id), Some(Point::new(100.0, 0.0)));
    let s = ctx.scene(scene).unwrap();
    assert_eq!(s.time(), 1.0);
    assert!(!s.is_playing());
    assert_eq!(s.state(), PlaybackState::Finished);

    for _ in 0..3 {
        let out = ctx.tick(600.0, &mut host);
        assert_eq!(count_ended(&out.events), 0);
        assert!(out.changes.is_empty());
    }
    assert_eq!(ctx.scene(scene).unwrap().time(), 1.0);
}

#[test]
fn play_after_finish_restarts() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.tick(2000.0, &mut host);
    assert_eq!(ctx.scene(scene).unwrap().time(), 1.0);
    let out = ctx.play(scene);
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::PlaybackStarted { .. })));
    assert_eq!(ctx.scene(scene).unwrap().time(), 0.0);
    assert!(ctx.scene(scene).unwrap().is_playing());
}

#[test]
fn pause_freezes_time_and_toggle_resumes() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.tick(250.0, &mut host);
    ctx.pause(scene);
    ctx.tick(250.0, &mut host);
    approx(ctx.scene(scene).unwrap().time(), 0.25, 1e-6);
    assert_eq!(ctx.scene(scene).unwrap().state(), PlaybackState::Paused);

    ctx.toggle_play(scene);
    ctx.tick(250.0, &mut host);
    approx(ctx.scene(scene).unwrap().time(), 0.5, 1e-6);
    ctx.toggle_play(scene);
    assert!(!ctx.scene(scene).unwrap().is_playing());
}

#[test]
fn set_time_clamps_and_applies_immediately() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    let id = host.add_with_id("a", Point::ZERO);
    ctx.scene_mut(scene)
        .unwrap()
        .register_path(id.clone(), line_path(1000.0))
        .unwrap();

    let out = ctx.seek(scene, 0.25, &mut host);
    approx_pt(out.position_of(&id).unwrap(), Point::new(25.0, 0.0), 1e-4);
    approx_pt(host.center(&id), Point::new(25.0, 0.0), 1e-4);
    assert!(out.events.iter().any(|e| matches!(
        e,
        SceneEvent::TimeChanged { new_time, .. } if (*new_time - 0.25).abs() < 1e-6
    )));

    ctx.seek(scene, 4.0, &mut host);
    assert_eq!(ctx.scene(scene).unwrap().time(), 1.0);
    ctx.seek(scene, -1.0, &mut host);
    assert_eq!(ctx.scene(scene).unwrap().time(), 0.0);
}

#[test]
fn step_nudges_without_wrapping() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, true);
    let mut host = MockHost::new();
    ctx.step(scene, 0.3, &mut host);
    approx(ctx.scene(scene).unwrap().time(), 0.3, 1e-6);
    ctx.step(scene, 0.9, &mut host);
    assert_eq!(ctx.scene(scene).unwrap().time(), 1.0);
    ctx.step(scene, -2.0, &mut host);
    assert_eq!(ctx.scene(scene).unwrap().time(), 0.0);
}

#[test]
fn scrubbing_forces_pause() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.tick(100.0, &mut host);

    let out = ctx.begin_scrub(scene);
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::PlaybackPaused { .. })));
    assert_eq!(ctx.scene(scene).unwrap().state(), PlaybackState::Scrubbing);

    ctx.scrub_to(scene, 0.6, &mut host);
    ctx.tick(100.0, &mut host);
    approx(ctx.scene(scene).unwrap().time(), 0.6, 1e-6);

    ctx.end_scrub(scene);
    let s = ctx.scene(scene).unwrap();
    assert!(!s.is_scrubbing());
    assert!(!s.is_playing());
    assert_eq!(s.state(), PlaybackState::Paused);
}

#[test]
fn queued_seek_after_tick_wins_the_frame() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.enqueue(UpdateMessage::FrameTick { delta_ms: 100.0 });
    ctx.enqueue(UpdateMessage::UserSeek { scene, time: 0.7 });
    ctx.enqueue(UpdateMessage::FrameTick { delta_ms: 100.0 });
    assert_eq!(ctx.pending(), 3);
    ctx.update(&mut host);
    assert_eq!(ctx.pending(), 0);
    let s = ctx.scene(scene).unwrap();
    approx(s.time(), 0.7, 1e-6);
    assert!(!s.is_playing());
}

#[test]
fn fixed_baseline_cycle_rescales_per_object_progress() {
    let cfg = Config {
        baseline_cycle_ms: Some(5000.0),
        ..Config::default()
    };
    let mut ctx = AnimationContext::init(cfg);
    let scene = ctx
        .create_scene(Rect::new(0.0, 0.0, 400.0, 300.0))
        .unwrap();
    let mut host = MockHost::new();
    let fast = host.add_with_id("fast", Point::ZERO);
    let slow = host.add_with_id("slow", Point::ZERO);
    {
        let s = ctx.scene_mut(scene).unwrap();
        s.register_path(fast.clone(), line_path(2500.0)).unwrap();
        s.register_path(slow.clone(), line_path(5000.0)).unwrap();
    }
    ctx.play(scene);
    let out = ctx.tick(1250.0, &mut host).clone();
    approx(ctx.scene(scene).unwrap().time(), 0.25, 1e-6);
    approx_pt(out.position_of(&fast).unwrap(), Point::new(50.0, 0.0), 1e-3);
    approx_pt(out.position_of(&slow).unwrap(), Point::new(25.0, 0.0), 1e-3);
}

#[test]
fn invalid_paths_are_skipped_without_error() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    let good = host.add_with_id("good", Point::ZERO);
    let bad = ObjectId::from("bad");
    let mut broken = line_path(1000.0);
    broken.segment_weights = vec![1.0, 1.0];
    assert!(ctx
        .scene_mut(scene)
        .unwrap()
        .register_path(bad.clone(), broken)
        .is_err());
    ctx.scene_mut(scene)
        .unwrap()
        .register_path(good.clone(), line_path(1000.0))
        .unwrap();

    let out = ctx.seek(scene, 0.5, &mut host);
    assert!(out.position_of(&good).is_some());
    assert!(out.position_of(&bad).is_none());
}

#[test]
fn teardown_drops_scenes_and_ignores_ticks() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    ctx.play(scene);
    ctx.teardown();
    assert!(!ctx.is_live());
    assert!(ctx.scenes().is_empty());
    let out = ctx.tick(16.0, &mut host);
    assert!(out.is_empty());
}

#[test]
fn torn_down_context_stays_inert() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    ctx.teardown();
    assert!(ctx
        .create_scene(Rect::new(0.0, 0.0, 400.0, 300.0))
        .is_none());
    assert!(ctx
        .create_scene_with_duration(Rect::new(0.0, 0.0, 400.0, 300.0), 1000.0)
        .is_none());
    assert!(ctx.scenes().is_empty());
    assert!(ctx.play(scene).is_empty());
    assert!(ctx.set_loop(scene, true).is_empty());
    ctx.enqueue(UpdateMessage::FrameTick { delta_ms: 16.0 });
    assert_eq!(ctx.pending(), 0);
}

#[test]
fn destroy_scene_removes_owned_paths() {
    let (mut ctx, scene) = ctx_with_scene(1000.0, false);
    let mut host = MockHost::new();
    let id = host.add_with_id("a", Point::ZERO);
    ctx.scene_mut(scene)
        .unwrap()
        .register_path(id.clone(), line_path(1000.0))
        .unwrap();
    assert!(ctx.destroy_scene(scene));
    assert!(!ctx.destroy_scene(scene));
    assert!(ctx.scene(scene).is_none());
    let out = ctx.seek(scene, 0.5, &mut host);
    assert!(out.changes.is_empty());
}
