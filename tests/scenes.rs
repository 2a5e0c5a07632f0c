use backdrop::config::ViewportConfig;
use backdrop::surface::RecordingScene;
use backdrop::{
    AnimationController, FloatingScene, HeroScene, LoopConfig, ManualScheduler, SceneConfig, SizeClass,
    SurfaceSizing, Viewport,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pump<S>(ctrl: &mut AnimationController<S, RecordingScene, ManualScheduler>)
where
    S: backdrop::Simulation<RecordingScene>,
{
    for handle in ctrl.scheduler_mut().take_due() {
        ctrl.on_frame(handle).unwrap();
    }
}

#[test]
fn background_camera_tracks_window_aspect() {
    let mut rng = StdRng::seed_from_u64(21);
    let viewport = Viewport::new(1600.0, 900.0);
    let scene = FloatingScene::new(&viewport, SceneConfig::default(), &mut rng).unwrap();
    let mut ctrl = AnimationController::new(
        scene,
        RecordingScene::new(),
        ManualScheduler::new(),
        viewport,
        &LoopConfig::default(),
    )
    .unwrap();
    assert!((ctrl.simulation().camera().aspect - 16.0 / 9.0).abs() < 1e-6);

    ctrl.start().unwrap();
    pump(&mut ctrl);
    ctrl.resize(Viewport::new(600.0, 800.0)).unwrap();
    assert!((ctrl.simulation().camera().aspect - 0.75).abs() < 1e-6);
    assert_eq!(ctrl.surface().viewport(), Some(Viewport::new(600.0, 800.0)));

    pump(&mut ctrl);
    let frame = ctrl.surface().last_frame().unwrap();
    assert_eq!(frame.draws.len(), 19);
    assert_eq!(frame.view_projection, ctrl.simulation().camera().view_projection());
}

#[test]
fn background_pointer_influence_fades() {
    let mut rng = StdRng::seed_from_u64(22);
    let viewport = Viewport::new(1000.0, 500.0);
    let scene = FloatingScene::new(&viewport, SceneConfig::default(), &mut rng).unwrap();
    let mut ctrl = AnimationController::new(
        scene,
        RecordingScene::new(),
        ManualScheduler::new(),
        viewport,
        &LoopConfig::default(),
    )
    .unwrap();

    // top-left corner of the window maps to (-10, 10) in world units
    ctrl.pointer_moved(Vec2::ZERO);
    assert_eq!(ctrl.simulation().pointer_target(), Vec2::new(-10.0, 10.0));
    assert_eq!(ctrl.simulation().influence(), 1.0);

    ctrl.start().unwrap();
    let mut last = ctrl.simulation().influence();
    for _ in 0..200 {
        pump(&mut ctrl);
        let influence = ctrl.simulation().influence();
        assert!(influence < last);
        last = influence;
    }
    assert!(last < SceneConfig::default().influence_floor);
}

#[test]
fn hero_banner_keeps_fixed_height_across_resizes() {
    let config = ViewportConfig::default();
    let sizing = SurfaceSizing::FixedHeight {
        small: 150.0,
        large: 250.0,
    };
    let class = SizeClass::classify(1280.0, &config);
    let viewport = Viewport::measure(1280.0, 720.0, 2.0, sizing, class, &config);
    assert_eq!(viewport.height, 250.0);
    assert_eq!(viewport.pixel_ratio, 1.5);

    let scene = HeroScene::new(&viewport, SceneConfig::default()).unwrap();
    let mut ctrl = AnimationController::new(
        scene,
        RecordingScene::new(),
        ManualScheduler::new(),
        viewport,
        &LoopConfig::default(),
    )
    .unwrap();
    ctrl.start().unwrap();
    for _ in 0..30 {
        pump(&mut ctrl);
    }

    // class stays as classified at startup
    let narrower = Viewport::measure(640.0, 720.0, 2.0, sizing, class, &config);
    assert_eq!(narrower.height, 250.0);
    ctrl.resize(narrower).unwrap();
    assert!((ctrl.simulation().camera().aspect - 640.0 / 250.0).abs() < 1e-6);

    pump(&mut ctrl);
    assert_eq!(ctrl.surface().frames().len(), 31);
    assert_eq!(ctrl.surface().last_frame().unwrap().draws.len(), 5);
}
