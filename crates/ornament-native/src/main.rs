use std::time::Duration;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

use ornament_core::{resolve_photos, FrameClock, PhotoOrigin, Scene};
use ornament_native::app::{App, HandInput};
use ornament_native::cli::Args;
use ornament_native::input::action_for_key;
use ornament_native::photos::{FsPhotoSource, PhotoLoader};
use ornament_native::render::GpuState;
use ornament_native::tracker::{ProcessTracker, SimulatedHand};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::from_env()?;
    let cfg = args.scene_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut source = FsPhotoSource::new(&cfg.photos.directory);
    let plan = resolve_photos(&mut source, &cfg.photos);
    let stream_delay = Duration::from_millis(cfg.photos.stream_delay_ms);
    let scene = Scene::new(cfg, seed);

    let loader = match PhotoLoader::spawn(source, stream_delay) {
        Ok(loader) => Some(loader),
        Err(e) => {
            log::warn!("[photos] loader thread failed to start: {e}");
            None
        }
    };
    let hand = match &args.tracker {
        Some(cmd) => match ProcessTracker::spawn(cmd) {
            Ok(t) => HandInput::Process(t),
            Err(e) => {
                log::error!("[tracker] {e:#}; falling back to keyboard simulation");
                HandInput::Simulated(SimulatedHand::new())
            }
        },
        None => HandInput::Simulated(SimulatedHand::new()),
    };

    if let Some(loader) = &loader {
        loader.stream(plan.deferred);
    }
    let mut app = App::new(scene, hand, loader);
    for asset in &plan.initial {
        app.add_photo(asset);
    }
    if plan.origin == PhotoOrigin::Placeholder {
        log::info!("[photos] drop image files onto the window to add them");
    }

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(app.title())
        .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut clock = FrameClock::default();
    let mut title = app.title();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let Some(action) = action_for_key(&event.logical_key) {
                    if !app.on_key(action) {
                        elwt.exit();
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (w, h) = state.size();
                app.on_cursor(position.x as f32 / w as f32, position.y as f32 / h as f32);
            }
            WindowEvent::DroppedFile(path) => app.on_dropped_file(path),
            _ => {}
        },
        Event::AboutToWait => {
            app.frame(clock.delta());
            let next = app.title();
            if next != title {
                state.window.set_title(&next);
                title = next;
            }
            match state.render(app.scene()) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("[render] {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
