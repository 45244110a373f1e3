use std::time::Instant;

use anyhow::Result;
use glam::Vec2;
use log::{info, trace};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::KeyCode,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use crate::core::math::to_meters;
use engine::audio::LogAudio;
use engine::game_loop::GameLoop;
use engine::input::{Action, InputManager, InputSource};
use game::contact::ContactTracker;
use game::level::{Level, LevelEvent};
use game::player::{PlayerController, BASE_CONFIG};

const LEVEL_WIDTH: f32 = 40.0;

/// Axis-aligned rectangle centred on the body origin
fn rect(half_width: f32, half_height: f32) -> [Vec2; 4] {
    [
        Vec2::new(-half_width, -half_height),
        Vec2::new(half_width, -half_height),
        Vec2::new(half_width, half_height),
        Vec2::new(-half_width, half_height),
    ]
}

/// A small playground: floor, a low tunnel, a ladder up to a ledge, a rope
/// and a box
fn build_demo_level() -> Result<Level> {
    let mut level = Level::new(LEVEL_WIDTH)?;

    level.add_ground(Vec2::new(LEVEL_WIDTH / 2.0, -0.5), &rect(LEVEL_WIDTH / 2.0, 0.5))?;
    // Tunnel roof, only passable crouched
    level.add_ground(Vec2::new(12.0, 2.0), &rect(3.0, 0.5))?;
    // Ledge reached by the ladder
    level.add_ground(Vec2::new(24.0, 6.0), &rect(3.0, 0.25))?;
    level.add_ladder(Vec2::new(20.5, 3.0), &rect(0.5, 3.0))?;
    level.add_rope(Vec2::new(32.0, 10.0), 8, Vec2::new(0.2, 0.5))?;
    level.add_box(Vec2::new(6.0, 0.5), Vec2::ONE)?;

    info!(
        "Demo level ready: {} map objects ({} ladders), {} rope(s), {} box(es), {} bodies, {} joints",
        level.geometry.len(),
        level.geometry.ladders().count(),
        level.ropes.len(),
        level.boxes.len(),
        level.physics.body_count(),
        level.physics.joint_count()
    );
    Ok(level)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Adventurer...");

    let mut level = build_demo_level()?;
    // Spawn point as authored in the map, in pixels
    let spawn = Vec2::new(to_meters(96.0), to_meters(32.0));
    let mut player = PlayerController::spawn(&mut level, spawn, BASE_CONFIG)?;
    let mut contacts = ContactTracker::new(player.collider_handle());
    let mut input = InputManager::default();
    // Space jumps too, alongside the arrow and WASD defaults
    input
        .config_mut()
        .bind(InputSource::key(KeyCode::Space), Action::Jump);
    let mut audio = LogAudio;
    let mut game_loop = GameLoop::new();
    let mut last_frame = Instant::now();
    let mut shown_state = player.state();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Adventurer - stay")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!(
                    "Close requested after {} ticks, shutting down...",
                    game_loop.update_count()
                );
                level.teardown();
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                input.reset();
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let now = Instant::now();
                let frame_time = now - last_frame;
                last_frame = now;

                if input.menu_requested() {
                    game_loop.toggle_pause();
                }

                let dt = game_loop.fixed_timestep();
                let steps = game_loop.begin_frame(frame_time);
                for _ in 0..steps {
                    player.sync_contacts(&contacts);
                    player.update(&mut level, input.player(), &contacts, &mut audio, dt);
                    input.update();

                    let due = level.step(dt);
                    let events = level.physics.get_collision_events();
                    contacts.absorb(&level, &events);

                    if due.contains(&LevelEvent::GameOver) {
                        info!("Game over");
                        level.teardown();
                        elwt.exit();
                        return;
                    }
                }
                if game_loop.is_paused() {
                    // Nothing consumed this frame's edges
                    input.update();
                }

                if player.state() != shown_state {
                    shown_state = player.state();
                    window.set_title(&format!("Adventurer - {}", shown_state.name()));
                }

                let state_time = player.state_time() + game_loop.alpha() * dt;
                if let Some(sprite) = player.render(&level.physics, state_time) {
                    trace!(
                        "Draw {:?} at {:?} ({:.1} deg, frame {:.1} ms)",
                        sprite.frame,
                        sprite.position,
                        sprite.rotation_degrees,
                        game_loop.render_delta_time() * 1000.0
                    );
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
