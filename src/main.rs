//! Cluck Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop. On wasm
//! the loop is driven by requestAnimationFrame with DOM HUD wiring; the
//! native binary runs a short scripted headless demo of the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use cluck_dash::audio::AudioManager;
    use cluck_dash::profile::Profile;
    use cluck_dash::sim::{GamePhase, TickInput, TimeScale, World, tick};

    /// Game instance holding all state
    struct Game {
        world: World,
        input: TickInput,
        profile: Profile,
        audio: AudioManager,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, profile: Profile) -> Self {
            let mut world = World::new(seed);
            world.best_score = profile.best_score;
            Self {
                world,
                input: TickInput::default(),
                profile,
                audio: AudioManager::new(),
                last_time: 0.0,
                last_phase: GamePhase::Title,
            }
        }

        /// One display frame: tick the sim, fire audio, refresh the HUD
        fn frame(&mut self, time_ms: f64) {
            let dt = if self.last_time > 0.0 {
                ((time_ms - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time_ms;

            tick(&mut self.world, &self.input, dt);

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.pause = false;
            self.input.restart = false;
            self.input.select_scale = None;

            // Fire-and-forget audio triggers
            for event in self.world.take_events() {
                self.audio.play(event.into());
            }

            // Persist the best score once per game over
            if self.world.phase == GamePhase::GameOver && self.last_phase != GamePhase::GameOver
                && self.profile.record_score(self.world.best_score)
            {
                self.profile.save();
            }
            self.last_phase = self.world.phase;

            self.update_hud();
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("{:.0}", self.world.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&format!("{:.0}", self.world.best_score)));
            }
            if let Some(el) = document.get_element_by_id("hud-corn") {
                el.set_text_content(Some(&self.world.corn.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-hearts") {
                let hearts: Vec<String> = self
                    .world
                    .display_hearts
                    .iter()
                    .map(|h| format!("{h:.0}"))
                    .collect();
                el.set_text_content(Some(&hearts.join(" | ")));
            }
            if let Some(el) = document.get_element_by_id("hud-fuel") {
                el.set_text_content(Some(&format!("{:.1}", self.world.fuel)));
            }

            // Overlays track the phase
            let overlays = [
                ("title-screen", GamePhase::Title),
                ("pause-menu", GamePhase::Paused),
                ("game-over", GamePhase::GameOver),
            ];
            for (id, phase) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if self.world.phase == phase { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }
    }

    /// Map a key code to held/one-shot input changes
    fn apply_key(game: &mut Game, code: &str, down: bool) {
        match code {
            "ArrowLeft" | "KeyA" => game.input.left = down,
            "ArrowRight" | "KeyD" => game.input.right = down,
            "Space" | "ArrowUp" | "KeyW" => game.input.jump = down,
            "ArrowDown" | "KeyS" => game.input.down = down,
            _ if down => match code {
                "Enter" => game.input.start = true,
                "KeyP" | "Escape" => game.input.pause = true,
                "KeyR" => game.input.restart = true,
                "Digit1" => game.input.select_scale = Some(TimeScale::Slow),
                "Digit2" => game.input.select_scale = Some(TimeScale::Normal),
                "Digit3" => game.input.select_scale = Some(TimeScale::Fast),
                _ => {}
            },
            _ => {}
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Browsers require a gesture before audio can start
                g.audio.resume();
                apply_key(&mut g, &event.code(), true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                apply_key(&mut game.borrow_mut(), &event.code(), false);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.world.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.world.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        web_sys::window()
            .unwrap()
            .request_animation_frame(f.as_ref().unchecked_ref())
            .unwrap();
    }

    pub fn run() {
        console_log::init_with_level(log::Level::Info).ok();
        console_error_panic_hook::set_once();

        let profile = Profile::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Cluck Dash starting with seed {seed}");

        let game = Rc::new(RefCell::new(Game::new(seed, profile)));
        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        // Drive frames from requestAnimationFrame
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move |time_ms: f64| {
            game.borrow_mut().frame(time_ms);
            request_animation_frame(f.borrow().as_ref().unwrap());
        }));
        request_animation_frame(g.borrow().as_ref().unwrap());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use cluck_dash::consts::*;
    use cluck_dash::sim::{GamePhase, TickInput, World, tick};

    env_logger::init();
    log::info!("Cluck Dash (native) starting...");
    log::info!("Native mode is a headless demo - run the web build for the full game");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut world = World::new(seed);

    let start = TickInput {
        start: true,
        ..TickInput::default()
    };
    tick(&mut world, &start, 1.0 / 60.0);

    // Scripted half minute: run and hop on a fixed rhythm
    let mut input = TickInput::default();
    for frame in 0..(30 * 60) {
        input.jump = frame % 90 < 12;
        tick(&mut world, &input, 1.0 / 60.0);
        for event in world.take_events() {
            log::debug!("event: {event:?}");
        }
        if world.phase == GamePhase::GameOver {
            log::info!("demo run ended early at frame {frame}");
            break;
        }
    }

    log::info!(
        "demo finished: score {:.0}, corn {}, difficulty {:.2}, hearts {:?}",
        world.score,
        world.corn,
        world.difficulty,
        world.hearts
    );
    assert!(world.difficulty <= 1.0 && world.fuel <= FLIGHT_FUEL_MAX);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
