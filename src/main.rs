//! Flappy Cow entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use flappy_cow::audio::AudioManager;
    use flappy_cow::consts::*;
    use flappy_cow::platform::{command_for_key, fit_viewport};
    use flappy_cow::sim::{Command, GameEvent, SessionMode, TickInput, World, tick};
    use flappy_cow::{BestScore, Settings};

    // The page draws the world; it defines `window.renderFrame(json)`
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (typeof window.renderFrame === 'function') {
                window.renderFrame(json);
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        input: TickInput,
        audio: AudioManager,
        // Menus are only re-laid out on mode changes
        last_mode: Option<SessionMode>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(settings.sound_enabled);
            Self {
                world: World::new(seed, settings, BestScore::load()),
                input: TickInput::default(),
                audio,
                last_mode: None,
            }
        }

        /// Run one simulation tick with everything queued since the last one
        fn update(&mut self) {
            let events = tick(&mut self.world, &self.input);
            self.input.clear();

            for event in &events {
                match event {
                    GameEvent::NewBestScore(_) => self.world.best.save(),
                    GameEvent::SettingsChanged => {
                        self.world.settings.save();
                        self.audio.set_enabled(self.world.settings.sound_enabled);
                    }
                    _ => {}
                }
            }
            self.audio.handle_events(&events);
        }

        /// Hand the snapshot to the page's renderer
        fn render(&self) {
            match serde_json::to_string(&self.world.snapshot()) {
                Ok(json) => render_frame(&json),
                Err(e) => log::error!("Failed to encode snapshot: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let mode = self.world.mode;
            let score = self.world.score.to_string();
            let best = self.world.best.get().to_string();

            set_text(document, "currentScore", &score);
            set_text(document, "highScoreGameOver", &best);
            set_text(document, "highScoreDisplay", &best);

            if self.last_mode == Some(mode) {
                return;
            }
            self.last_mode = Some(mode);

            match mode {
                SessionMode::Idle => {
                    set_display(document, "gameCanvas", false);
                    set_display(document, "gameOverMenu", false);
                    set_display(document, "settingsMenu", false);
                    set_display(document, "startMenu", true);
                }
                SessionMode::Running => {
                    set_display(document, "startMenu", false);
                    set_display(document, "settingsMenu", false);
                    set_display(document, "gameOverMenu", false);
                    set_display(document, "gameCanvas", true);
                }
                SessionMode::Over => {
                    set_display(document, "gameOverMenu", true);
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let value = if visible { "block" } else { "none" };
            let _ = el.style().set_property("display", value);
        }
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Cow starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        resize_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        sync_settings_inputs(&document, &game.borrow().world.settings);

        setup_resize_handler(&canvas);
        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_settings_inputs(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Flappy Cow running!");
    }

    /// Keep the logical size fixed and scale the element to the window
    fn resize_canvas(canvas: &HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let inner_w = window.inner_width().ok().and_then(|v| v.as_f64());
        let inner_h = window.inner_height().ok().and_then(|v| v.as_f64());
        let (Some(inner_w), Some(inner_h)) = (inner_w, inner_h) else {
            return;
        };

        let (css_w, css_h) = fit_viewport(inner_w, inner_h);
        canvas.set_width(DESIGN_WIDTH as u32);
        canvas.set_height(DESIGN_HEIGHT as u32);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            resize_canvas(&canvas_clone);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start (jump)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.push(Command::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click (jump)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.push(Command::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = command_for_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.push(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            handler();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, command) in [
            ("startButton", Command::Start),
            ("playAgainButton", Command::PlayAgain),
            ("mainMenuButton", Command::MainMenu),
        ] {
            let game = game.clone();
            on_click(document, id, move || {
                log::info!("{id} clicked");
                game.borrow_mut().input.push(command.clone());
            });
        }

        // Settings navigation never touches the simulation
        {
            let doc = document.clone();
            on_click(document, "settingsButton", move || {
                set_display(&doc, "startMenu", false);
                set_display(&doc, "settingsMenu", true);
            });
        }
        {
            let doc = document.clone();
            on_click(document, "backButton", move || {
                set_display(&doc, "settingsMenu", false);
                set_display(&doc, "startMenu", true);
            });
        }
    }

    /// Read the settings menu into tunables
    fn read_settings_inputs(document: &Document, current: &Settings) -> Settings {
        let mut settings = current.clone();
        if let Some(v) =
            input_by_id(document, "speedSlider").and_then(|i| i.value().parse::<f32>().ok())
        {
            settings.scroll_speed = v;
        }
        if let Some(v) =
            input_by_id(document, "cowSizeSlider").and_then(|i| i.value().parse::<u32>().ok())
        {
            settings.entity_radius = v;
        }
        if let Some(v) =
            input_by_id(document, "hitRadiusSlider").and_then(|i| i.value().parse::<u32>().ok())
        {
            settings.collision_radius = v;
        }
        if let Some(toggle) = input_by_id(document, "soundToggle") {
            settings.sound_enabled = toggle.checked();
        }
        settings
    }

    /// Show stored tunables in the settings menu
    fn sync_settings_inputs(document: &Document, settings: &Settings) {
        let fields = [
            ("speedSlider", "speedValue", settings.scroll_speed.to_string()),
            ("cowSizeSlider", "cowSizeValue", settings.entity_radius.to_string()),
            ("hitRadiusSlider", "hitRadiusValue", settings.collision_radius.to_string()),
        ];
        for (input_id, label_id, value) in fields {
            if let Some(input) = input_by_id(document, input_id) {
                input.set_value(&value);
            }
            set_text(document, label_id, &value);
        }
        if let Some(toggle) = input_by_id(document, "soundToggle") {
            toggle.set_checked(settings.sound_enabled);
        }
    }

    fn setup_settings_inputs(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, event) in [
            ("speedSlider", "input"),
            ("cowSizeSlider", "input"),
            ("hitRadiusSlider", "input"),
            ("soundToggle", "change"),
        ] {
            let Some(input) = input_by_id(document, id) else {
                continue;
            };
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let settings = read_settings_inputs(&doc, &g.world.settings);
                sync_settings_inputs(&doc, &settings);
                g.input.push(Command::Configure(settings));
            });
            let _ = input.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One tick per displayed frame; the next frame is only requested once
    /// this one has fully returned
    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_cow::sim::{Command, GameEvent, TickInput, World, tick};
    use flappy_cow::{BestScore, Settings};

    env_logger::init();
    log::info!("Flappy Cow (native) starting...");
    log::info!("Native mode plays one headless autopilot session - run with `trunk serve` for the web version");

    const MAX_TICKS: u32 = 60 * 60 * 5;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut world = World::new(seed, Settings::load(), BestScore::load());
    let mut input = TickInput::default();
    input.push(Command::Start);

    for _ in 0..MAX_TICKS {
        if autopilot_wants_jump(&world) {
            input.push(Command::Jump);
        }
        let events = tick(&mut world, &input);
        input.clear();

        if events.contains(&GameEvent::Crashed) {
            break;
        }
    }

    println!(
        "Autopilot scored {} in {} ticks (best {})",
        world.score,
        world.time_ticks,
        world.best.get()
    );
}

/// Flap whenever the entity sinks towards the bottom of the next gap
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_wants_jump(world: &flappy_cow::sim::World) -> bool {
    use flappy_cow::consts::DESIGN_HEIGHT;

    let entity = &world.entity;
    let left = entity.pos.x - entity.collision_radius;
    let floor = world
        .stream
        .obstacles
        .iter()
        .find(|o| o.right_edge() >= left)
        .map(|o| o.bottom_top())
        .unwrap_or(DESIGN_HEIGHT * 0.75);
    entity.pos.y > floor - entity.collision_radius - 12.0
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
