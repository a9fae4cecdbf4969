//! Phonics Pop entry point
//!
//! On the web this is a thin DOM adapter: it forwards clicks and elapsed time
//! to `Game` and renders the events it gets back. Natively it plays a seeded
//! session headlessly and prints each round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlAudioElement, HtmlElement, MouseEvent, Performance};

    use phonics_pop::GameConfig;
    use phonics_pop::sim::{Game, GameEvent, PlacedItem, SessionState, WordBank};

    /// How often the virtual clock is advanced
    const TICK_MS: i32 = 50;
    /// Confetti pieces are removed after their CSS animation
    const CONFETTI_LIFETIME_MS: i32 = 3000;

    /// DOM handles
    struct Ui {
        document: Document,
        game_area: Element,
        score: Element,
        round: Element,
        found: Element,
        start_btn: HtmlElement,
        restart_btn: HtmlElement,
        sound_btn: Option<HtmlElement>,
        pop_sound: Option<HtmlAudioElement>,
        confetti: Element,
        incorrect: Element,
    }

    fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
    }

    fn html_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
        element(document, id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str(&format!("#{} is not an HTML element", id)))
    }

    impl Ui {
        fn new(document: Document) -> Result<Self, JsValue> {
            Ok(Self {
                game_area: element(&document, "game-area")?,
                score: element(&document, "score")?,
                round: element(&document, "round")?,
                found: element(&document, "correct-found")?,
                start_btn: html_element(&document, "start-btn")?,
                restart_btn: html_element(&document, "restart-btn")?,
                sound_btn: html_element(&document, "sound-btn").ok(),
                pop_sound: document
                    .get_element_by_id("pop-sound")
                    .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok()),
                confetti: element(&document, "confetti-container")?,
                incorrect: element(&document, "incorrect-message")?,
                document,
            })
        }

        fn set_display(el: &HtmlElement, value: &str) {
            let _ = el.style().set_property("display", value);
        }

        fn update_sound_label(&self, sound: bool) {
            if let Some(button) = &self.sound_btn {
                button.set_text_content(Some(if sound { "Sound: on" } else { "Sound: off" }));
            }
        }

        fn update_hud(&self, state: &SessionState) {
            self.score.set_text_content(Some(&state.score.to_string()));
            self.round.set_text_content(Some(&state.round.to_string()));
            self.found.set_text_content(Some(&state.found.to_string()));
        }

        fn balloon(&self, id: usize) -> Option<Element> {
            self.game_area
                .query_selector(&format!("[data-id=\"{}\"]", id))
                .ok()
                .flatten()
        }

        fn add_balloon(&self, item: &PlacedItem) -> Result<(), JsValue> {
            let el = self.document.create_element("div")?;
            el.set_class_name(&format!("balloon {}", item.color.as_str()));
            el.set_attribute(
                "style",
                &format!(
                    "width: {size}px; height: {size}px; left: {x}px; top: {y}px;",
                    size = item.size,
                    x = item.pos.x,
                    y = item.pos.y
                ),
            )?;
            el.set_attribute("data-id", &item.id.to_string())?;
            el.set_attribute("data-word", &item.entry.text)?;
            el.set_text_content(Some(&item.entry.text));
            self.game_area.append_child(&el)?;
            Ok(())
        }

        fn play_pop(&self, volume: f32) {
            if let Some(audio) = &self.pop_sound {
                audio.set_current_time(0.0);
                audio.set_volume(volume as f64);
                match audio.play() {
                    Ok(promise) => {
                        // Autoplay policies reject the promise rather than throwing
                        let on_reject = Closure::once(|_: JsValue| log::info!("Pop!"));
                        let _ = promise.catch(&on_reject);
                        on_reject.forget();
                    }
                    Err(_) => log::info!("Pop!"),
                }
            }
        }

        fn burst_confetti(&self, pieces: &[phonics_pop::sim::ConfettiPiece]) -> Result<(), JsValue> {
            let window = web_sys::window().ok_or("no window")?;
            for piece in pieces {
                let el = self.document.create_element("div")?;
                el.set_class_name("confetti");
                el.set_attribute(
                    "style",
                    &format!(
                        "left: {}%; animation-delay: {}s;",
                        piece.left_percent, piece.delay_secs
                    ),
                )?;
                self.confetti.append_child(&el)?;
                let remove = Closure::once_into_js(move || el.remove());
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref(),
                    CONFETTI_LIFETIME_MS,
                )?;
            }
            Ok(())
        }

        fn show_game_over(&self, rounds: u32, score: u32) -> Result<(), JsValue> {
            let el = self.document.create_element("div")?;
            el.set_class_name("game-over");
            el.set_inner_html(&format!(
                "<h2>Amazing Job!</h2>\
                 <p>You completed {} rounds!</p>\
                 <p>Final Score: {}</p>\
                 <p>Great phonics practice!</p>",
                rounds, score
            ));
            self.game_area.append_child(&el)?;
            Ok(())
        }
    }

    /// Game plus its DOM
    struct App {
        game: Game,
        ui: Ui,
        performance: Option<Performance>,
        last_time: f64,
    }

    impl App {
        fn now(&self) -> f64 {
            self.performance.as_ref().map(|p| p.now()).unwrap_or(0.0)
        }

        fn start(&mut self) {
            Ui::set_display(&self.ui.start_btn, "none");
            Ui::set_display(&self.ui.restart_btn, "none");
            let width = self.ui.game_area.client_width() as f32;
            let height = self.ui.game_area.client_height() as f32;
            if let Err(err) = self.game.set_region(width, height) {
                log::warn!("Keeping previous play area: {}", err);
            }
            self.ui.game_area.set_inner_html("");
            if let Err(err) = self.game.start() {
                log::error!("Cannot start game: {}", err);
                self.ui
                    .game_area
                    .set_text_content(Some(&format!("Cannot start game: {}", err)));
                Ui::set_display(&self.ui.start_btn, "inline-block");
            }
            self.render();
        }

        /// Flip the sound preference and persist it
        fn toggle_sound(&mut self) {
            let mut preferences = self.game.config().preferences.clone();
            preferences.sound = !preferences.sound;
            match self.game.set_preferences(preferences) {
                Ok(()) => {
                    self.game.config().save();
                    self.ui.update_sound_label(self.game.config().preferences.sound);
                }
                Err(err) => log::warn!("Keeping preferences: {}", err),
            }
        }

        fn pick(&mut self, id: usize) {
            self.game.pick(id);
            self.render();
        }

        fn tick(&mut self) {
            let now = self.now();
            let elapsed = (now - self.last_time).max(0.0).floor();
            self.last_time += elapsed;
            if let Err(err) = self.game.advance(elapsed as u64) {
                log::error!("Round failed: {}", err);
            }
            self.render();
        }

        fn render(&mut self) {
            for event in self.game.drain_events() {
                if let Err(err) = self.apply(event) {
                    log::error!("Render failed: {:?}", err);
                }
            }
        }

        fn apply(&self, event: GameEvent) -> Result<(), JsValue> {
            match event {
                GameEvent::RoundStarted { balloons, .. } => {
                    self.ui.game_area.set_inner_html("");
                    for item in &balloons {
                        self.ui.add_balloon(item)?;
                    }
                }
                GameEvent::BalloonPopping { id } => {
                    if let Some(el) = self.ui.balloon(id) {
                        el.class_list().add_1("popped")?;
                    }
                }
                GameEvent::BalloonRemoved { id } => {
                    if let Some(el) = self.ui.balloon(id) {
                        el.remove();
                    }
                }
                GameEvent::PopSound { volume } => self.ui.play_pop(volume),
                GameEvent::Confetti(pieces) => self.ui.burst_confetti(&pieces)?,
                GameEvent::IncorrectShown => self.ui.incorrect.class_list().add_1("show")?,
                GameEvent::IncorrectHidden => self.ui.incorrect.class_list().remove_1("show")?,
                GameEvent::Hud(state) => self.ui.update_hud(&state),
                // Already logged by the core
                GameEvent::Warning(_) => {}
                GameEvent::GameOver {
                    rounds_completed,
                    score,
                } => {
                    self.ui.game_area.set_inner_html("");
                    self.ui.show_game_over(rounds_completed, score)?;
                }
                GameEvent::RestartAvailable => Ui::set_display(&self.ui.restart_btn, "inline-block"),
            }
            Ok(())
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Phonics Pop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let ui = Ui::new(document)?;

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let game = Game::with_seed(config, WordBank::phonics_s(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let performance = window.performance();
        let last_time = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
        ui.update_sound_label(game.config().preferences.sound);
        let sound_btn = ui.sound_btn.clone();
        let start_btn = ui.start_btn.clone();
        let restart_btn = ui.restart_btn.clone();
        let game_area = ui.game_area.clone();
        let app = Rc::new(RefCell::new(App {
            game,
            ui,
            performance,
            last_time,
        }));

        // Start / restart
        for button in [&start_btn, &restart_btn] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().start();
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(button) = sound_btn {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().toggle_sound();
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // One listener for every balloon
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let Ok(Some(balloon)) = target.closest(".balloon") else {
                    return;
                };
                let Some(id) = balloon
                    .get_attribute("data-id")
                    .and_then(|v| v.parse::<usize>().ok())
                else {
                    return;
                };
                app.borrow_mut().pick(id);
            });
            game_area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Virtual clock
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().tick();
            });
            window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TICK_MS,
            )?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Phonics Pop (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2024);

    if let Err(err) = demo::play(seed) {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use phonics_pop::sim::{Game, GameEvent, GamePhase, WordBank};
    use phonics_pop::{GameConfig, GameError};

    /// Auto-play a full session: one wrong pick, then the target, every round
    pub fn play(seed: u64) -> Result<(), GameError> {
        let config = GameConfig::load();
        let wait = config.timing.pop_ms + config.timing.round_transition_ms;
        let reveal = config.timing.restart_reveal_ms;
        let mut game = Game::with_seed(config, WordBank::phonics_s(), seed)?;
        game.set_region(1024.0, 768.0)?;
        game.start()?;

        println!("Seed {}", seed);
        while game.state().phase != GamePhase::Ended {
            for event in game.drain_events() {
                print_event(&event);
            }
            let wrong = game
                .balloons()
                .iter()
                .find(|b| !b.item.entry.is_target)
                .map(|b| b.item.id);
            if let Some(id) = wrong {
                game.pick(id);
            }
            let target = game
                .balloons()
                .iter()
                .find(|b| b.item.entry.is_target)
                .map(|b| b.item.id);
            if let Some(id) = target {
                game.pick(id);
            }
            game.advance(wait)?;
        }
        game.advance(reveal)?;
        for event in game.drain_events() {
            print_event(&event);
        }
        Ok(())
    }

    fn print_event(event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { round, balloons } => {
                println!("\nRound {}", round);
                for b in balloons {
                    println!(
                        "  {:>8} {} at ({:>6.1}, {:>6.1}) size {:>5.1} {}{}",
                        b.entry.text,
                        if b.entry.is_target { "*" } else { " " },
                        b.pos.x,
                        b.pos.y,
                        b.size,
                        b.color.as_str(),
                        if b.forced { " (forced)" } else { "" }
                    );
                }
            }
            GameEvent::Warning(warning) => println!("  ! {}", warning),
            GameEvent::GameOver {
                rounds_completed,
                score,
            } => println!("\nGame over: {} rounds, score {}", rounds_completed, score),
            GameEvent::RestartAvailable => println!("Restart available"),
            _ => {}
        }
    }
}
