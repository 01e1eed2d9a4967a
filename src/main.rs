//! Water Quest entry point
//!
//! The browser build wires the page to the round controller. The native build
//! has no UI and plays a demo round in the log instead.
//!
//! Page elements the browser build expects:
//! - `.game-grid` (cells are created here)
//! - `#current-cans`, `#timer`, `#high-score`
//! - `#start-game`, `#try-again`, `#reset-game`, `#reset-all`
//! - `#difficulty-modal` with buttons carrying `data-difficulty="easy|normal|hard"`
//! - `#gameover-modal` with `#final-score-msg`, `#highscore-msg`, `#congrats-msg`
//! - `#milestone-banner` (optional)

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use water_quest::audio::AudioManager;
    use water_quest::consts::GRID_CELLS;
    use water_quest::game::SpawnedIcon;
    use water_quest::platform::LocalStore;
    use water_quest::present::{Presenter, dispatch};
    use water_quest::{Difficulty, IconKind, Input, RoundController, Settings};

    /// Inputs queued by DOM handlers, drained once per frame
    type InputQueue = Rc<RefCell<Vec<Input>>>;

    const CONFETTI_COLORS: [&str; 8] = [
        "#FFC907", "#2E9DF7", "#8BD1CB", "#4FCB53", "#FF902A", "#F5402C", "#159A48", "#F16061",
    ];
    const CONFETTI_PIECES: usize = 80;
    const CONFETTI_LIFETIME_MS: i32 = 2700;
    const MILESTONE_BANNER_MS: i32 = 1800;

    /// Presenter that writes to the page
    struct DomView {
        document: Document,
        cells: Vec<Element>,
        /// Icon element + click handler per cell
        icons: Vec<Option<(Element, Closure<dyn FnMut(MouseEvent)>)>>,
        inputs: InputQueue,
        settings: Settings,
        rng: Pcg32,
    }

    impl DomView {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_shown(&self, id: &str, shown: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let display = if shown { "display:flex" } else { "display:none" };
                let _ = el.set_attribute("style", display);
            }
        }

        fn icon_element(&self, kind: IconKind) -> Option<(Element, Element)> {
            let (wrapper_class, icon_class, title) = match kind {
                IconKind::Collectible => ("water-can-wrapper", "water-can", "Water can +1"),
                IconKind::Hazard => ("biohazard-wrapper", "biohazard", "Biohazard -3s"),
                IconKind::Bonus => ("biohazard-wrapper bonus-wrapper", "plus-icon", "Bonus +2s"),
            };
            let wrapper = self.document.create_element("div").ok()?;
            let icon = self.document.create_element("div").ok()?;
            let _ = wrapper.set_attribute("class", wrapper_class);
            let _ = icon.set_attribute("class", icon_class);
            let _ = icon.set_attribute("title", title);
            wrapper.append_child(&icon).ok()?;
            Some((wrapper, icon))
        }

        /// Schedule a one-shot callback
        fn after(&self, ms: i32, f: impl FnOnce() + 'static) {
            if let Some(window) = web_sys::window() {
                let cb = Closure::once_into_js(f);
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.unchecked_ref(),
                    ms,
                );
            }
        }
    }

    impl Presenter for DomView {
        fn render_icon(&mut self, icon: &SpawnedIcon) {
            self.remove_icon(icon.cell);
            let Some(cell) = self.cells.get(icon.cell) else {
                return;
            };
            let Some((wrapper, target)) = self.icon_element(icon.kind) else {
                log::warn!("Could not create icon element");
                return;
            };

            let inputs = self.inputs.clone();
            let id = icon.id;
            let handler = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                inputs.borrow_mut().push(Input::Click(id));
            });
            let _ = target
                .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
            let _ = cell.append_child(&wrapper);
            self.icons[icon.cell] = Some((target, handler));
        }

        fn remove_icon(&mut self, cell: usize) {
            if let Some((target, handler)) = self.icons.get_mut(cell).and_then(Option::take) {
                let _ = target
                    .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
            }
            if let Some(el) = self.cells.get(cell) {
                el.set_inner_html("");
            }
        }

        fn clear_grid(&mut self) {
            for cell in 0..self.cells.len() {
                self.remove_icon(cell);
            }
        }

        fn update_score(&mut self, score: u32) {
            self.set_text("current-cans", &score.to_string());
        }

        fn update_timer(&mut self, seconds: u32) {
            self.set_text("timer", &seconds.to_string());
        }

        fn update_high_score(&mut self, score: u32) {
            self.set_text("high-score", &score.to_string());
        }

        fn show_round_over(&mut self, final_score: u32, is_new_high_score: bool) {
            self.set_text("final-score-msg", &format!("Your final score: {}", final_score));
            if is_new_high_score {
                self.set_text("highscore-msg", &format!("New High Score: {}!", final_score));
                self.set_text("congrats-msg", "Congratulations! You set a new record!");
            } else {
                self.set_text("highscore-msg", "");
                self.set_text("congrats-msg", "");
            }
            self.set_shown("gameover-modal", true);
        }

        fn hide_round_over(&mut self) {
            self.set_shown("gameover-modal", false);
        }

        fn show_difficulty_choice(&mut self) {
            for tier in Difficulty::ALL {
                let selector = format!("[data-difficulty=\"{}\"]", tier.as_str());
                if let Some(btn) = self.document.query_selector(&selector).ok().flatten() {
                    let class = if tier == self.settings.difficulty {
                        "difficulty-btn selected"
                    } else {
                        "difficulty-btn"
                    };
                    let _ = btn.set_attribute("class", class);
                }
            }
            self.set_shown("difficulty-modal", true);
        }

        fn hide_difficulty_choice(&mut self) {
            self.set_shown("difficulty-modal", false);
        }

        fn show_milestone(&mut self, message: &str) {
            if !self.settings.milestone_banners {
                return;
            }
            let Some(banner) = self.document.get_element_by_id("milestone-banner") else {
                log::info!("Milestone: {}", message);
                return;
            };
            banner.set_text_content(Some(message));
            let _ = banner.set_attribute("class", "milestone-banner show");
            self.after(MILESTONE_BANNER_MS, move || {
                let _ = banner.set_attribute("class", "milestone-banner");
            });
        }

        fn celebrate(&mut self) {
            if !self.settings.effective_confetti() {
                return;
            }
            let container = match self.document.get_element_by_id("global-confetti") {
                Some(el) => el,
                None => {
                    let Ok(el) = self.document.create_element("div") else {
                        return;
                    };
                    el.set_id("global-confetti");
                    let _ = el.set_attribute(
                        "style",
                        "position:fixed;top:0;left:0;width:100vw;height:100vh;\
                         pointer-events:none;z-index:2000",
                    );
                    if let Some(body) = self.document.body() {
                        let _ = body.append_child(&el);
                    }
                    el
                }
            };
            container.set_inner_html("");

            for _ in 0..CONFETTI_PIECES {
                let Ok(piece) = self.document.create_element("div") else {
                    break;
                };
                let color = CONFETTI_COLORS[self.rng.random_range(0..CONFETTI_COLORS.len())];
                let left = self.rng.random::<f32>() * 98.0;
                let top = self.rng.random::<f32>() * -20.0;
                let angle = self.rng.random::<f32>() * 360.0;
                let _ = piece.set_attribute("class", "confetti");
                let _ = piece.set_attribute(
                    "style",
                    &format!(
                        "background:{};left:{:.1}vw;top:{:.1}vh;transform:rotate({:.0}deg)",
                        color, left, top, angle
                    ),
                );
                let _ = container.append_child(&piece);
            }

            self.after(CONFETTI_LIFETIME_MS, move || container.set_inner_html(""));
        }
    }

    /// Game instance holding all state
    struct Game {
        controller: RoundController<LocalStore>,
        view: DomView,
        audio: AudioManager,
        settings_store: LocalStore,
        last_time: f64,
    }

    impl Game {
        /// Apply queued input, advance timers, push events to the page
        fn update(&mut self, time: f64) {
            let dt_ms = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;

            let inputs: Vec<Input> = self.view.inputs.borrow_mut().drain(..).collect();
            for input in inputs {
                // Any click is a user gesture, so audio may start now
                self.audio.resume();
                match input {
                    Input::ChooseDifficulty(tier) => {
                        if self.controller.choose_difficulty(tier)
                            && self.view.settings.remember_difficulty(tier)
                        {
                            self.view.settings.save(&mut self.settings_store);
                        }
                    }
                    other => self.controller.handle(other),
                }
            }

            self.controller
                .advance(Duration::from_secs_f64(dt_ms / 1000.0));
            let events = self.controller.drain_events();
            dispatch(events, &mut self.view, &mut self.audio);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Water Quest starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings_store = LocalStore::open();
        let settings = Settings::load(&settings_store);
        let inputs: InputQueue = Rc::default();
        let seed = js_sys::Date::now() as u64;

        let view = DomView {
            cells: create_grid(&document),
            icons: (0..GRID_CELLS).map(|_| None).collect(),
            document: document.clone(),
            inputs: inputs.clone(),
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            settings: settings.clone(),
        };

        let game = Rc::new(RefCell::new(Game {
            controller: RoundController::new(seed, LocalStore::open()),
            audio: AudioManager::new(&settings),
            view,
            settings_store,
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(&document, &inputs);

        // Start game loop
        request_animation_frame(game);

        log::info!("Water Quest running!");
    }

    /// Build the 3x3 grid of cells
    fn create_grid(document: &Document) -> Vec<Element> {
        let Some(grid) = document.query_selector(".game-grid").ok().flatten() else {
            log::error!("No .game-grid element on the page");
            return Vec::new();
        };
        grid.set_inner_html("");

        (0..GRID_CELLS)
            .filter_map(|_| {
                let cell = document.create_element("div").ok()?;
                let _ = cell.set_attribute("class", "grid-cell");
                grid.append_child(&cell).ok()?;
                Some(cell)
            })
            .collect()
    }

    fn on_click(element: &Element, inputs: &InputQueue, input: Input) {
        let inputs = inputs.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            inputs.borrow_mut().push(input);
        });
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, inputs: &InputQueue) {
        let buttons = [
            ("start-game", Input::RequestStart),
            ("try-again", Input::RequestStart),
            ("reset-game", Input::ResetCurrent),
            ("reset-all", Input::ResetAll),
        ];
        for (id, input) in buttons {
            match document.get_element_by_id(id) {
                Some(btn) => on_click(&btn, inputs, input),
                None => log::warn!("Button #{} missing", id),
            }
        }

        // Difficulty buttons name their tier; anything unexpected plays Normal
        if let Ok(list) = document.query_selector_all("[data-difficulty]") {
            for i in 0..list.length() {
                let Some(btn) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let tier = Difficulty::resolve(&btn.get_attribute("data-difficulty").unwrap_or_default());
                on_click(&btn, inputs, Input::ChooseDifficulty(tier));
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window - game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use water_quest::game::SpawnedIcon;
    use water_quest::platform::MemoryStore;
    use water_quest::present::{Presenter, Silent, dispatch};
    use water_quest::{Difficulty, IconKind, RoundController, RoundPhase};

    const FRAME: Duration = Duration::from_millis(16);
    /// How long the bot waits before clicking an icon
    const REACTION_MS: u64 = 250;

    /// Presenter that narrates to the log
    struct LogView;

    impl Presenter for LogView {
        fn render_icon(&mut self, icon: &SpawnedIcon) {
            log::debug!("{} in cell {}", icon.kind.as_str(), icon.cell);
        }
        fn remove_icon(&mut self, cell: usize) {
            log::debug!("cell {} cleared", cell);
        }
        fn clear_grid(&mut self) {
            log::debug!("grid cleared");
        }
        fn update_score(&mut self, score: u32) {
            log::info!("Cans: {}", score);
        }
        fn update_timer(&mut self, seconds: u32) {
            log::debug!("Time: {}s", seconds);
        }
        fn update_high_score(&mut self, score: u32) {
            log::info!("High score: {}", score);
        }
        fn show_round_over(&mut self, final_score: u32, is_new_high_score: bool) {
            log::info!(
                "Your final score: {}{}",
                final_score,
                if is_new_high_score { " - new record!" } else { "" }
            );
        }
        fn hide_round_over(&mut self) {}
        fn show_difficulty_choice(&mut self) {
            log::info!("Choose a difficulty: easy / normal / hard");
        }
        fn hide_difficulty_choice(&mut self) {}
        fn show_milestone(&mut self, message: &str) {
            log::info!("{}", message);
        }
        fn celebrate(&mut self) {
            log::info!("*** confetti ***");
        }
    }

    /// Play one normal round, clicking everything but hazards
    pub fn play() {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut game = RoundController::new(seed, MemoryStore::new());
        let mut view = LogView;

        game.request_start();
        game.choose_difficulty(Difficulty::Normal);
        dispatch(game.drain_events(), &mut view, &mut Silent);

        let mut elapsed_ms = 0;
        while game.phase() == RoundPhase::Running {
            game.advance(FRAME);
            elapsed_ms += FRAME.as_millis() as u64;

            if let Some(icon) = game.active_icon().copied() {
                let ready = elapsed_ms.saturating_sub(icon.created_at_ms) >= REACTION_MS;
                if ready && !icon.clicked && icon.kind != IconKind::Hazard {
                    game.click(icon.id);
                }
            }
            dispatch(game.drain_events(), &mut view, &mut Silent);
        }

        println!(
            "Demo round finished: {} cans on {} (seed {})",
            game.score(),
            game.difficulty().as_str(),
            seed
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Water Quest (native) starting...");
    log::info!("Native mode has no UI - build for wasm32 to play; running a demo round");

    demo::play();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
