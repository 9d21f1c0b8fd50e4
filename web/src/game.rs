use apagonito_core as game;
use bitflags::bitflags;
use chrono::prelude::*;
use gloo::timers::callback::Interval;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::settings::{Settings, SettingsView};
use crate::utils::*;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Dark,
    Lit,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewGameState {
    Ready,
    Active,
    Won,
    WonAtStart,
}

impl ViewGameState {
    fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::WonAtStart)
    }
}

/// One game plus the bookkeeping the engine itself does not carry: wall-clock
/// timestamps and the number of accepted presses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameSession {
    pub engine: game::PlayEngine,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub move_count: u32,
}

impl GameSession {
    fn new(engine: game::PlayEngine) -> Self {
        Self {
            engine,
            started_at: None,
            ended_at: None,
            move_count: 0,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn view_state(&self) -> ViewGameState {
        use game::EngineState::*;
        match self.engine.state() {
            Playing if self.move_count == 0 => ViewGameState::Ready,
            Playing => ViewGameState::Active,
            // The generator can deal an already-dark board.
            Won if self.move_count == 0 => ViewGameState::WonAtStart,
            Won => ViewGameState::Won,
        }
    }

    fn cell_state_at(&self, coords: game::Coord2) -> ViewCellState {
        if self.engine.is_lit(coords) {
            ViewCellState::Lit
        } else {
            ViewCellState::Dark
        }
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        self.move_count = self.move_count.saturating_add(1);

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "apagonito:game:v1";
}

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<game::PressOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome: game::PressOutcome| outcome.has_update())
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    UpdateTime,
    NewGame,
    ToggleSettings,
    UpdateSettings(Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: game::Coord,
    y: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        x,
        y,
        cell_state,
        pressed,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Dark => classes!(),
            Lit => classes!("lit"),
        }
    );
    if pressed {
        class.push("pressed");
    }
    if locked {
        class.push("locked");
    }

    let onmousedown = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            let pointer_state = CellPointerState {
                pos: (x, y),
                buttons,
            };
            callback.emit(CellMsg::Update(pointer_state));
            log::trace!("({}, {}) mouse down ({:?})", x, y, buttons);
        })
    };

    let onmouseup = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            let pointer_state = CellPointerState {
                pos: (x, y),
                buttons,
            };
            callback.emit(CellMsg::Update(pointer_state));
            log::trace!("({}, {}) mouse up ({:?})", x, y, buttons);
        })
    };

    let onmouseenter = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            let pointer_state = CellPointerState {
                pos: (x, y),
                buttons,
            };
            callback.emit(CellMsg::Update(pointer_state));
            log::trace!("({}, {}) mouse enter ({:?})", x, y, buttons);
        })
    };

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Leave);
            log::trace!("({}, {}) mouse leave ({:?})", x, y, buttons);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}/>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    pub(crate) seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    game: GameSession,
    seed: u64,
    prev_time: u32,
    settings_open: bool,
    current_cell_state: Option<CellPointerState>,
    _timer_interval: Interval,
}

fn create_session(seed: u64, config: game::GameConfig) -> GameSession {
    use game::GridGenerator;

    let grid = game::RandomGridGenerator::new(seed).generate(config);
    GameSession::new(game::PlayEngine::new(grid))
}

impl GameView {
    fn get_time(&self) -> u32 {
        self.game.elapsed_secs(utc_now())
    }

    fn is_mid_press(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn get_game_state_class(&self) -> Classes {
        let mid_press = self.is_mid_press();

        classes!(match self.game.view_state() {
            ViewGameState::Ready | ViewGameState::Active if mid_press => "mid-press",
            ViewGameState::Ready => "not-started",
            ViewGameState::Active => "in-progress",
            ViewGameState::Won => "win",
            ViewGameState::WonAtStart => "instant-win",
        })
    }

    fn is_playable(&self) -> bool {
        !self.game.view_state().is_finished()
    }

    fn is_pressed(&self, coords: game::Coord2) -> bool {
        if self.game.view_state().is_finished() {
            return false;
        }

        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if pos == coords
        )
    }

    fn press_cell(&mut self, coords: game::Coord2) -> bool {
        let now = utc_now();

        let updated = self.game.engine.press(coords).has_update();
        if updated {
            self.game.on_successful_move(now);
        }

        updated
    }

    fn start_new_game(&mut self) {
        self.seed = js_random_seed();
        self.game = create_session(self.seed, self.settings.game_config);
        self.current_cell_state = None;
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings = Settings::local_or_default();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);

        // The initial lit pattern has to be on screen before the first press,
        // so the session is built eagerly when no saved game is found.
        let game =
            GameSession::local_restore().unwrap_or_else(|| create_session(seed, settings.game_config));

        Self {
            settings,
            game,
            seed,
            prev_time: 0,
            settings_open: false,
            current_cell_state: None,
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        let updated = match msg {
            CellEvent(Leave) => {
                log::trace!("cell leave");
                self.current_cell_state.take().is_some()
            }
            CellEvent(Update(cell_state)) => {
                log::trace!("cell update: {:?}", cell_state);
                if cell_state.buttons.is_empty() {
                    match self.current_cell_state.take() {
                        None => false,
                        Some(CellPointerState { pos, buttons }) => match buttons {
                            MouseButtons::LEFT => {
                                log::debug!("press cell: {:?}", pos);
                                self.press_cell(pos);
                                true
                            }
                            _ => true,
                        },
                    }
                } else {
                    match self.current_cell_state.replace(cell_state) {
                        None => true,
                        Some(CellPointerState { pos, buttons }) => {
                            (pos != cell_state.pos)
                                || ((buttons & MouseButtons::LEFT)
                                    != (cell_state.buttons & MouseButtons::LEFT))
                        }
                    }
                }
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.start_new_game();
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                if !self.settings_open {
                    self.settings = Settings::local_or_default();
                }
                true
            }
            UpdateSettings(settings) => {
                self.settings_open = false;
                if self.settings != settings {
                    self.settings = settings;
                    self.settings.local_save();
                    self.start_new_game();
                }
                true
            }
        };

        self.game.local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let (cols, rows) = self.game.engine.size();
        let game_state_class = self.get_game_state_class();
        let is_playable = self.is_playable();
        let locked = !is_playable;
        let lights_left = format_for_counter(self.game.engine.lights_left().into());
        let elapsed_time = format_for_counter(self.get_time());

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_show_settings = ctx.link().callback(|_| ToggleSettings);
        let cb_apply_settings = ctx.link().callback(UpdateSettings);
        let cb_close_settings = ctx.link().callback(|_| ToggleSettings);

        html! {
            <div class="apagonito">
                <small onclick={cb_show_settings}>{"···"}</small>
                <nav>
                    <aside>{lights_left}</aside>
                    <span><button class={game_state_class} onclick={cb_new_game}/></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <table class={is_playable.then_some("playable")}>
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let pos = (x, y);
                                        let cell_state = self.game.cell_state_at(pos);
                                        let pressed = self.is_pressed(pos);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {x} {y} {cell_state} {callback} {pressed} {locked}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <Modal>
                    <SettingsView
                        open={self.settings_open}
                        on_apply={cb_apply_settings}
                        on_close={cb_close_settings}/>
                </Modal>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(secs * 1000).unwrap()
    }

    fn session(size: game::Coord2, lit: &[game::Coord2]) -> GameSession {
        let grid = game::LightGrid::from_lit_coords(size, lit).unwrap();
        GameSession::new(game::PlayEngine::new(grid))
    }

    #[test]
    fn fresh_session_is_ready_until_the_first_press() {
        let mut session = session((3, 3), &[(0, 0)]);
        assert_eq!(session.view_state(), ViewGameState::Ready);

        assert!(session.engine.press((2, 2)).has_update());
        session.on_successful_move(t(0));

        assert_eq!(session.view_state(), ViewGameState::Active);
    }

    #[test]
    fn clearing_the_board_maps_to_win() {
        let mut session = session((3, 3), &[(1, 1), (1, 0), (0, 1), (2, 1)]);

        assert!(session.engine.press((1, 1)).has_update());
        session.on_successful_move(t(5));

        assert_eq!(session.view_state(), ViewGameState::Won);
        assert!(session.view_state().is_finished());
    }

    #[test]
    fn dark_deal_maps_to_instant_win() {
        let session = session((2, 2), &[]);
        assert_eq!(session.view_state(), ViewGameState::WonAtStart);
        assert!(session.view_state().is_finished());
    }

    #[test]
    fn bookkeeping_tracks_first_and_final_move() {
        // Press (2,0) lights the east pair, press (1,0) then clears the row.
        let mut session = session((3, 1), &[(0, 0)]);

        assert!(session.engine.press((2, 0)).has_update());
        session.on_successful_move(t(3));
        assert_eq!(session.started_at, Some(t(3)));
        assert_eq!(session.ended_at, None);

        assert!(session.engine.press((1, 0)).has_update());
        session.on_successful_move(t(9));
        assert_eq!(session.started_at, Some(t(3)));
        assert_eq!(session.ended_at, Some(t(9)));
        assert_eq!(session.move_count, 2);
        assert_eq!(session.view_state(), ViewGameState::Won);
    }

    #[test]
    fn elapsed_time_freezes_once_the_game_ends() {
        let mut session = session((3, 1), &[(0, 0)]);
        assert_eq!(session.elapsed_secs(t(100)), 0);

        session.engine.press((2, 0)).unwrap();
        session.on_successful_move(t(10));
        assert_eq!(session.elapsed_secs(t(14)), 4);

        session.engine.press((1, 0)).unwrap();
        session.on_successful_move(t(17));
        assert_eq!(session.elapsed_secs(t(100)), 7);
    }

    #[test]
    fn cell_states_mirror_the_grid() {
        let session = session((2, 2), &[(0, 1)]);
        assert_eq!(session.cell_state_at((0, 1)), ViewCellState::Lit);
        assert_eq!(session.cell_state_at((1, 1)), ViewCellState::Dark);
    }

    #[test]
    fn press_after_win_does_not_count_as_a_move() {
        let mut session = session((2, 1), &[(0, 0), (1, 0)]);

        assert!(session.engine.press((0, 0)).has_update());
        session.on_successful_move(t(0));

        assert!(!session.engine.press((0, 0)).has_update());
        assert_eq!(session.move_count, 1);
    }

    #[test]
    fn storage_key_uses_versioned_namespace() {
        assert_eq!(<GameSession as StorageKey>::KEY, "apagonito:game:v1");
    }
}
