use crate::settings::{LocalStore, SettingsView, apply_css_properties};
use crate::utils::*;
use tilesweep_core::{Coord, Coord2, Session, SessionState, Settings, TileStatus};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum ViewTile {
    Hidden,
    Opened(u8),
    Marked,
    TriggeredMine,
    Mine,
}

pub(crate) fn view_tile(session: Option<&Session>, coords: Coord2) -> ViewTile {
    let Some(session) = session else {
        return ViewTile::Hidden;
    };
    let Ok(tile) = session.board().tile_at(coords) else {
        return ViewTile::Hidden;
    };

    match tile.status {
        TileStatus::Hidden => ViewTile::Hidden,
        TileStatus::Opened => ViewTile::Opened(tile.adjacent_mine_count),
        TileStatus::Marked => ViewTile::Marked,
        TileStatus::RevealedMine if session.triggered_mine() == Some(coords) => {
            ViewTile::TriggeredMine
        }
        TileStatus::RevealedMine => ViewTile::Mine,
    }
}

/// Only board size and mine count shape the board; tile size is purely visual.
pub(crate) fn needs_new_board(old: &Settings, new: &Settings) -> bool {
    old.board_config() != new.board_config()
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(Coord2),
    ToggleFlag(Coord2),
    NewGame,
    UpdateSettings(Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    x: Coord,
    y: Coord,
    tile: ViewTile,
    #[prop_or_default]
    locked: bool,
    on_reveal: Callback<Coord2>,
    on_flag: Callback<Coord2>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    use ViewTile::*;

    let TileProps {
        x,
        y,
        tile,
        locked,
        on_reveal,
        on_flag,
    } = props.clone();

    let mut class = classes!(
        "tile",
        match tile {
            Hidden => classes!("hidden"),
            Opened(count) => classes!("opened", format!("num-{}", count)),
            Marked => classes!("marked"),
            TriggeredMine => classes!("mine", "oops"),
            Mine => classes!("mine"),
        }
    );
    if locked {
        class.push("locked");
    }

    let label = match tile {
        Opened(count) if count > 0 => count.to_string(),
        _ => String::new(),
    };

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) primary click", x, y);
        on_reveal.emit((x, y));
    });

    let oncontextmenu = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        log::trace!("({}, {}) secondary click", x, y);
        on_flag.emit((x, y));
    });

    html! {
        <td {class} data-x={x.to_string()} data-y={y.to_string()} {onclick} {oncontextmenu}>
            {label}
        </td>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    store: LocalStore,
    session: Option<Session>,
    forced_seed: Option<u64>,
}

impl GameView {
    /// The board is generated on the first move after a reset.
    fn get_or_create_session(&mut self) -> Option<&mut Session> {
        if self.session.is_none() {
            let seed = self.forced_seed.unwrap_or_else(js_random_seed);
            match Session::new(self.settings.board_config(), seed) {
                Ok(session) => self.session = Some(session),
                Err(err) => {
                    log::error!("Could not create board for {:?}: {}", self.settings, err);
                    return None;
                }
            }
        }
        self.session.as_mut()
    }

    fn get_size(&self) -> Coord {
        self.session
            .as_ref()
            .map(|session| session.board().size())
            .unwrap_or(self.settings.board_config().size)
    }

    fn get_mines_left(&self) -> isize {
        self.session
            .as_ref()
            .map(|session| session.mines_left())
            .unwrap_or(self.settings.board_config().mines as isize)
    }

    fn get_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Active, |session| session.state())
    }

    fn reveal_tile(&mut self, coords: Coord2) -> bool {
        let Some(session) = self.get_or_create_session() else {
            return false;
        };

        match session.reveal(coords) {
            Ok(outcome) => {
                log::debug!("reveal {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Err(err) => {
                log::warn!("reveal {:?} rejected: {}", coords, err);
                false
            }
        }
    }

    fn flag_tile(&mut self, coords: Coord2) -> bool {
        let Some(session) = self.get_or_create_session() else {
            return false;
        };

        match session.toggle_flag(coords) {
            Ok(outcome) => {
                log::debug!("flag {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Err(err) => {
                log::warn!("flag {:?} rejected: {}", coords, err);
                false
            }
        }
    }

    fn endgame_modal(&self) -> Html {
        let text = match self.get_state() {
            SessionState::Active => return html! {},
            SessionState::Won => "You won!",
            SessionState::Lost => "You lost.",
        };

        html! {
            <Modal>
                <div id="modalEndgame" class="show">{text}</div>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let store = LocalStore;
        let settings = Settings::load(&store);
        apply_css_properties(&settings);

        Self {
            settings,
            store,
            session: None,
            forced_seed: ctx.props().seed,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Reveal(coords) => self.reveal_tile(coords),
            ToggleFlag(coords) => self.flag_tile(coords),
            NewGame => {
                log::debug!("new game");
                self.session.take().is_some()
            }
            UpdateSettings(settings) => {
                if self.settings == settings {
                    return false;
                }
                log::debug!("settings changed: {:?}", settings);
                if needs_new_board(&self.settings, &settings) {
                    self.session = None;
                }
                self.settings = settings;
                self.settings.save(&mut self.store);
                apply_css_properties(&self.settings);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let size = self.get_size();
        let session = self.session.as_ref();
        let locked = self.get_state().is_finished();
        let mines_left = format_for_counter(self.get_mines_left());

        let on_reveal = ctx.link().callback(Msg::Reveal);
        let on_flag = ctx.link().callback(Msg::ToggleFlag);
        let on_settings = ctx.link().callback(Msg::UpdateSettings);
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <div class="tilesweep" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <SettingsView settings={self.settings} on_change={on_settings}/>
                <nav>
                    <aside id="minesLeft"><span>{mines_left}</span></aside>
                    <button onclick={cb_new_game}>{"New game"}</button>
                </nav>
                <table id="board" class={(!locked).then_some("playable")}>
                    {
                        for (0..size).map(|y| html! {
                            <tr>
                                {
                                    for (0..size).map(|x| {
                                        let tile = view_tile(session, (x, y));
                                        let on_reveal = on_reveal.clone();
                                        let on_flag = on_flag.clone();
                                        html! {
                                            <TileView {x} {y} {tile} {locked} {on_reveal} {on_flag}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                { self.endgame_modal() }
            </div>
        }
    }
}
