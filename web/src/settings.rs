use gloo::storage::{LocalStorage, Storage};
use tilesweep_core::{CellCount, Coord, Settings, SettingsStore, TileSize};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement};
use yew::prelude::*;

/// Settings persisted as plain strings in the browser's local storage.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocalStore;

impl SettingsStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("Could not read {} from local storage: {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(key, value) {
            log::error!("Could not save {} to local storage: {:?}", key, err);
        }
    }
}

/// Pushes board and tile size into the `--boardSize` and `--tileSize` CSS variables.
pub(crate) fn apply_css_properties(settings: &Settings) {
    use gloo::utils::document;

    let Some(root) = document()
        .document_element()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        log::error!("no html element to set CSS properties on");
        return;
    };

    let style = root.style();
    let properties = [
        ("--boardSize", settings.board_size.to_string()),
        ("--tileSize", settings.tile_size.to_string()),
    ];
    for (name, value) in properties {
        log::debug!("{}: {}", name, value);
        if let Err(err) = style.set_property(name, &value) {
            log::error!("failed to set {}: {:?}", name, err);
        }
    }
}

/// Reads a whole number from an input, saturating at `max` when it does not fit.
fn parse_count<T: TryFrom<u64>>(value: &str, max: T) -> Option<T> {
    let number: u64 = value.trim().parse().ok()?;
    Some(T::try_from(number).unwrap_or(max))
}

fn parse_board_size(value: &str) -> Option<Coord> {
    parse_count(value, Coord::MAX)
}

fn parse_mine_count(value: &str) -> Option<CellCount> {
    parse_count(value, CellCount::MAX)
}

fn input_callback(
    settings: Settings,
    on_change: &Callback<Settings>,
    update: fn(Settings, &str) -> Option<Settings>,
) -> Callback<Event> {
    let on_change = on_change.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let value = input.value();
        match update(settings, &value) {
            Some(updated) => on_change.emit(updated),
            None => log::warn!("ignoring setting value {:?}", value),
        }
    })
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    pub settings: Settings,
    pub on_change: Callback<Settings>,
}

/// Board size, mine count and tile size inputs. Every accepted edit emits the clamped settings.
#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let settings = props.settings;
    let on_change = &props.on_change;

    let onchange_board_size = input_callback(settings, on_change, |settings, value| {
        parse_board_size(value).map(|n| settings.with_board_size(n))
    });
    let onchange_mine_count = input_callback(settings, on_change, |settings, value| {
        parse_mine_count(value).map(|n| settings.with_mine_count(n))
    });
    let onchange_tile_size = input_callback(settings, on_change, |settings, value| {
        value
            .parse::<TileSize>()
            .ok()
            .map(|size| settings.with_tile_size(size))
    });

    html! {
        <form class="settings" onsubmit={Callback::from(|e: SubmitEvent| e.prevent_default())}>
            <label>
                {"Board size"}
                <input id="boardSizeInput" type="number" min="3" max="255"
                    value={settings.board_size.to_string()} onchange={onchange_board_size}/>
            </label>
            <label>
                {"Mines"}
                <input id="minesLeftInput" type="number" min="0"
                    value={settings.mine_count.to_string()} onchange={onchange_mine_count}/>
            </label>
            <label>
                {"Tile size"}
                <input id="tileSizeInput" type="number" min="1"
                    value={settings.tile_size.pixels().to_string()} onchange={onchange_tile_size}/>
            </label>
        </form>
    }
}
