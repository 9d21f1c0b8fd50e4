use apagonito_core as game;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::theme::Theme;
use crate::utils::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub game_config: game::GameConfig,
}

impl Settings {
    /// Named boards offered in the dialog. Classic is the 5x5 board the
    /// puzzle is best known for.
    pub(crate) const PRESETS: &'static [(&'static str, game::GameConfig)] = &[
        ("Classic", game::GameConfig::new_unchecked((5, 5), 0.5)),
        ("Standard", game::GameConfig::new_unchecked((8, 8), 0.5)),
        ("Large", game::GameConfig::new_unchecked((12, 12), 0.5)),
    ];
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_config: game::GameConfig::default(),
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "apagonito:settings:v1";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub on_apply: Callback<Settings>,
    pub on_close: Callback<()>,
}

fn input_value<T: core::str::FromStr>(node: &NodeRef) -> Option<T> {
    node.cast::<HtmlInputElement>()?.value().parse().ok()
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let current = Settings::local_or_default();
    let cols_ref = use_node_ref();
    let rows_ref = use_node_ref();
    let chance_ref = use_node_ref();

    let on_apply = {
        let cols_ref = cols_ref.clone();
        let rows_ref = rows_ref.clone();
        let chance_ref = chance_ref.clone();
        let on_apply = props.on_apply.clone();
        Callback::from(move |_: MouseEvent| {
            // Fields that fail to parse fall back to the stored settings;
            // GameConfig::new clamps whatever comes out of the form.
            let cols = input_value(&cols_ref).unwrap_or(current.game_config.size.0);
            let rows = input_value(&rows_ref).unwrap_or(current.game_config.size.1);
            let chance = input_value(&chance_ref).unwrap_or(current.game_config.chance_lit);
            on_apply.emit(Settings {
                game_config: game::GameConfig::new((cols, rows), chance),
            });
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let preset_item = |label: &'static str, config: game::GameConfig| {
        let on_apply = props.on_apply.clone();
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_apply.emit(Settings {
                game_config: config,
            });
        });
        html! { <li><a href="#" {onclick}>{label}</a></li> }
    };

    let theme_item = |label: &'static str, theme: Option<Theme>| {
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            Theme::apply(theme);
        });
        html! { <li><a href="#" {onclick}>{label}</a></li> }
    };

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Settings"}</h2>
                <label>{"Columns"}
                    <input ref={cols_ref.clone()} type="number" min="1" max="255"
                        value={current.game_config.size.0.to_string()}/>
                </label>
                <label>{"Rows"}
                    <input ref={rows_ref.clone()} type="number" min="1" max="255"
                        value={current.game_config.size.1.to_string()}/>
                </label>
                <label>{"Chance a light starts on"}
                    <input ref={chance_ref.clone()} type="range" min="0" max="1" step="0.05"
                        value={current.game_config.chance_lit.to_string()}/>
                </label>
                <h3>{"Boards"}</h3>
                <ul>
                    { for Settings::PRESETS.iter().map(|&(label, config)| preset_item(label, config)) }
                </ul>
                <h3>{"Theme"}</h3>
                <ul>
                    { theme_item("Auto", None) }
                    { theme_item("Light", Some(Theme::Light)) }
                    { theme_item("Dark", Some(Theme::Dark)) }
                </ul>
                <footer>
                    <button onclick={on_cancel} type="reset">{"Cancel"}</button>
                    <button onclick={on_apply}>{"Apply"}</button>
                </footer>
            </article>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_core_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.game_config.size, (8, 8));
        assert_eq!(settings.game_config.chance_lit, 0.5);
    }

    #[test]
    fn presets_survive_config_validation_unchanged() {
        for &(_, config) in Settings::PRESETS {
            assert_eq!(config, game::GameConfig::new(config.size, config.chance_lit));
        }
    }

    #[test]
    fn storage_key_uses_versioned_namespace() {
        assert_eq!(<Settings as StorageKey>::KEY, "apagonito:settings:v1");
    }
}
