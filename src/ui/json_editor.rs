use dioxus::prelude::*;

use crate::io::json_codec;
use crate::notify::Notifier;
use crate::state::surface::GridSurface;
use crate::ui::toasts::ToastSink;

/// Raw-JSON editor pane: the persisted dataset as editable text with live
/// syntax feedback. Applying replaces the grid's dataset.
#[component]
pub fn JsonEditorPanel(
    surface: Signal<GridSurface>,
    show_json_editor: Signal<bool>,
    sink: ToastSink,
) -> Element {
    let mut draft =
        use_signal(|| json_codec::format_json(&surface.peek().persisted()).unwrap_or_default());
    let mut syntax_error = use_signal::<Option<String>>(|| None);

    let error = syntax_error.read().clone();
    let can_apply = error.is_none();

    rsx! {
        div { class: "json-editor", id: "json-editor",
            div { class: "json-editor-header",
                h3 { "Raw JSON" }
                button {
                    class: "panel-close",
                    id: "btn-close-json-editor",
                    onclick: move |_| {
                        let mut show_json_editor = show_json_editor;
                        show_json_editor.set(false);
                    },
                    "\u{2715}"
                }
            }
            textarea {
                class: "json-editor-input",
                id: "input-json-editor",
                spellcheck: "false",
                placeholder: "Enter JSON data...",
                value: "{draft.read()}",
                oninput: move |evt| {
                    let text = evt.value();
                    syntax_error.set(
                        json_codec::validate_json(&text).err().map(|err| err.to_string()),
                    );
                    draft.set(text);
                }
            }
            if let Some(message) = error {
                div { class: "json-editor-error", id: "json-editor-error", "{message}" }
            }
            div { class: "json-editor-actions",
                button {
                    class: "toolbar-btn",
                    id: "btn-refresh-json",
                    onclick: move |_| {
                        let text = json_codec::format_json(&surface.peek().persisted())
                            .unwrap_or_default();
                        draft.set(text);
                        syntax_error.set(None);
                    },
                    "Refresh"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-apply-json",
                    disabled: !can_apply,
                    onclick: move |_| {
                        let text = draft.peek().clone();
                        match json_codec::parse_json(&text) {
                            Ok(data) => {
                                let rows = data.len();
                                surface.with_mut(|s| s.replace_data(data));
                                sink.success(format!("Applied JSON ({rows} rows)"));
                            }
                            Err(err) => sink.error(format!("Invalid JSON: {err}")),
                        }
                    },
                    "Apply"
                }
            }
        }
    }
}
