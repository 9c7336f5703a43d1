use gloo::events::EventListener;
use shared::{format_percent, ResponseRecord};
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, MouseEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ThankYouModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub data: Option<ResponseRecord>,
    pub period: AttrValue,
}

/// Confirmation shown after a response is stored.
///
/// Closes on a backdrop click, the Close button, or Escape.
#[function_component(ThankYouModal)]
pub fn thank_you_modal(props: &ThankYouModalProps) -> Html {
    use_effect_with(props.open, {
        let on_close = props.on_close.clone();
        move |open: &bool| {
            let listener = if *open {
                web_sys::window().map(|window| {
                    EventListener::new(&window, "keydown", move |event| {
                        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                            if event.key() == "Escape" {
                                on_close.emit(());
                            }
                        }
                    })
                })
            } else {
                None
            };
            move || drop(listener)
        }
    });

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.open {
        return html! {};
    }

    html! {
        <div class="modal-overlay" role="dialog" aria-modal="true" onclick={on_backdrop_click}>
            <div class="modal" role="document" onclick={on_modal_click}>
                <div class="modal-header">
                    <h3>{"Thank you!"}</h3>
                    <div class="modal-sub">
                        {format!("Your response for {} has been recorded.", props.period)}
                    </div>
                </div>

                {if let Some(data) = &props.data {
                    html! {
                        <div class="modal-content">
                            <div class="stats-row">
                                {stat("Innovation", data.innovation)}
                                {stat("Equality", data.equality)}
                                {stat("Stability", data.stability)}
                            </div>
                        </div>
                    }
                } else {
                    html! {
                        <div class="modal-content">
                            <div class="modal-note">
                                {"We recorded your submission. Thank you for participating!"}
                            </div>
                        </div>
                    }
                }}

                <div class="modal-actions">
                    <button type="button" class="button" onclick={on_close_click}>{"Close"}</button>
                </div>
            </div>
        </div>
    }
}

fn stat(label: &'static str, value: f64) -> Html {
    html! {
        <div class="stat">
            <div class="stat-label">{label}</div>
            <div class="stat-value">{format_percent(value)}</div>
        </div>
    }
}
