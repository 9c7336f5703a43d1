use shared::{format_percent, Period, Triangle};
use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::components::thank_you_modal::ThankYouModal;
use crate::hooks::use_ternary_input::use_ternary_input;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct TernaryInputProps {
    pub period: Period,
    pub title: AttrValue,
    #[prop_or_default]
    pub api_client: ApiClient,
}

/// Clickable triangle: innovation bottom-left, equality bottom-right,
/// stability at the top.
#[function_component(TernaryInput)]
pub fn ternary_input(props: &TernaryInputProps) -> Html {
    let svg_ref = use_node_ref();
    let ternary = use_ternary_input(&props.period, &props.api_client);
    let state = ternary.state;
    let viewport = state.viewport;

    let on_click = {
        let svg_ref = svg_ref.clone();
        let on_point = ternary.actions.on_point.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(svg) = svg_ref.cast::<Element>() else {
                return;
            };
            let rect = svg.get_bounding_client_rect();
            let x = e.client_x() as f64 - rect.left();
            let y = e.client_y() as f64 - rect.top();
            on_point.emit(viewport.map_rendered(x, y, rect.width(), rect.height()));
        })
    };

    let on_submit_click = {
        let on_submit = ternary.actions.on_submit.clone();
        Callback::from(move |_: MouseEvent| on_submit.emit(()))
    };

    let polygon_points = Triangle::from_viewport(viewport)
        .map(|triangle| triangle.svg_points())
        .unwrap_or_default();

    html! {
        <article class="card">
            <div class="triangle-wrap">
                <h3>{&props.title}</h3>

                <svg
                    ref={svg_ref}
                    class="ternary-canvas"
                    viewBox={format!("0 0 {} {}", viewport.width, viewport.height)}
                    preserveAspectRatio="xMidYMid meet"
                    onclick={on_click}
                    style="width: 100%; height: auto"
                >
                    <polygon points={polygon_points} fill="#f1f5f9" stroke="#e2e8f0" stroke-width="2" />
                    <text x="18" y="352" class="label">{"Innovation"}</text>
                    <text x="320" y="352" class="label">{"Equality"}</text>
                    <text x="180" y="24" class="label" text-anchor="middle">{"Stability"}</text>

                    {if let Some(marker) = state.marker {
                        html! {
                            <circle
                                cx={marker.x.to_string()}
                                cy={marker.y.to_string()}
                                r="8"
                                fill="#2563eb"
                                stroke="#fff"
                                stroke-width="2"
                            />
                        }
                    } else {
                        html! {}
                    }}
                </svg>

                <div class="info small">
                    {if state.submitted {
                        html! {
                            <div>
                                <strong>{"Submitted"}</strong>
                                <div>{"Your recorded proportions (approx):"}</div>
                                {if let Some(record) = &state.last_submission {
                                    html! {
                                        <div>
                                            {format!(
                                                "Innovation: {} · Equality: {} · Stability: {}",
                                                format_percent(record.innovation),
                                                format_percent(record.equality),
                                                format_percent(record.stability),
                                            )}
                                        </div>
                                    }
                                } else {
                                    html! {
                                        <div class="small">{"You submitted previously for this year."}</div>
                                    }
                                }}
                            </div>
                        }
                    } else {
                        html! {
                            <>
                                <div>{"Click inside the triangle to place a dot representing the balance."}</div>
                                <div class="submit-row">
                                    <button
                                        class="button"
                                        onclick={on_submit_click}
                                        disabled={state.submitting}
                                    >
                                        {format!("Submit for {}", props.period)}
                                    </button>
                                </div>
                                <div class="hint">
                                    {"Innovation · Equality · Stability: values sum to 100%."}
                                </div>
                            </>
                        }
                    }}
                    {if let Some(status) = &state.status {
                        html! { <div class="status">{status}</div> }
                    } else {
                        html! {}
                    }}
                </div>
            </div>

            <ThankYouModal
                open={state.confirmation.open}
                on_close={ternary.actions.on_close_confirmation.clone()}
                data={state.confirmation.data.clone()}
                period={state.confirmation.period.clone()}
            />
        </article>
    }
}
