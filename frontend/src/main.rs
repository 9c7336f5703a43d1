use shared::Period;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::ternary_input::TernaryInput;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let period = use_memo((), |_| Period::current());
    let api_client = use_memo((), |_| ApiClient::new());

    html! {
        <main class="container">
            <header class="header">
                <h1>{"Innovation · Equality · Stability"}</h1>
                <p class="small">
                    {"Where should the balance sit? Place one dot per year."}
                </p>
            </header>

            <TernaryInput
                period={(*period).clone()}
                title={format!("Your balance for {}", period)}
                api_client={(*api_client).clone()}
            />
        </main>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
