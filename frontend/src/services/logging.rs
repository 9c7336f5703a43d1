use gloo::net::http::Request;
use shared::LogRequest;
use wasm_bindgen_futures::spawn_local;

use crate::services::api::ApiClient;

/// Log forwarding route on the record store host
fn log_endpoint(base_url: &str) -> String {
    format!("{}/api/logs", base_url.trim_end_matches('/'))
}

/// Mirrors diagnostics to the browser console and the backend log
#[derive(Clone, PartialEq)]
pub struct Logger {
    endpoint: String,
}

impl Logger {
    /// Forward to the same host the responses go to
    pub fn for_client(api_client: &ApiClient) -> Self {
        Self {
            endpoint: log_endpoint(api_client.base_url()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn info_with_component(&self, component: &str, message: &str) {
        gloo::console::log!(format!("[{}] {}", component, message));
        self.log("info", message, Some(component.to_string()));
    }

    pub fn warn_with_component(&self, component: &str, message: &str) {
        gloo::console::warn!(format!("[{}] {}", component, message));
        self.log("warn", message, Some(component.to_string()));
    }

    pub fn error_with_component(&self, component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
        self.log("error", message, Some(component.to_string()));
    }

    fn log(&self, level: &str, message: &str, component: Option<String>) {
        let request = LogRequest {
            level: level.to_string(),
            message: message.to_string(),
            component,
        };
        let endpoint = self.endpoint.clone();

        // Fire and forget; a lost log line must not disturb the widget
        spawn_local(async move {
            if let Ok(builder) = Request::post(&endpoint).json(&request) {
                let _ = builder.send().await;
            }
        });
    }
}
