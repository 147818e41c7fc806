//! Utility functions for the store-return form: talking to the backend and
//! showing short-lived notifications.

use common::model::submission::Submission;
use common::requests::SubmitResponse;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

const SUBMIT_URL: &str = "/api/returns/submit";

/// Posts the submission and decodes the server's `SubmitResponse`.
///
/// `200`, `422` and `500` all carry a `SubmitResponse` body; any other status
/// (for example a `400` for a body the server could not parse) is returned as
/// an error string.
pub async fn post_submission(submission: &Submission) -> Result<SubmitResponse, String> {
    let resp = Request::post(SUBMIT_URL)
        .json(submission)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    match resp.status() {
        200 | 422 | 500 => resp
            .json::<SubmitResponse>()
            .await
            .map_err(|e| e.to_string()),
        status => Err(format!("Server answered {}", status)),
    }
}

/// Displays a temporary notification message at the bottom of the screen.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}
