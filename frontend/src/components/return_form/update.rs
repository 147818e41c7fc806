//! Update function for the store-return form.
//!
//! `Msg::Submit` runs the shared validation first and only posts when it
//! passes. A server answer replaces the error list; a successful export
//! clears the form for the next entry.

use common::model::submission::Row;
use common::requests::SubmitResponse;
use common::validation::validate;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{post_submission, show_toast};
use super::messages::Msg;
use super::state::ReturnFormComponent;

pub fn update(
    component: &mut ReturnFormComponent,
    ctx: &Context<ReturnFormComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::SetHeader(field, value) => {
            component.set_header(field, value);
            true
        }
        Msg::SetRow(idx, field, value) => {
            component.set_row(idx, field, value);
            true
        }
        Msg::AddRow => {
            component.submission.rows.push(Row::default());
            true
        }
        Msg::RemoveRow(idx) => {
            // The form always keeps one row to type into.
            if component.submission.rows.len() > 1 && idx < component.submission.rows.len() {
                component.submission.rows.remove(idx);
                // Row numbers shifted; stale messages would point at the wrong rows.
                component.errors.clear();
            }
            true
        }
        Msg::Submit => {
            if component.submitting {
                return false;
            }
            let submission = component.submission.normalized();
            if let Err(errors) = validate(&submission) {
                component.errors = errors.0;
                component.outcome = None;
                show_toast("Please fix the highlighted fields.");
                return true;
            }

            component.errors.clear();
            component.submitting = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = post_submission(&submission).await;
                link.send_message(Msg::Submitted(result));
            });
            true
        }
        Msg::Submitted(result) => {
            component.submitting = false;
            match result {
                Ok(SubmitResponse::Exported {
                    files,
                    uploads,
                    message,
                }) => {
                    let failed = uploads.iter().filter(|r| !r.ok).count();
                    if failed > 0 {
                        show_toast(&format!("Saved locally; {} upload(s) failed.", failed));
                    } else {
                        show_toast("Export complete.");
                    }
                    component.submission = ReturnFormComponent::new().submission;
                    component.outcome = Some(SubmitResponse::Exported {
                        files,
                        uploads,
                        message,
                    });
                }
                Ok(SubmitResponse::Invalid { errors }) => {
                    component.errors = errors;
                    component.outcome = None;
                }
                Ok(SubmitResponse::Failed { message }) => {
                    component.errors = vec![message];
                    component.outcome = None;
                }
                Err(e) => {
                    gloo_console::error!(format!("Submission request failed: {}", e));
                    component.errors = vec![format!("Request failed: {}", e)];
                    component.outcome = None;
                }
            }
            true
        }
        Msg::Reset => {
            *component = ReturnFormComponent::new();
            true
        }
    }
}
