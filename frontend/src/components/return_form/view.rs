//! View rendering for the store-return form.
//!
//! Layout: header fields on top, the repeatable item table below, then the
//! action buttons, the error list and the result banner. Inputs whose field is
//! named by a current validation message get the `invalid` class.

use common::model::submission::Row;
use common::requests::SubmitResponse;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::messages::{HeaderField, Msg, RowField};
use super::state::ReturnFormComponent;

pub fn view(component: &ReturnFormComponent, ctx: &Context<ReturnFormComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="return-form-root">
            <h1>{"Store Return"}</h1>
            <form onsubmit={link.callback(|e: SubmitEvent| {
                e.prevent_default();
                Msg::Submit
            })}>
                { build_header(component, link) }
                { build_rows(component, link) }
                { build_actions(component, link) }
            </form>
            { build_errors(component) }
            { build_outcome(component) }
        </div>
    }
}

fn build_header(component: &ReturnFormComponent, link: &Scope<ReturnFormComponent>) -> Html {
    let fields = [
        (HeaderField::CreatedBy, "Created By"),
        (HeaderField::DocumentNumber, "Document Number"),
        (HeaderField::Source, "Source"),
        (HeaderField::Destination, "Destination"),
    ];

    html! {
        <div class="header-fields">
            {
                for fields.into_iter().map(|(field, label)| html! {
                    <label class="field">
                        <span>{label}</span>
                        { text_input(
                            "text",
                            component.header_value(field),
                            component.header_has_error(field),
                            link.callback(move |value| Msg::SetHeader(field, value)),
                        ) }
                    </label>
                })
            }
        </div>
    }
}

fn build_rows(component: &ReturnFormComponent, link: &Scope<ReturnFormComponent>) -> Html {
    html! {
        <table class="rows">
            <thead>
                <tr>
                    <th>{"#"}</th>
                    <th>{"Parent Code"}</th>
                    <th>{"Parent Name"}</th>
                    <th>{"Quantity"}</th>
                    <th>{"Damage Reason"}</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {
                    for component
                        .submission
                        .rows
                        .iter()
                        .enumerate()
                        .map(|(idx, row)| build_row(component, link, idx, row))
                }
            </tbody>
        </table>
    }
}

fn build_row(
    component: &ReturnFormComponent,
    link: &Scope<ReturnFormComponent>,
    idx: usize,
    row: &Row,
) -> Html {
    let number = idx + 1;
    let cell = |field: RowField, kind: &'static str, value: &str| {
        text_input(
            kind,
            value,
            component.row_has_error(number, field),
            link.callback(move |value| Msg::SetRow(idx, field, value)),
        )
    };
    let only_row = component.submission.rows.len() == 1;

    html! {
        <tr>
            <td>{number.to_string()}</td>
            <td>{ cell(RowField::ParentCode, "text", &row.parent_code) }</td>
            <td>{ cell(RowField::ParentName, "text", &row.parent_name) }</td>
            <td>{ cell(RowField::Quantity, "number", &row.quantity) }</td>
            <td>{ cell(RowField::DamageReason, "text", &row.damage_reason) }</td>
            <td>
                <button
                    type="button"
                    class="secondary"
                    title="Remove row"
                    disabled={only_row}
                    onclick={link.callback(move |_| Msg::RemoveRow(idx))}
                >
                    {"Remove"}
                </button>
            </td>
        </tr>
    }
}

fn build_actions(component: &ReturnFormComponent, link: &Scope<ReturnFormComponent>) -> Html {
    html! {
        <div class="actions">
            <button type="button" class="secondary" onclick={link.callback(|_| Msg::AddRow)}>
                {"Add row"}
            </button>
            <button type="submit" disabled={component.submitting}>
                { if component.submitting { "Exporting…" } else { "Export" } }
            </button>
            <button type="button" class="secondary" onclick={link.callback(|_| Msg::Reset)}>
                {"Clear"}
            </button>
        </div>
    }
}

fn build_errors(component: &ReturnFormComponent) -> Html {
    if component.errors.is_empty() {
        return html! {};
    }
    html! {
        <div class="banner error">
            <ul>
                { for component.errors.iter().map(|e| html! { <li>{e.clone()}</li> }) }
            </ul>
        </div>
    }
}

fn build_outcome(component: &ReturnFormComponent) -> Html {
    match &component.outcome {
        Some(SubmitResponse::Exported { message, uploads, .. }) => html! {
            <div class="banner success">
                <p>{message.clone()}</p>
                <ul>
                    {
                        for uploads.iter().filter(|r| !r.ok).map(|r| html! {
                            <li class="upload-failed">{r.message.clone()}</li>
                        })
                    }
                </ul>
            </div>
        },
        _ => html! {},
    }
}

/// An `<input>` that forwards every keystroke as a `String`.
fn text_input(kind: &'static str, value: &str, invalid: bool, on_change: Callback<String>) -> Html {
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_change.emit(input.value());
    });

    html! {
        <input
            type={kind}
            class={classes!(invalid.then_some("invalid"))}
            value={value.to_string()}
            min={(kind == "number").then_some("1")}
            {oninput}
        />
    }
}
