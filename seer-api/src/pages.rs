//! Server-rendered HTML for the index, scenario and fallback pages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use seer_core::reporting::Surface;
use seer_core::scenarios::Scenario;

/// What happened when a scenario page ran its planted failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Captured {
        type_name: &'static str,
        message: String,
        surface: Surface,
        event_id: Option<Uuid>,
    },
    Completed(String),
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} · Seer Playground</title></head>\n<body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    ))
}

pub fn index() -> Html<String> {
    let items: String = Scenario::ALL
        .iter()
        .map(|scenario| {
            format!(
                "<li><a href=\"/scenarios/{slug}\">{title}</a> <span>{summary}</span></li>\n",
                slug = scenario.slug(),
                title = escape_html(scenario.title()),
                summary = escape_html(scenario.summary()),
            )
        })
        .collect();

    let body = format!(
        "<h1>Seer Playground</h1>\n\
         <p>Each scenario plants one failure and reports it to the error monitor.</p>\n\
         <ul>\n{items}</ul>\n\
         <h2>Setup</h2>\n\
         <p>Set <code>SENTRY_DSN</code> (and optionally <code>SENTRY_BROWSER_DSN</code>, \
         <code>SENTRY_EDGE_DSN</code>) to ship captures. Without a DSN captures are dropped.</p>",
        items = items,
    );
    layout("Scenarios", &body)
}

fn guidance(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::ClientEasy => {
            "The page normalizes the email of a profile that was never loaded. \
             Look for a ProfileNormalizationError on the browser surface."
        }
        Scenario::ClientComplex => {
            "A cached analytics event is decoded and summarized. The seeded event \
             has null metrics, so the summary step fails."
        }
        Scenario::ServerSimple => {
            "The feature flag sync job requires FEATURE_FLAG_SYNC_TOKEN. Unset it \
             to see the ConfigurationError."
        }
        Scenario::ServerComplex => {
            "A warehouse snapshot is parsed and tallied per SKU. The default \
             snapshot has no items array."
        }
        Scenario::CrossBoundary => {
            "The checkout client submits an order to /api/cross-boundary. Server \
             validation failures surface here with the server's detail attached."
        }
        Scenario::IntegrationFailure => {
            "The marketing sync calls /api/third-party-failure, which proxies an \
             external API that is down."
        }
    }
}

pub fn scenario(scenario: Scenario, outcome: &Outcome) -> Html<String> {
    let result = match outcome {
        Outcome::Captured {
            type_name,
            message,
            surface,
            event_id,
        } => format!(
            "<section class=\"captured\"><h2>{type_name}</h2><p>{message}</p>\
             <p>Captured on the {surface} surface{event}.</p></section>",
            type_name = type_name,
            message = escape_html(message),
            surface = surface,
            event = event_id
                .map(|id| format!(" as event <code>{}</code>", id))
                .unwrap_or_default(),
        ),
        Outcome::Completed(detail) => format!(
            "<section class=\"completed\"><h2>No failure</h2><p>{}</p></section>",
            escape_html(detail)
        ),
    };

    let body = format!(
        "<h1>{title}</h1>\n<p>{guidance}</p>\n{result}\n<p><a href=\"/\">Back to scenarios</a></p>",
        title = escape_html(scenario.title()),
        guidance = escape_html(guidance(scenario)),
        result = result,
    );
    layout(scenario.title(), &body)
}

pub fn not_found() -> Response {
    let body = "<h1>Page not found</h1>\n<p><a href=\"/\">Back to scenarios</a></p>";
    (StatusCode::NOT_FOUND, layout("Not found", body)).into_response()
}

pub fn server_error() -> Response {
    let body = "<h1>Something went wrong</h1>\n\
                <p>The error has been reported.</p>\n\
                <p><a href=\"/\">Back to scenarios</a></p>";
    (StatusCode::INTERNAL_SERVER_ERROR, layout("Error", body)).into_response()
}
