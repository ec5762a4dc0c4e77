//! Submission flow: validate, render, store, notify, in that order.
//!
//! Both the HTTP handler and the CLI drive this module. Rendering is
//! synchronous so callers can push it onto a blocking worker; storage and
//! delivery are async ports with in-memory fakes for tests.
//!
//! A submission that fails validation produces no side effects at all. Once
//! past validation the steps run strictly in order, so a delivery failure
//! can leave a stored summary behind; the caller reports the failure and the
//! orphaned object is harmless.

pub mod storage;
pub mod webhook;

pub use storage::{DirStorage, MemoryStorage, Storage};
pub use webhook::{HttpWebhook, Notifier, RequestMeta};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlacaError;
use crate::pdf::summary::{render_summary, SummaryItem};
use crate::preview::{render_plate_data_uri, PreviewOptions, Typeface};
use crate::template::LabelTemplate;

/// Contact details accompanying a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A submission as posted by the designer frontend. Field aliases accept the
/// frontend's camelCase spelling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default, alias = "referenceId")]
    pub reference_id: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default, alias = "savedTemplates")]
    pub templates: Vec<LabelTemplate>,
}

/// Check a submission before any rendering or delivery happens.
///
/// Order matters for the error a client sees: reference first, then contact,
/// then the template list, then each template in turn.
pub fn validate_request(request: &SubmissionRequest) -> Result<(), PlacaError> {
    if request.reference_id.trim().is_empty() {
        return Err(PlacaError::Validation(
            "reference ID must not be empty".to_string(),
        ));
    }
    let email = request
        .contact
        .as_ref()
        .map(|c| c.email.trim())
        .unwrap_or("");
    if email.is_empty() {
        return Err(PlacaError::Validation(
            "contact email is required".to_string(),
        ));
    }
    if !email_looks_valid(email) {
        return Err(PlacaError::Validation(format!(
            "contact email {email:?} is not a valid address"
        )));
    }
    if request.templates.is_empty() {
        return Err(PlacaError::Validation(
            "at least one saved template is required".to_string(),
        ));
    }
    for (i, template) in request.templates.iter().enumerate() {
        template.validate().map_err(|err| match err {
            PlacaError::Validation(msg) => {
                PlacaError::Validation(format!("template {}: {msg}", i + 1))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Shape check only: one `@`, a non-empty local part, a dotted domain with
/// no empty segments, no whitespace. Deliverability is the listener's
/// problem.
fn email_looks_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|part| !part.is_empty())
}

/// Build the PDF table rows for a set of templates, rendering a thumbnail
/// for each. A template whose preview fails still gets a row; the table
/// shows its placeholder instead.
pub fn summary_items(templates: &[LabelTemplate], typeface: &Typeface) -> Vec<SummaryItem> {
    let options = PreviewOptions::default();
    templates
        .iter()
        .map(|template| {
            let preview_png = render_plate_data_uri(template, typeface, &options).ok();
            let lines: Vec<&str> = template
                .lines
                .iter()
                .map(|line| line.text.trim())
                .filter(|text| !text.is_empty())
                .collect();
            SummaryItem {
                preview_png,
                size_top: format!("{} ({})", template.display_size(), template.palette().name),
                size_bottom: lines.join(" / "),
                font_label: template
                    .font
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                qty: template.quantity,
            }
        })
        .collect()
}

/// Render the summary PDF for a validated submission.
pub fn render_submission_summary(
    request: &SubmissionRequest,
    typeface: &Typeface,
) -> Result<Vec<u8>, PlacaError> {
    let items = summary_items(&request.templates, typeface);
    render_summary(None, &request.reference_id, Local::now(), &items)
}

/// Storage key for a submission summary:
/// `submissions/{reference}/{millis}.pdf`.
///
/// The reference is restricted to filename-safe characters so the key stays
/// a clean relative path for directory-backed storage.
pub fn storage_key(reference_id: &str, unix_millis: i64) -> String {
    let safe: String = reference_id
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '-'
            }
        })
        .collect();
    format!("submissions/{safe}/{unix_millis}.pdf")
}

/// Store a rendered summary, then deliver the submission.
///
/// `payload` is the raw client body; the listener receives it wrapped by
/// [`webhook::envelope`]. Returns the public URL of the stored summary.
pub async fn store_and_notify(
    storage: &dyn Storage,
    notifier: &dyn Notifier,
    request: &SubmissionRequest,
    payload: Value,
    meta: &RequestMeta,
    pdf: Vec<u8>,
) -> Result<String, PlacaError> {
    let key = storage_key(&request.reference_id, Utc::now().timestamp_millis());
    let url = storage.put(&key, pdf, "application/pdf").await?;
    let body = webhook::envelope(payload, meta, &url);
    notifier.notify(&body).await?;
    Ok(url)
}
