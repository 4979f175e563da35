use std::fmt::Write as _;

use docshelf_core::{AppViewModel, DocumentRowView, Severity};

use crate::effects::Notice;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let mut activity = Vec::new();
    if view.loading {
        activity.push("loading");
    }
    if view.processing {
        activity.push("processing");
    }
    if view.checking_uploads {
        activity.push("checking uploads");
    }
    if activity.is_empty() {
        let _ = writeln!(out, "Course: {}", view.course_id);
    } else {
        let _ = writeln!(out, "Course: {} ({}...)", view.course_id, activity.join(", "));
    }

    if view.documents.is_empty() {
        let _ = writeln!(out, "No documents. Fetch a course or add one.");
    } else {
        let _ = writeln!(out, "Documents:");
        for row in &view.documents {
            let _ = writeln!(out, "{}", format_row(row));
        }
    }

    if let Some(active) = &view.active {
        let _ = writeln!(out, "Preview: {}", active.preview_url);
        if view.preview_generation > 0 {
            let _ = writeln!(out, "  (reloaded {}x)", view.preview_generation);
        }
        if let Some(copy_url) = &active.copy_url {
            let _ = writeln!(out, "Copy: {copy_url}");
        }
    }

    if let Some(error) = &view.draft.error {
        let _ = writeln!(out, "! {error}");
    }

    if let Some(status) = &view.status {
        let _ = writeln!(out, "{} {}", severity_marker(status.severity), status.text);
    }

    out
}

pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::OpenUrl(url) => format!("Open in your browser: {url}"),
        Notice::PreviewReloaded(url) => format!("Preview refreshed: {url}"),
        Notice::PersistFailed(err) => format!("Warning: could not save the catalog ({err})"),
    }
}

fn format_row(row: &DocumentRowView) -> String {
    let marker = if row.is_active { '*' } else { ' ' };
    format!("  {marker} [{id}] {name}", id = row.id, name = row.name)
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Information => "[info]",
        Severity::Success => "[ok]",
        Severity::Error => "[error]",
    }
}
