use liker_core::{AppViewModel, CompanyRowView, ProgressView};

use super::constants::*;

/// Lines describing the whole screen, top to bottom.
pub fn render(view: &AppViewModel, clock: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let collections = view
        .collections
        .iter()
        .map(|meta| {
            if view.collection_id.as_deref() == Some(meta.id.as_str()) {
                format!("*{}", meta.name)
            } else {
                meta.name.clone()
            }
        })
        .collect::<Vec<_>>();
    lines.push(format!("[{clock}] collections: {}", collections.join(", ")));

    match (&view.collection_name, &view.collection_id) {
        (Some(name), _) => lines.push(format!("{name} | {}", page_summary(view))),
        (None, Some(id)) => lines.push(format!("{id} | {}", page_summary(view))),
        (None, None) => lines.push("no collection open".to_string()),
    }

    lines.extend(view.rows.iter().map(render_row));

    if !view.companies.is_empty() {
        lines.push("companies:".to_string());
        lines.extend(view.companies.iter().map(|company| {
            format!(
                "  {:>8} {} {}",
                company.id,
                if company.liked { LIKE_MARK } else { " " },
                company.name
            )
        }));
    }

    lines.push(format!(
        "selected: {} | like-selected {} | {} {}",
        view.selected_ids.len(),
        enabled_label(view.like_selected_enabled),
        view.like_all_label,
        enabled_label(view.like_all_enabled)
    ));

    if let Some(progress) = &view.progress {
        lines.push(progress_line(progress));
    }

    if let Some(notice) = &view.notice {
        let tag = if notice.is_failure() { "error" } else { "ok" };
        lines.push(format!("{tag}: {notice}"));
    }

    lines
}

fn page_summary(view: &AppViewModel) -> String {
    let loading = if view.loading { " (loading)" } else { "" };
    match view.total {
        Some(total) => {
            let pages = total.div_ceil(view.page_size.max(1));
            format!(
                "page {}/{} ({} companies){loading}",
                view.page + 1,
                pages.max(1),
                total
            )
        }
        None => format!("page {}{loading}", view.page + 1),
    }
}

fn render_row(row: &CompanyRowView) -> String {
    format!(
        "{} {:>8} {} {}",
        if row.selected {
            SELECTED_MARK
        } else {
            UNSELECTED_MARK
        },
        row.id,
        if row.liked { LIKE_MARK } else { " " },
        row.name
    )
}

fn progress_line(progress: &ProgressView) -> String {
    let filled = PROGRESS_BAR_WIDTH * usize::from(progress.percent) / 100;
    format!(
        "[{}{}] {} ({}/{} items, chunk {}/{})",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        progress.label,
        progress.items_processed,
        progress.total_items,
        progress.chunks_sent,
        progress.chunk_total
    )
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "(on)"
    } else {
        "(off)"
    }
}
