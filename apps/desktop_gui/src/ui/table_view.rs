//! Character table: search, gender filter, sortable headers, page footer and
//! pager, all backed by [`TableState`].

use client_core::table::{SortColumn, SortDirection, TableState, PAGE_SIZE_OPTIONS};
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};
use shared::domain::Character;

use crate::ui::theme;

const ROW_HEIGHT: f32 = 22.0;

fn sort_marker(table: &TableState, column: SortColumn) -> &'static str {
    match table.sort() {
        Some((current, SortDirection::Ascending)) if current == column => " ^",
        Some((current, SortDirection::Descending)) if current == column => " v",
        _ => "",
    }
}

pub fn show(ui: &mut egui::Ui, table: &mut TableState, rows: &[Character]) {
    let mut search = table.global_filter().to_string();
    let mut gender = table.gender_filter().to_string();
    ui.horizontal(|ui| {
        ui.label("Search");
        if ui
            .add(egui::TextEdit::singleline(&mut search).hint_text("name, gender or height"))
            .changed()
        {
            table.set_global_filter(search.clone());
        }
        ui.add_space(12.0);
        ui.label("Gender");
        if ui
            .add(egui::TextEdit::singleline(&mut gender).desired_width(100.0))
            .changed()
        {
            table.set_gender_filter(gender.clone());
        }
    });
    ui.add_space(6.0);

    let mut clicked_header = None;
    let mut page_action = None;
    let mut page_size = table.page_size();
    {
        let page = table.page(rows);

        TableBuilder::new(ui)
            .id_salt("character_table")
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(180.0))
            .column(Column::initial(120.0))
            .column(Column::initial(110.0))
            .header(ROW_HEIGHT, |mut header| {
                for column in SortColumn::ALL {
                    header.col(|ui| {
                        let label = format!("{}{}", column.header(), sort_marker(table, column));
                        if ui
                            .add(egui::Button::new(RichText::new(label).strong().color(theme::AMBER)).frame(false))
                            .clicked()
                        {
                            clicked_header = Some(column);
                        }
                    });
                }
            })
            .body(|mut body| {
                for character in &page.rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(&character.name);
                        });
                        row.col(|ui| {
                            ui.label(&character.gender);
                        });
                        row.col(|ui| {
                            ui.label(&character.height);
                        });
                    });
                }
            });

        if page.rows.is_empty() {
            ui.weak("No characters match the current filters.");
        }

        ui.separator();
        ui.label(
            RichText::new(page.aggregate().footer_text())
                .strong()
                .color(theme::CRAWL_YELLOW),
        );
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(page.has_previous(), egui::Button::new("Previous"))
                .clicked()
            {
                page_action = Some(PageAction::Previous(page.page_index));
            }
            ui.label(format!(
                "Page {} of {} ({} rows)",
                page.page_index + 1,
                page.page_count,
                page.matching_rows
            ));
            if ui
                .add_enabled(page.has_next(), egui::Button::new("Next"))
                .clicked()
            {
                page_action = Some(PageAction::Next(page.page_index));
            }
            ui.add_space(12.0);
            ui.label("Rows per page");
            egui::ComboBox::from_id_salt("character_page_size")
                .selected_text(page_size.to_string())
                .show_ui(ui, |ui| {
                    for option in PAGE_SIZE_OPTIONS {
                        ui.selectable_value(&mut page_size, option, option.to_string());
                    }
                });
        });
    }

    if let Some(column) = clicked_header {
        table.toggle_sort(column);
    }
    match page_action {
        // Step from the clamped index the user actually saw.
        Some(PageAction::Previous(shown)) => table.set_page_index(shown.saturating_sub(1)),
        Some(PageAction::Next(shown)) => table.set_page_index(shown + 1),
        None => {}
    }
    if page_size != table.page_size() {
        tracing::debug!(page_size, "character table page size changed");
        table.set_page_size(page_size);
    }
}

enum PageAction {
    Previous(usize),
    Next(usize),
}
