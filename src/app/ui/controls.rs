use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::short_label;

use super::super::ViewModel;

const MAX_SEARCH_RESULTS: usize = 50;
const RESULT_LABEL_CHARS: usize = 48;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Search hits under one category header, in category first-seen order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct SearchGroup {
    pub(in crate::app) label: String,
    pub(in crate::app) ids: Vec<String>,
}

fn readable_text_on(fill: Color32) -> Color32 {
    let luma = fill.r() as f32 * 0.299 + fill.g() as f32 * 0.587 + fill.b() as f32 * 0.114;
    if luma > 150.0 {
        Color32::from_gray(20)
    } else {
        Color32::WHITE
    }
}

impl ViewModel {
    pub(in crate::app) fn search_groups(&self, query: &str) -> Vec<SearchGroup> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut remaining = MAX_SEARCH_RESULTS;
        let mut groups = Vec::new();

        for group in self.model.groups() {
            if remaining == 0 {
                break;
            }

            let ids = group
                .members
                .iter()
                .filter_map(|&index| self.model.nodes().get(index))
                .filter(|node| fuzzy_match_score(&matcher, &node.id, query).is_some())
                .take(remaining)
                .map(|node| node.id.clone())
                .collect::<Vec<_>>();
            if ids.is_empty() {
                continue;
            }

            remaining -= ids.len();
            groups.push(SearchGroup {
                label: group.label.clone(),
                ids,
            });
        }

        groups
    }

    pub(in crate::app) fn draw_search(&mut self, ui: &mut Ui, placeholder: &str) {
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text(placeholder)
                .desired_width(f32::INFINITY),
        );

        let groups = self.search_groups(&self.search);
        if groups.is_empty() {
            return;
        }

        let active = self.highlight.active().map(str::to_owned);
        let mut chosen = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for group in &groups {
                    ui.label(
                        RichText::new(group.label.as_str())
                            .strong()
                            .color(self.colors.color(&group.label)),
                    );
                    for id in &group.ids {
                        let is_active = active.as_deref() == Some(id.as_str());
                        if ui
                            .selectable_label(is_active, short_label(id, RESULT_LABEL_CHARS))
                            .on_hover_text(id.as_str())
                            .clicked()
                        {
                            chosen = Some(id.clone());
                        }
                    }
                }
            });

        if let Some(id) = chosen {
            self.search.clear();
            self.select_node(&id);
        }
    }

    pub(in crate::app) fn draw_category_tags(&mut self, ui: &mut Ui) {
        let mut toggled = None;

        ui.horizontal_wrapped(|ui| {
            for group in self.model.groups() {
                let color = self.colors.color(&group.label);
                let active = self.filter.is_active(&group.label);
                let caption = format!("{} ({})", group.label, group.members.len());

                let (text_color, fill) = if active {
                    (readable_text_on(color), color)
                } else {
                    (color, Color32::TRANSPARENT)
                };
                let button = egui::Button::new(RichText::new(caption).color(text_color))
                    .fill(fill)
                    .stroke(Stroke::new(1.0, color))
                    .corner_radius(10.0);

                if ui.add(button).clicked() {
                    toggled = Some(group.label.clone());
                }
            }
        });

        if let Some(label) = toggled {
            self.toggle_category(&label);
        }
    }
}
