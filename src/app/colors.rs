use std::collections::HashMap;

use eframe::egui::Color32;

use crate::util::stable_hash;

const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

const FALLBACK_COLOR: Color32 = Color32::from_rgb(0x7f, 0x7f, 0x7f);

/// Category → color mapping shared by the legend, the search results and the
/// renderer for one widget session.
///
/// A label's preferred slot comes from a hash of the label; collisions probe to
/// the next free slot until the palette is exhausted, after which labels fall
/// back to their preferred slot.
#[derive(Clone, Debug, Default)]
pub struct CategoryColorAssigner {
    assigned: HashMap<String, usize>,
    taken: [bool; PALETTE.len()],
}

impl CategoryColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, label: &str) -> Color32 {
        if let Some(&slot) = self.assigned.get(label) {
            return PALETTE[slot];
        }

        let home = (stable_hash(label) % PALETTE.len() as u64) as usize;
        let slot = (0..PALETTE.len())
            .map(|offset| (home + offset) % PALETTE.len())
            .find(|&slot| !self.taken[slot])
            .unwrap_or(home);

        self.taken[slot] = true;
        self.assigned.insert(label.to_owned(), slot);
        PALETTE[slot]
    }

    pub fn observe<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) {
        for label in labels {
            self.assign(label);
        }
    }

    pub fn color(&self, label: &str) -> Color32 {
        self.assigned
            .get(label)
            .map(|&slot| PALETTE[slot])
            .unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equal_labels_share_a_color() {
        let mut colors = CategoryColorAssigner::new();
        let first = colors.assign("person");
        colors.assign("organization");
        assert_eq!(colors.assign("person"), first);
        assert_eq!(colors.color("person"), first);
    }

    #[test]
    fn distinct_labels_get_distinct_colors_until_palette_is_full() {
        let mut colors = CategoryColorAssigner::new();
        let labels = (0..PALETTE.len())
            .map(|index| format!("category-{index}"))
            .collect::<Vec<_>>();
        let assigned = labels
            .iter()
            .map(|label| colors.assign(label))
            .collect::<HashSet<_>>();
        assert_eq!(assigned.len(), PALETTE.len());

        let overflow = colors.assign("one-too-many");
        assert!(PALETTE.contains(&overflow));
    }

    #[test]
    fn separate_sessions_agree_for_the_same_arrival_order() {
        let mut first = CategoryColorAssigner::new();
        let mut second = CategoryColorAssigner::new();
        first.observe(["person", "event", "geo"]);
        second.observe(["person", "event", "geo"]);

        for label in ["person", "event", "geo"] {
            assert_eq!(first.color(label), second.color(label));
        }
    }

    #[test]
    fn unknown_labels_use_fallback_without_assignment() {
        let colors = CategoryColorAssigner::new();
        assert_eq!(colors.color("never-seen"), FALLBACK_COLOR);
    }
}
