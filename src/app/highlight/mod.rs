use std::collections::HashSet;

use crate::graph::GraphDataModel;

mod collect;

use self::collect::derive_highlight;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HighlightMode {
    #[default]
    Idle,
    Hovered(String),
    Active(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    pub nodes: HashSet<String>,
    pub links: HashSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    HoverChanged,
    Activated(String),
    Deactivated,
}

/// Hover/active selection. Only the mode is state; the highlight sets are
/// rebuilt on every transition.
#[derive(Clone, Debug, Default)]
pub struct HighlightStateMachine {
    mode: HighlightMode,
    highlight: Highlight,
}

impl HighlightStateMachine {
    pub fn mode(&self) -> &HighlightMode {
        &self.mode
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn active(&self) -> Option<&str> {
        match &self.mode {
            HighlightMode::Active(id) => Some(id),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        match &self.mode {
            HighlightMode::Hovered(id) => Some(id),
            _ => None,
        }
    }

    pub fn hover(&mut self, model: &GraphDataModel, node: Option<&str>) -> Transition {
        if self.active().is_some() {
            return Transition::Unchanged;
        }

        let next = match node {
            Some(id) => HighlightMode::Hovered(id.to_owned()),
            None => HighlightMode::Idle,
        };
        if next == self.mode {
            return Transition::Unchanged;
        }

        self.enter(model, next);
        Transition::HoverChanged
    }

    pub fn click(&mut self, model: &GraphDataModel, id: &str) -> Transition {
        if self.active() == Some(id) {
            return self.close(model);
        }

        self.activate(model, id)
    }

    /// Search activation; re-activating the current node is allowed.
    pub fn select(&mut self, model: &GraphDataModel, id: &str) -> Transition {
        self.activate(model, id)
    }

    pub fn close(&mut self, model: &GraphDataModel) -> Transition {
        if self.active().is_none() {
            return Transition::Unchanged;
        }

        self.enter(model, HighlightMode::Idle);
        Transition::Deactivated
    }

    /// Re-derives the sets against a freshly loaded graph, keeping the mode.
    pub fn refresh(&mut self, model: &GraphDataModel) {
        self.highlight = derive_highlight(&self.mode, model);
    }

    fn activate(&mut self, model: &GraphDataModel, id: &str) -> Transition {
        self.enter(model, HighlightMode::Active(id.to_owned()));
        Transition::Activated(id.to_owned())
    }

    fn enter(&mut self, model: &GraphDataModel, mode: HighlightMode) {
        self.highlight = derive_highlight(&mode, model);
        self.mode = mode;
    }
}
