//! Formation state: which of the two target layouts the particle groups head for.

use serde::{Deserialize, Serialize};

/// Target layout every particle group converges toward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    /// Loose cloud filling the scatter sphere.
    #[default]
    Scattered,
    /// Assembled christmas tree.
    TreeShape,
}

impl Formation {
    /// The other formation.
    pub fn toggled(self) -> Self {
        match self {
            Formation::Scattered => Formation::TreeShape,
            Formation::TreeShape => Formation::Scattered,
        }
    }

    pub fn is_tree(self) -> bool {
        self == Formation::TreeShape
    }

    /// Label for the control that switches away from this formation.
    pub fn action_label(self) -> &'static str {
        match self {
            Formation::Scattered => "ASSEMBLE TREE",
            Formation::TreeShape => "SCATTER ELEMENTS",
        }
    }

    /// Short status line describing this formation.
    pub fn status_label(self) -> &'static str {
        match self {
            Formation::Scattered => "ELEMENTS DISPERSED",
            Formation::TreeShape => "SCROLL TO ROTATE • DRAG TO VIEW",
        }
    }
}

/// Holds the current formation. Changing it is instantaneous; the visual
/// transition is the groups converging on their new targets over later frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormationState {
    current: Formation,
}

impl FormationState {
    pub fn new(initial: Formation) -> Self {
        Self { current: initial }
    }

    pub fn get(&self) -> Formation {
        self.current
    }

    pub fn set(&mut self, formation: Formation) {
        if formation != self.current {
            log::info!("Formation {:?} -> {:?}", self.current, formation);
        }
        self.current = formation;
    }

    /// Flip to the other formation and return the new value.
    pub fn toggle(&mut self) -> Formation {
        self.set(self.current.toggled());
        self.current
    }
}
