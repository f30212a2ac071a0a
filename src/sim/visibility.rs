//! Visibility filter driven by three independent toggles.

use bevy::prelude::Resource;

use crate::sim::registry::NeoRegistry;

/// Which toggle a control flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityClass {
    All,
    Safe,
    Hazardous,
}

/// Master switch plus one switch per hazard class.
///
/// An object is shown iff `master` is on and its class switch is on.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityToggles {
    pub master: bool,
    pub safe: bool,
    pub hazardous: bool,
}

impl Default for VisibilityToggles {
    /// State applied after every load: master off, both classes armed.
    fn default() -> Self {
        Self {
            master: false,
            safe: true,
            hazardous: true,
        }
    }
}

impl VisibilityToggles {
    pub fn allows(&self, is_hazardous: bool) -> bool {
        self.master && if is_hazardous { self.hazardous } else { self.safe }
    }

    pub fn get(&self, class: VisibilityClass) -> bool {
        match class {
            VisibilityClass::All => self.master,
            VisibilityClass::Safe => self.safe,
            VisibilityClass::Hazardous => self.hazardous,
        }
    }

    pub fn toggle(&mut self, class: VisibilityClass) {
        let flag = match class {
            VisibilityClass::All => &mut self.master,
            VisibilityClass::Safe => &mut self.safe,
            VisibilityClass::Hazardous => &mut self.hazardous,
        };
        *flag = !*flag;
    }
}

/// Apply the toggles to every object and return how many are visible.
///
/// Only `visible` changes; progress and other time-derived state are untouched.
pub fn apply_visibility(registry: &mut NeoRegistry, toggles: &VisibilityToggles) -> usize {
    let mut shown = 0;
    for object in registry.iter_mut() {
        object.display.visible = toggles.allows(object.is_hazardous);
        shown += usize::from(object.display.visible);
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_master_gates_everything() {
        let toggles = VisibilityToggles::default();
        assert!(!toggles.allows(true));
        assert!(!toggles.allows(false));
    }

    #[test]
    fn test_toggle_flips_one_class() {
        let mut toggles = VisibilityToggles::default();
        toggles.toggle(VisibilityClass::All);
        toggles.toggle(VisibilityClass::Safe);
        assert!(toggles.get(VisibilityClass::All));
        assert!(!toggles.get(VisibilityClass::Safe));
        assert!(toggles.allows(true));
        assert!(!toggles.allows(false));
    }

    #[test]
    fn test_apply_leaves_progress_alone() {
        let mut safe = fixtures::tracked("safe", false, 1.0e6);
        safe.display.progress = 0.3;
        let mut registry =
            NeoRegistry::from_objects([safe, fixtures::tracked("haz", true, 1.0e6)]);

        let toggles = VisibilityToggles {
            master: true,
            safe: true,
            hazardous: false,
        };
        assert_eq!(apply_visibility(&mut registry, &toggles), 1);

        let safe = registry.get("safe").unwrap();
        assert!(safe.display.visible);
        assert_eq!(safe.display.progress, 0.3);
        assert!(!registry.get("haz").unwrap().display.visible);
    }
}
