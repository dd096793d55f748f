//! # Action Dispatch
//!
//! Replays one [`Edge`] through the mapping table into injector calls.
//!
//! | Action | Press | Release |
//! |--------|-------|---------|
//! | `MouseClick(b)` | `mouse_down(b)` | `mouse_up(b)` |
//! | `KeyTap(k)` | `k` down | `k` up |
//! | `KeyCombo([k1..kn])` | `k1` .. `kn` down | `kn` .. `k1` up |
//!
//! Combos release in reverse so the final key comes up before its modifiers.
//! Holding a control holds the action; nothing repeats while held.

use super::edge::Edge;
use crate::input::injector::InputInjector;
use crate::mapping::{ActionSpec, MappingTable};

/// Dispatches `edge` to `injector`. Unbound controls do nothing.
pub fn dispatch(edge: Edge, mappings: &MappingTable, injector: &mut dyn InputInjector) {
    match mappings.get(edge.control) {
        ActionSpec::None => {}
        ActionSpec::MouseClick(button) => {
            if edge.is_down {
                injector.mouse_down(*button);
            } else {
                injector.mouse_up(*button);
            }
        }
        ActionSpec::KeyTap(key) => injector.set_key_state(*key, edge.is_down),
        ActionSpec::KeyCombo(keys) => {
            if edge.is_down {
                for key in keys {
                    injector.set_key_state(*key, true);
                }
            } else {
                for key in keys.iter().rev() {
                    injector.set_key_state(*key, false);
                }
            }
        }
    }
}
