#![forbid(unsafe_code)]

//! Handle passed down to descendants of the tracked view.

use std::fmt;
use std::rc::Weak;

use crate::controller::ControllerCore;
use crate::dismiss::DismissFuture;

/// Lets descendant components close the panel without owning the
/// controller.
///
/// A context never keeps its controller alive. Once the controller is
/// unmounted, [`request_dismiss`](Self::request_dismiss) fails with
/// [`DismissError::TornDown`](crate::dismiss::DismissError::TornDown).
#[derive(Clone)]
pub struct KeyboardContext {
    core: Weak<ControllerCore>,
}

impl KeyboardContext {
    pub(crate) fn new(core: Weak<ControllerCore>) -> Self {
        Self { core }
    }

    /// Close the panel and resolve once it is closed.
    pub fn request_dismiss(&self) -> DismissFuture {
        match self.core.upgrade() {
            Some(core) => core.request_dismiss(),
            None => DismissFuture::torn_down(),
        }
    }

    /// Whether the panel is on screen. `false` once unmounted.
    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        self.core.upgrade().is_some_and(|core| core.is_panel_open())
    }

    /// Whether the controller is still mounted.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.core.strong_count() > 0
    }
}

impl fmt::Debug for KeyboardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardContext")
            .field("attached", &self.is_attached())
            .finish()
    }
}
