use super::{AxisTranslator, ButtonTranslator, TriggerTranslator};
use crate::config::ControlMapping;
use crate::inject::{InjectError, KeyInjector};
use crate::input::{ControlId, ControlKind, ControlSample};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A translator could not be built from its mapping entry
#[derive(Debug, Error)]
#[error("Unable to build key events for {kind} {id}: {source}")]
pub struct BuildError {
    pub kind: ControlKind,
    pub id: ControlId,
    #[source]
    pub source: InjectError,
}

/// Outcome of routing one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// No translator is configured for the sample's control
    Unmapped,
}

/// Owns one translator per configured control
///
/// Every native key event is built in [`TranslatorRegistry::build`] and
/// released when the registry is dropped.
#[derive(Debug)]
pub struct TranslatorRegistry<E> {
    axes: HashMap<ControlId, AxisTranslator<E>>,
    buttons: HashMap<ControlId, ButtonTranslator<E>>,
    triggers: HashMap<ControlId, TriggerTranslator<E>>,

    // Unmapped controls already reported at warn level
    reported: HashSet<(ControlKind, ControlId)>,
}

impl<E> TranslatorRegistry<E> {
    /// Builds translators for every entry of `mapping`
    ///
    /// Fails on the first entry whose key events cannot be built. Translators
    /// built before the failure are dropped, releasing their events.
    pub fn build<I>(mapping: &ControlMapping, injector: &I) -> Result<Self, BuildError>
    where
        I: KeyInjector<Event = E>,
    {
        let fail = |kind: ControlKind, id: ControlId| {
            move |source: InjectError| BuildError { kind, id, source }
        };

        let mut axes = HashMap::with_capacity(mapping.axes.len());
        for (&id, binding) in &mapping.axes {
            let axis =
                AxisTranslator::open(injector, binding).map_err(fail(ControlKind::Axis, id))?;
            axes.insert(id, axis);
        }

        let mut buttons = HashMap::with_capacity(mapping.buttons.len());
        for (&id, binding) in &mapping.buttons {
            let button =
                ButtonTranslator::open(injector, binding).map_err(fail(ControlKind::Button, id))?;
            buttons.insert(id, button);
        }

        let mut triggers = HashMap::with_capacity(mapping.triggers.len());
        for (&id, binding) in &mapping.triggers {
            let trigger = TriggerTranslator::open(injector, binding)
                .map_err(fail(ControlKind::Trigger, id))?;
            triggers.insert(id, trigger);
        }

        info!(
            "Built translators for {} axes, {} buttons, {} triggers",
            axes.len(),
            buttons.len(),
            triggers.len()
        );
        Ok(Self {
            axes,
            buttons,
            triggers,
            reported: HashSet::new(),
        })
    }

    /// Routes `sample` to the translator of its control
    ///
    /// Samples for controls without a mapping entry are ignored. The first one
    /// per control is logged as a warning, later ones only at debug level.
    pub fn dispatch<I>(&mut self, sample: ControlSample, injector: &mut I) -> Dispatch
    where
        I: KeyInjector<Event = E>,
    {
        let handled = match sample {
            ControlSample::Axis { id, value } => self
                .axes
                .get_mut(&id)
                .map(|axis| axis.handle_sample(value, injector)),
            ControlSample::Trigger { id, value } => self
                .triggers
                .get_mut(&id)
                .map(|trigger| trigger.handle_sample(value, injector)),
            ControlSample::Button { id, pressed } => self.buttons.get(&id).map(|button| {
                if pressed {
                    button.handle_pressed(injector)
                } else {
                    button.handle_released(injector)
                }
            }),
        };

        match handled {
            Some(()) => Dispatch::Handled,
            None => {
                let (kind, id) = (sample.kind(), sample.id());
                if self.reported.insert((kind, id)) {
                    warn!("No mapping for {} {}, ignoring its samples", kind, id);
                } else {
                    debug!("Ignoring sample of unmapped {} {}", kind, id);
                }
                Dispatch::Unmapped
            }
        }
    }

    /// Lets go of every held axis direction and trigger
    pub fn release_all<I>(&mut self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        for axis in self.axes.values_mut() {
            axis.release(injector);
        }
        for trigger in self.triggers.values_mut() {
            trigger.release(injector);
        }
    }

    pub fn len(&self) -> usize {
        self.axes.len() + self.buttons.len() + self.triggers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Drop for TranslatorRegistry<E> {
    fn drop(&mut self) {
        debug!("Releasing key events of {} translators", self.len());
    }
}
