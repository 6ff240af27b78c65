use super::KeyPair;
use crate::config::TriggerBinding;
use crate::inject::{InjectError, KeyInjector};

/// Analog trigger that holds a key while pulled to or past its threshold
#[derive(Debug)]
pub struct TriggerTranslator<E> {
    threshold: i32,
    active: bool,
    key: KeyPair<E>,
}

impl<E> TriggerTranslator<E> {
    pub fn open<I>(injector: &I, binding: &TriggerBinding) -> Result<Self, InjectError>
    where
        I: KeyInjector<Event = E>,
    {
        Ok(Self {
            threshold: binding.threshold,
            active: false,
            key: KeyPair::build(injector, binding.key)?,
        })
    }

    pub fn handle_sample<I>(&mut self, value: i32, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        if value >= self.threshold && !self.active {
            self.key.press(injector);
            self.active = true;
        } else if value < self.threshold && self.active {
            self.key.release(injector);
            self.active = false;
        }
    }

    pub fn release<I>(&mut self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        if self.active {
            self.key.release(injector);
            self.active = false;
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }
}
