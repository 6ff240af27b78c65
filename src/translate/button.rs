use super::KeyPair;
use crate::config::ButtonBinding;
use crate::inject::{InjectError, KeyInjector};

/// Forwards button edges straight to its key
#[derive(Debug)]
pub struct ButtonTranslator<E> {
    key: KeyPair<E>,
}

impl<E> ButtonTranslator<E> {
    pub fn open<I>(injector: &I, binding: &ButtonBinding) -> Result<Self, InjectError>
    where
        I: KeyInjector<Event = E>,
    {
        Ok(Self {
            key: KeyPair::build(injector, binding.key)?,
        })
    }

    pub fn handle_pressed<I>(&self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        self.key.press(injector);
    }

    pub fn handle_released<I>(&self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        self.key.release(injector);
    }
}
