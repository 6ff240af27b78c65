use super::KeyPair;
use crate::config::AxisBinding;
use crate::inject::{InjectError, KeyInjector};

/// Stick axis that presses one key per direction past a fixed threshold
///
/// A sample at or beyond `-threshold` holds the negative key, at or beyond
/// `threshold` the positive key. Each direction latches on its own, so a key
/// goes down once when its direction activates and up once when it leaves.
#[derive(Debug)]
pub struct AxisTranslator<E> {
    threshold: i32,
    negative_active: bool,
    positive_active: bool,
    negative: KeyPair<E>,
    positive: KeyPair<E>,
}

impl<E> AxisTranslator<E> {
    pub fn open<I>(injector: &I, binding: &AxisBinding) -> Result<Self, InjectError>
    where
        I: KeyInjector<Event = E>,
    {
        let negative = KeyPair::build(injector, binding.negative_key)?;
        let positive = KeyPair::build(injector, binding.positive_key)?;

        Ok(Self {
            threshold: binding.threshold,
            negative_active: false,
            positive_active: false,
            negative,
            positive,
        })
    }

    pub fn handle_sample<I>(&mut self, value: i32, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        if value <= -self.threshold && !self.negative_active {
            self.negative.press(injector);
            self.negative_active = true;
        } else if value > -self.threshold && self.negative_active {
            self.negative.release(injector);
            self.negative_active = false;
        }

        if value >= self.threshold && !self.positive_active {
            self.positive.press(injector);
            self.positive_active = true;
        } else if value < self.threshold && self.positive_active {
            self.positive.release(injector);
            self.positive_active = false;
        }
    }

    /// Lets go of any held direction
    pub fn release<I>(&mut self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        if self.negative_active {
            self.negative.release(injector);
            self.negative_active = false;
        }
        if self.positive_active {
            self.positive.release(injector);
            self.positive_active = false;
        }
    }

    #[cfg(test)]
    pub fn is_negative_active(&self) -> bool {
        self.negative_active
    }

    #[cfg(test)]
    pub fn is_positive_active(&self) -> bool {
        self.positive_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::recording::{RecordedKey, RecordingInjector};
    use crate::inject::KeyDirection::{Down, Up};

    const LEFT: u16 = 0x7B;
    const RIGHT: u16 = 0x7C;

    fn left_right(injector: &RecordingInjector, threshold: i32) -> AxisTranslator<RecordedKey> {
        AxisTranslator::open(
            injector,
            &AxisBinding {
                threshold,
                negative_key: i64::from(LEFT),
                positive_key: i64::from(RIGHT),
            },
        )
        .unwrap()
    }

    #[test]
    fn positive_boundary_is_inclusive() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        axis.handle_sample(0x3FFF, &mut injector);
        assert!(injector.posted().is_empty());

        axis.handle_sample(0x4000, &mut injector);
        assert_eq!(injector.take_posted(), vec![(RIGHT, Down)]);
        assert!(axis.is_positive_active());
    }

    #[test]
    fn negative_boundary_is_inclusive() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        axis.handle_sample(-0x3FFF, &mut injector);
        assert!(injector.posted().is_empty());

        axis.handle_sample(-0x4000, &mut injector);
        assert_eq!(injector.take_posted(), vec![(LEFT, Down)]);
        assert!(axis.is_negative_active());
        assert!(!axis.is_positive_active());
    }

    #[test]
    fn repeated_samples_do_not_refire() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        for _ in 0..3 {
            axis.handle_sample(0x7FFF, &mut injector);
        }
        for _ in 0..3 {
            axis.handle_sample(0, &mut injector);
        }

        assert_eq!(injector.posted(), &[(RIGHT, Down), (RIGHT, Up)]);
    }

    #[test]
    fn full_swing_sequence() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        for value in [0, 0x5000, 0x5000, 0, -0x5000, 0] {
            axis.handle_sample(value, &mut injector);
        }

        assert_eq!(
            injector.posted(),
            &[(RIGHT, Down), (RIGHT, Up), (LEFT, Down), (LEFT, Up)]
        );
    }

    #[test]
    fn swinging_through_center_swaps_keys() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        axis.handle_sample(-0x8000, &mut injector);
        axis.handle_sample(0x7FFF, &mut injector);

        assert_eq!(
            injector.posted(),
            &[(LEFT, Down), (LEFT, Up), (RIGHT, Down)]
        );
    }

    #[test]
    fn latches_never_double_fire() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 1000);
        let samples = [
            0, 999, 1000, 1001, 32767, -1, -999, -1000, -32768, -1000, 0, 1000, 1000, -1000,
            -1001, 999, -32768, 32767, 0,
        ];

        let mut balance = [0i32; 2];
        for value in samples {
            axis.handle_sample(value, &mut injector);
            for (code, direction) in injector.take_posted() {
                let slot = if code == LEFT { 0 } else { 1 };
                balance[slot] += if direction == Down { 1 } else { -1 };
                assert!(
                    (0..=1).contains(&balance[slot]),
                    "unbalanced after sample {}",
                    value
                );
            }
        }
        assert_eq!(balance, [0, 0]);
    }

    #[test]
    fn release_lets_go_of_held_direction() {
        let mut injector = RecordingInjector::new();
        let mut axis = left_right(&injector, 0x4000);

        axis.release(&mut injector);
        assert!(injector.posted().is_empty());

        axis.handle_sample(-0x6000, &mut injector);
        axis.release(&mut injector);
        axis.release(&mut injector);

        assert_eq!(injector.posted(), &[(LEFT, Down), (LEFT, Up)]);
        assert!(!axis.is_negative_active());
    }
}
