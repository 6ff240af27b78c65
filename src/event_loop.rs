//! Event Loop - drains controller samples into synthetic key events
//!
//! Runs on the main thread. Each iteration pulls every sample the input
//! source has queued, routes it through the [`TranslatorRegistry`], then
//! sleeps for [`LoopSettings::poll_interval`].
//!
//! ```text
//! InputSource ──► TranslatorRegistry ──► KeyInjector
//!  (samples)       (edge detection)      (OS input stream)
//! ```
//!
//! The loop stops when the shared shutdown flag is raised (SIGINT/SIGTERM).
//! Held keys are released before [`EventLoop::run`] returns.

use crate::inject::KeyInjector;
use crate::input::{InputSource, SourceError};
use crate::translate::{Dispatch, TranslatorRegistry};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing knobs of the event loop
#[derive(Clone, Debug)]
pub struct LoopSettings {
    /// Pause between two drains of the input source
    ///
    /// Bounds both the added input latency and the idle CPU usage.
    pub poll_interval: Duration,

    /// Period of the throughput log line, in seconds
    pub stats_interval_secs: i64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            stats_interval_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct EventLoop<S, I: KeyInjector> {
    source: S,
    injector: I,
    registry: TranslatorRegistry<I::Event>,
    settings: LoopSettings,
    shutdown: Arc<AtomicBool>,
    state: LoopState,
    unmapped: usize,
}

impl<S: InputSource, I: KeyInjector> EventLoop<S, I> {
    pub fn new(
        source: S,
        injector: I,
        registry: TranslatorRegistry<I::Event>,
        settings: LoopSettings,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        debug!("Creating event loop with settings: {:?}", settings);
        Self {
            source,
            injector,
            registry,
            settings,
            shutdown,
            state: LoopState::Running,
            unmapped: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn injector(&self) -> &I {
        &self.injector
    }

    /// Dispatches every sample currently queued and returns how many there were
    ///
    /// A disconnect ends the drain early and lets go of every held key, since
    /// the device will not report the matching release.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.source.next_sample() {
                Ok(Some(sample)) => {
                    if self.registry.dispatch(sample, &mut self.injector) == Dispatch::Unmapped {
                        self.unmapped += 1;
                    }
                    count += 1;
                }
                Ok(None) => break,
                Err(e @ SourceError::DisconnectedError(_)) => {
                    warn!("Input source error: {}, releasing held keys", e);
                    self.registry.release_all(&mut self.injector);
                    break;
                }
                Err(e) => {
                    warn!("Input source error: {}", e);
                    break;
                }
            }
        }
        count
    }

    /// Runs until the shutdown flag is raised
    pub fn run(&mut self) {
        info!("Starting event loop");

        let mut sample_count = 0;
        let mut last_log_time = Local::now();
        let log_interval = chrono::Duration::seconds(self.settings.stats_interval_secs);

        while self.state == LoopState::Running {
            // Acquire pairs with the signal handler's store
            if self.shutdown.load(Ordering::Acquire) {
                self.stop();
                break;
            }

            sample_count += self.drain();

            let now = Local::now();
            if now - last_log_time > log_interval {
                if sample_count > 0 {
                    info!(
                        "Event loop stats: dispatched {} samples ({} unmapped) in last {} seconds",
                        sample_count,
                        self.unmapped,
                        log_interval.num_seconds()
                    );
                }
                sample_count = 0;
                self.unmapped = 0;
                last_log_time = now;
            }

            std::thread::sleep(self.settings.poll_interval);
        }
    }

    fn stop(&mut self) {
        info!("Shutdown requested, releasing held keys");
        self.registry.release_all(&mut self.injector);
        self.state = LoopState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisBinding, ButtonBinding, ControlMapping, TriggerBinding};
    use crate::inject::recording::RecordingInjector;
    use crate::inject::KeyDirection::{Down, Up};
    use crate::input::ControlSample;
    use std::collections::VecDeque;

    enum Step {
        Sample(ControlSample),
        Fail,
    }

    /// Replays one batch per drain, then raises the shutdown flag
    struct ScriptedSource {
        batches: VecDeque<VecDeque<Step>>,
        shutdown: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(batches: Vec<Vec<Step>>, shutdown: Arc<AtomicBool>) -> Self {
            Self {
                batches: batches.into_iter().map(VecDeque::from).collect(),
                shutdown,
            }
        }
    }

    impl InputSource for ScriptedSource {
        fn next_sample(&mut self) -> Result<Option<ControlSample>, SourceError> {
            let Some(batch) = self.batches.front_mut() else {
                self.shutdown.store(true, Ordering::Release);
                return Ok(None);
            };
            match batch.pop_front() {
                Some(Step::Sample(sample)) => Ok(Some(sample)),
                Some(Step::Fail) => Err(SourceError::DisconnectedError("unplugged".to_string())),
                None => {
                    self.batches.pop_front();
                    Ok(None)
                }
            }
        }
    }

    fn mapping() -> ControlMapping {
        let mut mapping = ControlMapping::default();
        mapping.axes.insert(
            0,
            AxisBinding {
                threshold: 0x4000,
                negative_key: 0x7B,
                positive_key: 0x7C,
            },
        );
        mapping.buttons.insert(0, ButtonBinding { key: 0x06 });
        mapping.triggers.insert(
            5,
            TriggerBinding {
                threshold: 0x4000,
                key: 0x0F,
            },
        );
        mapping
    }

    fn event_loop(batches: Vec<Vec<Step>>) -> EventLoop<ScriptedSource, RecordingInjector> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let source = ScriptedSource::new(batches, Arc::clone(&shutdown));
        let injector = RecordingInjector::new();
        let registry = TranslatorRegistry::build(&mapping(), &injector).unwrap();
        let settings = LoopSettings {
            poll_interval: Duration::from_millis(1),
            ..LoopSettings::default()
        };
        EventLoop::new(source, injector, registry, settings, shutdown)
    }

    fn axis(value: i32) -> Step {
        Step::Sample(ControlSample::Axis { id: 0, value })
    }

    #[test]
    fn drain_stops_at_end_of_batch() {
        let mut event_loop = event_loop(vec![vec![axis(0x5000), axis(0)], vec![axis(-0x5000)]]);

        assert_eq!(event_loop.drain(), 2);
        assert_eq!(event_loop.injector().posted(), &[(0x7C, Down), (0x7C, Up)]);
        assert_eq!(event_loop.drain(), 1);
        assert_eq!(event_loop.state(), LoopState::Running);
    }

    #[test]
    fn end_to_end_axis_sequence() {
        let batches = vec![
            vec![axis(0), axis(0x5000)],
            vec![axis(0x5000), axis(0)],
            vec![axis(-0x5000), axis(0)],
        ];
        let mut event_loop = event_loop(batches);

        event_loop.run();

        assert_eq!(event_loop.state(), LoopState::Stopped);
        assert_eq!(
            event_loop.injector().posted(),
            &[(0x7C, Down), (0x7C, Up), (0x7B, Down), (0x7B, Up)]
        );
    }

    #[test]
    fn unmapped_samples_do_not_stop_the_loop() {
        let batches = vec![vec![
            Step::Sample(ControlSample::Button {
                id: 9,
                pressed: true,
            }),
            Step::Sample(ControlSample::Trigger { id: 4, value: 0x7FFF }),
            Step::Sample(ControlSample::Button {
                id: 0,
                pressed: true,
            }),
        ]];
        let mut event_loop = event_loop(batches);

        event_loop.run();

        assert_eq!(event_loop.state(), LoopState::Stopped);
        assert_eq!(event_loop.injector().posted(), &[(0x06, Down)]);
        assert_eq!(event_loop.unmapped, 2);
    }

    #[test]
    fn source_errors_are_survived() {
        let batches = vec![vec![axis(0x5000), Step::Fail], vec![axis(0)]];
        let mut event_loop = event_loop(batches);

        event_loop.run();

        assert_eq!(event_loop.injector().posted(), &[(0x7C, Down), (0x7C, Up)]);
    }

    #[test]
    fn disconnect_releases_held_keys() {
        let batches = vec![
            vec![
                axis(0x7FFF),
                Step::Sample(ControlSample::Trigger { id: 5, value: 0x7FFF }),
                Step::Fail,
            ],
            vec![axis(0x7FFF)],
        ];
        let mut event_loop = event_loop(batches);

        assert_eq!(event_loop.drain(), 2);
        let posted = event_loop.injector().posted();
        assert_eq!(&posted[..2], &[(0x7C, Down), (0x0F, Down)]);
        let mut released = posted[2..].to_vec();
        released.sort();
        assert_eq!(released, vec![(0x0F, Up), (0x7C, Up)]);

        // rest of the failed batch, then the reconnected pad pushes again
        assert_eq!(event_loop.drain(), 0);
        assert_eq!(event_loop.drain(), 1);
        assert_eq!(event_loop.injector().posted().last(), Some(&(0x7C, Down)));
        assert_eq!(event_loop.state(), LoopState::Running);
    }

    #[test]
    fn shutdown_releases_held_keys() {
        let batches = vec![vec![
            axis(-0x7FFF),
            Step::Sample(ControlSample::Trigger { id: 5, value: 0x7FFF }),
        ]];
        let mut event_loop = event_loop(batches);

        event_loop.run();

        let posted = event_loop.injector().posted();
        assert_eq!(&posted[..2], &[(0x7B, Down), (0x0F, Down)]);
        let mut released = posted[2..].to_vec();
        released.sort();
        assert_eq!(released, vec![(0x0F, Up), (0x7B, Up)]);
    }

    #[test]
    fn raised_flag_stops_before_draining() {
        let mut event_loop = event_loop(vec![vec![axis(0x7FFF)]]);
        event_loop.shutdown.store(true, Ordering::Release);

        event_loop.run();

        assert_eq!(event_loop.state(), LoopState::Stopped);
        assert!(event_loop.injector().posted().is_empty());
    }
}
