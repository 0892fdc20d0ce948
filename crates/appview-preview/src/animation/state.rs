//! Phase progression state machine.

use std::time::Duration;

use appview_model::{LoopType, SpriteInfo};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::PreviewConfig;

/// Parameters of one animation loop, fixed when the loop starts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Number of phases.
    pub frame_count: u32,
    pub loop_type: LoopType,
    /// Loops to play before stopping; only read for [`LoopType::Finite`].
    pub loop_count: Option<u32>,
    /// Time between ticks.
    pub interval: Duration,
    /// Phase shown before the first tick.
    pub start_phase: u32,
}

impl LoopConfig {
    /// Creates a loop starting at phase 0 with a 250 ms interval.
    pub fn new(frame_count: u32, loop_type: LoopType) -> Self {
        Self {
            frame_count,
            loop_type,
            loop_count: None,
            interval: Duration::from_millis(250),
            start_phase: 0,
        }
    }

    pub fn with_loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = Some(loop_count);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_start_phase(mut self, start_phase: u32) -> Self {
        self.start_phase = start_phase;
        self
    }

    /// Derives the loop of a frame group.
    ///
    /// The interval is the first phase's `duration_min` (default from
    /// `config`) clamped to the configured bounds. The start phase is
    /// `default_start_phase`, or a seeded random phase when the animation
    /// asks for one.
    pub fn from_sprite_info(info: &SpriteInfo, config: &PreviewConfig) -> Self {
        let frame_count = info.frame_count();
        let animation = info.animation.as_ref();

        let interval_ms = animation
            .and_then(|a| a.first_duration_min())
            .map_or(config.default_interval_ms, u64::from);

        let start_phase = match animation {
            Some(a) if a.random_start_phase && frame_count > 1 => {
                let seed = config.seed.unwrap_or_else(rand::random);
                Pcg32::seed_from_u64(seed).gen_range(0..frame_count)
            }
            Some(a) => a.default_start_phase.unwrap_or(0) % frame_count.max(1),
            None => 0,
        };

        Self {
            frame_count,
            loop_type: info.loop_type(),
            loop_count: animation.and_then(|a| a.loop_count),
            interval: config.clamp_interval(interval_ms),
            start_phase,
        }
    }
}

/// Mutable state of a running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRunState {
    pub phase: u32,
    /// +1 or -1; only changes under ping-pong.
    pub direction: i8,
    pub completed_loops: u32,
}

/// Outcome of a tick that changed something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// The loop moved to `phase`.
    Advanced { phase: u32 },
    /// A finite loop played its last loop and went idle on `phase`.
    Completed { phase: u32 },
}

impl TickEvent {
    pub fn phase(&self) -> u32 {
        match self {
            TickEvent::Advanced { phase } | TickEvent::Completed { phase } => *phase,
        }
    }
}

/// Idle/running phase machine driven one tick at a time.
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    config: LoopConfig,
    state: Option<AnimationRunState>,
}

impl AnimationLoop {
    /// Creates an idle loop.
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Starts the loop. Returns false when it was already running.
    pub fn start(&mut self) -> bool {
        if self.state.is_some() {
            return false;
        }
        let frames = self.config.frame_count.max(1);
        let phase = self.config.start_phase % frames;
        // A ping-pong loop starting on the last phase has to head back first
        let direction = if self.config.loop_type == LoopType::PingPong && frames > 1 && phase >= frames - 1 {
            -1
        } else {
            1
        };
        self.state = Some(AnimationRunState {
            phase,
            direction,
            completed_loops: 0,
        });
        true
    }

    /// Stops the loop. Safe when idle.
    pub fn stop(&mut self) {
        self.state = None;
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// Current phase, `None` when idle.
    pub fn phase(&self) -> Option<u32> {
        self.state.map(|s| s.phase)
    }

    pub fn run_state(&self) -> Option<&AnimationRunState> {
        self.state.as_ref()
    }

    /// Advances one step.
    ///
    /// Returns `None` when idle or when there is at most one phase.
    pub fn tick(&mut self) -> Option<TickEvent> {
        let frames = self.config.frame_count;
        let state = self.state.as_mut()?;
        if frames <= 1 {
            return None;
        }

        match self.config.loop_type {
            LoopType::Infinite => {
                state.phase = (state.phase + 1) % frames;
            }
            LoopType::PingPong => {
                state.phase = state.phase.saturating_add_signed(state.direction as i32);
                if state.phase >= frames - 1 {
                    state.direction = -1;
                } else if state.phase == 0 {
                    state.direction = 1;
                }
            }
            LoopType::Finite => {
                state.phase += 1;
                if state.phase >= frames {
                    state.phase = 0;
                    state.completed_loops += 1;
                    if self
                        .config
                        .loop_count
                        .is_some_and(|count| state.completed_loops >= count)
                    {
                        let phase = state.phase;
                        self.state = None;
                        return Some(TickEvent::Completed { phase });
                    }
                }
            }
        }
        Some(TickEvent::Advanced { phase: state.phase })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::{SpriteAnimation, SpritePhase};
    use pretty_assertions::assert_eq;

    fn phases(looper: &mut AnimationLoop, ticks: usize) -> Vec<u32> {
        (0..ticks)
            .map(|_| {
                looper.tick();
                looper.phase().unwrap_or(u32::MAX)
            })
            .collect()
    }

    #[test]
    fn test_infinite_wraps() {
        let mut looper = AnimationLoop::new(LoopConfig::new(3, LoopType::Infinite));
        assert!(looper.start());
        assert_eq!(phases(&mut looper, 7), vec![1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_ping_pong_bounces() {
        let mut looper = AnimationLoop::new(LoopConfig::new(5, LoopType::PingPong));
        looper.start();
        assert_eq!(
            phases(&mut looper, 10),
            vec![1, 2, 3, 4, 3, 2, 1, 0, 1, 2]
        );
    }

    #[test]
    fn test_ping_pong_two_phases() {
        let mut looper = AnimationLoop::new(LoopConfig::new(2, LoopType::PingPong));
        looper.start();
        assert_eq!(phases(&mut looper, 4), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_ping_pong_starting_on_last_phase_stays_in_range() {
        let config = LoopConfig::new(4, LoopType::PingPong).with_start_phase(3);
        let mut looper = AnimationLoop::new(config);
        looper.start();
        assert_eq!(phases(&mut looper, 5), vec![2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_finite_completes_after_loop_count() {
        let config = LoopConfig::new(3, LoopType::Finite).with_loop_count(2);
        let mut looper = AnimationLoop::new(config);
        looper.start();

        let events: Vec<_> = (0..6).map(|_| looper.tick()).collect();
        assert_eq!(events[2], Some(TickEvent::Advanced { phase: 0 }));
        assert_eq!(events[5], Some(TickEvent::Completed { phase: 0 }));
        assert!(!looper.is_running());

        assert_eq!(looper.tick(), None);
        assert_eq!(looper.phase(), None);
    }

    #[test]
    fn test_finite_without_count_runs_forever() {
        let mut looper = AnimationLoop::new(LoopConfig::new(2, LoopType::Finite));
        looper.start();
        for _ in 0..100 {
            assert!(matches!(looper.tick(), Some(TickEvent::Advanced { .. })));
        }
        assert_eq!(looper.run_state().unwrap().completed_loops, 50);
    }

    #[test]
    fn test_single_frame_ticks_are_noops() {
        let mut looper = AnimationLoop::new(LoopConfig::new(1, LoopType::Infinite));
        assert!(looper.start());
        assert_eq!(looper.tick(), None);
        assert_eq!(looper.phase(), Some(0));
        looper.stop();
        assert!(!looper.is_running());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut looper = AnimationLoop::new(LoopConfig::new(4, LoopType::Infinite));
        assert!(looper.start());
        looper.tick();
        assert!(!looper.start());
        assert_eq!(looper.phase(), Some(1));
    }

    #[test]
    fn test_stop_when_idle_is_safe() {
        let mut looper = AnimationLoop::new(LoopConfig::new(4, LoopType::Infinite));
        looper.stop();
        assert_eq!(looper.tick(), None);
    }

    #[test]
    fn test_interval_from_first_phase_is_clamped() {
        let config = PreviewConfig::default();
        let fast = SpriteInfo::new(vec![0; 2]).with_animation(SpriteAnimation::uniform(2, 10, 20));
        let slow = SpriteInfo::new(vec![0; 2]).with_animation(SpriteAnimation::uniform(2, 4000, 4000));
        let normal = SpriteInfo::new(vec![0; 2]).with_animation(SpriteAnimation::uniform(2, 180, 200));

        assert_eq!(LoopConfig::from_sprite_info(&fast, &config).interval, Duration::from_millis(50));
        assert_eq!(LoopConfig::from_sprite_info(&slow, &config).interval, Duration::from_millis(1000));
        assert_eq!(LoopConfig::from_sprite_info(&normal, &config).interval, Duration::from_millis(180));
    }

    #[test]
    fn test_interval_defaults_without_duration() {
        let mut animation = SpriteAnimation::uniform(0, 0, 0);
        animation.phases = vec![SpritePhase::default(); 3];
        let info = SpriteInfo::new(vec![0; 3]).with_animation(animation);
        let loop_config = LoopConfig::from_sprite_info(&info, &PreviewConfig::default());
        assert_eq!(loop_config.interval, Duration::from_millis(250));
        assert_eq!(loop_config.frame_count, 3);
    }

    #[test]
    fn test_start_phase_from_animation() {
        let mut animation = SpriteAnimation::uniform(4, 100, 100)
            .with_loop_type(LoopType::Finite)
            .with_loop_count(3);
        animation.default_start_phase = Some(6);
        let info = SpriteInfo::new(vec![0; 4]).with_animation(animation);

        let loop_config = LoopConfig::from_sprite_info(&info, &PreviewConfig::default());
        assert_eq!(loop_config.start_phase, 2);
        assert_eq!(loop_config.loop_type, LoopType::Finite);
        assert_eq!(loop_config.loop_count, Some(3));
    }

    #[test]
    fn test_random_start_phase_is_seeded() {
        let mut animation = SpriteAnimation::uniform(8, 100, 100);
        animation.random_start_phase = true;
        let info = SpriteInfo::new(vec![0; 8]).with_animation(animation);
        let config = PreviewConfig {
            seed: Some(42),
            ..Default::default()
        };

        let a = LoopConfig::from_sprite_info(&info, &config).start_phase;
        let b = LoopConfig::from_sprite_info(&info, &config).start_phase;
        assert_eq!(a, b);
        assert!(a < 8);
    }
}
