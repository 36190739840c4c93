//! Per-frame loop driving motion, sonification and rendering in order.
//!
//! Each tick runs, strictly in this order:
//! 1. camera control
//! 2. clock accumulation
//! 3. motion update for every mover
//! 4. gain mapping per column (row-0 mover)
//! 5. rendering of every mover and walker marker
//! 6. fixed-step gate (walker step when enabled)
//!
//! Motion is computed before it is heard or drawn, so audio and visuals in a
//! tick always describe the same state.

use std::time::Instant;

use glam::Vec3;

use crate::audio::{plan_frequencies, AudioParameterMapper, VoiceBank};
use crate::error::SimError;
use crate::field::{MotionField, MoverId};
use crate::gate::FixedStepGate;
use crate::params::SimConfig;
use crate::walker::{Marker, Walker};

/// Rendering capability consumed by the scheduler
pub trait Presenter {
    /// Advance camera/orbit control by one frame
    fn update_camera(&mut self, dt_s: f32);

    /// Place a mover's visual body for this frame
    fn place_body(&mut self, id: MoverId, position: Vec3);

    /// Place one walker marker for this frame
    fn place_marker(&mut self, marker: &Marker);

    /// Submit the frame
    fn draw(&mut self) -> Result<(), SimError>;
}

/// Presenter that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn update_camera(&mut self, _dt_s: f32) {}

    fn place_body(&mut self, _id: MoverId, _position: Vec3) {}

    fn place_marker(&mut self, _marker: &Marker) {}

    fn draw(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Monotonic clock returning the time since the previous call
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds elapsed since the last call (or since creation)
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable simulation state, owned by the scheduler
#[derive(Debug)]
pub struct SimulationContext {
    pub field: MotionField,
    pub mapper: AudioParameterMapper,
    pub gate: FixedStepGate,
    pub walker: Option<Walker>,
    pub ticks: u64,
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Advanced {
        tick: u64,
        gate_fired: bool,
        walker_stepped: bool,
    },
    Stopped,
}

/// Cooperative per-frame scheduler
#[derive(Debug)]
pub struct Scheduler {
    ctx: SimulationContext,
    running: bool,
}

impl Scheduler {
    /// Validate `config`, build the simulation and trigger every voice once
    ///
    /// Any configuration or backend error aborts before the loop starts.
    pub fn initialize(config: &SimConfig, voices: &mut dyn VoiceBank) -> Result<Self, SimError> {
        config.validate()?;

        let field = MotionField::new(&config.motion)?;
        let frequencies = plan_frequencies(&config.voices, field.columns())?;

        if voices.voice_count() < frequencies.len() {
            return Err(SimError::VoiceOutOfRange {
                voice: frequencies.len() - 1,
                count: voices.voice_count(),
            });
        }
        for (voice, freq_hz) in frequencies.iter().enumerate() {
            voices.trigger(voice, *freq_hz)?;
        }

        let gate = FixedStepGate::new(config.schedule.step_interval_s)?;
        let walker = if config.schedule.walker_enabled {
            Some(Walker::new(&config.schedule)?)
        } else {
            None
        };

        log::info!(
            "Simulation ready: {} movers, {} voices ({:.1}-{:.1} Hz), walker {}",
            field.len(),
            frequencies.len(),
            frequencies.iter().copied().fold(f32::INFINITY, f32::min),
            frequencies.iter().copied().fold(0.0, f32::max),
            if walker.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            ctx: SimulationContext {
                field,
                mapper: AudioParameterMapper::new(config.gain.clone()),
                gate,
                walker,
                ticks: 0,
            },
            running: true,
        })
    }

    /// Run one frame
    ///
    /// A draw failure is returned only after the rest of the tick has run.
    pub fn tick(
        &mut self,
        dt_s: f32,
        voices: &mut dyn VoiceBank,
        presenter: &mut dyn Presenter,
    ) -> Result<TickOutcome, SimError> {
        if !self.running {
            return Ok(TickOutcome::Stopped);
        }
        let ctx = &mut self.ctx;

        presenter.update_camera(dt_s);
        ctx.gate.accumulate(dt_s);

        ctx.field.update();
        ctx.mapper.apply(&ctx.field, voices);

        for mover in ctx.field.iter() {
            presenter.place_body(mover.id(), mover.position());
        }
        if let Some(walker) = &ctx.walker {
            for marker in walker.markers() {
                presenter.place_marker(marker);
            }
        }
        // The tick's state has already advanced; finish it before reporting
        let drawn = presenter.draw();

        let gate_fired = ctx.gate.fire();
        let walker_stepped = match (&mut ctx.walker, gate_fired) {
            (Some(walker), true) => {
                walker.step();
                true
            }
            _ => false,
        };
        if gate_fired {
            log::trace!("Fixed step {} fired", ctx.gate.fired());
        }

        ctx.ticks += 1;
        drawn?;
        Ok(TickOutcome::Advanced {
            tick: ctx.ticks,
            gate_fired,
            walker_stepped,
        })
    }

    /// Stop the loop; later ticks do nothing
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped after {} ticks", self.ctx.ticks);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HeadlessVoices;
    use crate::params::{MotionParams, ScheduleParams};

    /// Records the order of calls within a tick
    #[derive(Default)]
    struct RecordingPresenter {
        events: Vec<&'static str>,
        bodies: Vec<(MoverId, Vec3)>,
        markers: usize,
    }

    impl Presenter for RecordingPresenter {
        fn update_camera(&mut self, _dt_s: f32) {
            self.events.push("camera");
        }

        fn place_body(&mut self, id: MoverId, position: Vec3) {
            self.bodies.push((id, position));
        }

        fn place_marker(&mut self, _marker: &Marker) {
            self.markers += 1;
        }

        fn draw(&mut self) -> Result<(), SimError> {
            self.events.push("draw");
            Ok(())
        }
    }

    fn small_config() -> SimConfig {
        SimConfig {
            motion: MotionParams {
                columns: 6,
                rows: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_triggers_every_voice_once() {
        let config = small_config();
        let mut voices = HeadlessVoices::new(6);
        let scheduler = Scheduler::initialize(&config, &mut voices).unwrap();

        let planned = plan_frequencies(&config.voices, 6).unwrap();
        for (voice, freq) in planned.iter().enumerate() {
            assert_eq!(voices.frequency(voice), Some(*freq));
        }
        assert_eq!(scheduler.context().field.len(), 18);
        assert_eq!(voices.ramp_count(), 0);
    }

    #[test]
    fn test_initialize_fails_fast_on_bad_config() {
        let mut config = small_config();
        config.schedule.step_interval_s = -1.0;
        let mut voices = HeadlessVoices::new(6);

        let err = Scheduler::initialize(&config, &mut voices).unwrap_err();
        assert_eq!(err, SimError::InvalidInterval(-1.0));
        assert_eq!(voices.frequency(0), None);
    }

    #[test]
    fn test_initialize_rejects_short_voice_bank() {
        let mut voices = HeadlessVoices::new(2);
        let err = Scheduler::initialize(&small_config(), &mut voices).unwrap_err();
        assert!(matches!(err, SimError::VoiceOutOfRange { .. }));
    }

    #[test]
    fn test_gain_reflects_same_tick_height() {
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&small_config(), &mut voices).unwrap();
        let mut presenter = RecordingPresenter::default();

        for _ in 0..30 {
            scheduler
                .tick(1.0 / 60.0, &mut voices, &mut presenter)
                .unwrap();

            let ctx = scheduler.context();
            for column in 0..ctx.field.columns() {
                let mover = ctx.field.representative(column).unwrap();
                let expected = ctx.mapper.gain_db(mover.height(), mover.amplitude().y);
                assert_eq!(voices.level_db(column), Some(expected));
            }
        }
    }

    #[test]
    fn test_render_sees_updated_positions() {
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&small_config(), &mut voices).unwrap();
        let mut presenter = RecordingPresenter::default();

        scheduler
            .tick(1.0 / 60.0, &mut voices, &mut presenter)
            .unwrap();

        assert_eq!(presenter.events, vec!["camera", "draw"]);
        assert_eq!(presenter.bodies.len(), 18);
        for (id, position) in &presenter.bodies {
            let mover = scheduler.context().field.get(*id).unwrap();
            assert_eq!(*position, mover.position());
        }
    }

    #[test]
    fn test_walker_steps_on_gate() {
        let mut config = small_config();
        config.schedule = ScheduleParams {
            walker_enabled: true,
            ..Default::default()
        };
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&config, &mut voices).unwrap();
        let mut presenter = RecordingPresenter::default();

        let mut steps = 0;
        for _ in 0..12 {
            let outcome = scheduler
                .tick(0.1, &mut voices, &mut presenter)
                .unwrap();
            if let TickOutcome::Advanced { walker_stepped, .. } = outcome {
                if walker_stepped {
                    steps += 1;
                }
            }
        }

        assert_eq!(steps, 2);
        let walker = scheduler.context().walker.as_ref().unwrap();
        assert_eq!(walker.marker_count(), 2);
        // Markers spawned on a tick are drawn from the next tick on
        assert!(presenter.markers >= 1);
    }

    #[test]
    fn test_gate_runs_without_walker() {
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&small_config(), &mut voices).unwrap();

        let outcome = scheduler
            .tick(0.6, &mut voices, &mut NullPresenter)
            .unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Advanced {
                tick: 1,
                gate_fired: true,
                walker_stepped: false
            }
        );
    }

    #[test]
    fn test_initialize_rejects_negative_amplitude() {
        let mut config = small_config();
        config.motion.amplitude.y = -2.5;
        let mut voices = HeadlessVoices::new(6);

        let err = Scheduler::initialize(&config, &mut voices).unwrap_err();
        assert_eq!(err, SimError::InvalidAmplitude(-2.5));
        assert_eq!(voices.frequency(0), None);
    }

    /// Presenter whose every frame submission fails
    struct FailingPresenter;

    impl Presenter for FailingPresenter {
        fn update_camera(&mut self, _dt_s: f32) {}

        fn place_body(&mut self, _id: MoverId, _position: Vec3) {}

        fn place_marker(&mut self, _marker: &Marker) {}

        fn draw(&mut self) -> Result<(), SimError> {
            Err(SimError::Render("surface lost".to_string()))
        }
    }

    #[test]
    fn test_draw_error_still_completes_tick() {
        let mut config = small_config();
        config.schedule.walker_enabled = true;
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&config, &mut voices).unwrap();

        let err = scheduler
            .tick(0.6, &mut voices, &mut FailingPresenter)
            .unwrap_err();
        assert_eq!(err, SimError::Render("surface lost".to_string()));

        let ctx = scheduler.context();
        assert_eq!(ctx.ticks, 1);
        assert_eq!(ctx.gate.fired(), 1);
        assert_eq!(ctx.walker.as_ref().unwrap().markers_spawned(), 1);

        let outcome = scheduler
            .tick(0.016, &mut voices, &mut NullPresenter)
            .unwrap();
        assert!(matches!(outcome, TickOutcome::Advanced { tick: 2, .. }));
    }

    #[test]
    fn test_stop_freezes_state() {
        let mut voices = HeadlessVoices::new(6);
        let mut scheduler = Scheduler::initialize(&small_config(), &mut voices).unwrap();
        scheduler
            .tick(0.016, &mut voices, &mut NullPresenter)
            .unwrap();
        scheduler.stop();

        let ramps = voices.ramp_count();
        let height = scheduler.context().field.representative(0).unwrap().height();

        let outcome = scheduler
            .tick(0.016, &mut voices, &mut NullPresenter)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Stopped);
        assert!(!scheduler.is_running());
        assert_eq!(voices.ramp_count(), ramps);
        assert_eq!(
            scheduler.context().field.representative(0).unwrap().height(),
            height
        );
    }

    #[test]
    fn test_frame_clock_non_negative() {
        let mut clock = FrameClock::new();
        assert!(clock.delta() >= 0.0);
        assert!(clock.delta() >= 0.0);
    }
}
