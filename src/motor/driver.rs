//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types with type-state safety.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Degrees, Steps};
use crate::config::{AngleTable, MoveSequence, PositionRef, RevolutionGeometry};
use crate::error::{Error, MotorError, Result, SequenceError};
use crate::motion::{Direction, MotionExecutor, MovePlan, MoveRequest, StepTiming};
use crate::sequence::SequenceRegistry;

use super::builder::StepperMotorBuilder;
use super::position::Position;
use super::state::{Idle, MotorState, Moving, StateName};

/// Stepper motor driver with type-state safety.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
/// - `STATE`: Type-state marker (defaults to `Idle`)
pub struct StepperMotor<STEP, DIR, DELAY, STATE = Idle>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    STATE: MotorState,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward, or inverted).
    dir_pin: DIR,

    /// Delay provider for step timing.
    delay: DELAY,

    /// Last commanded position.
    position: Position,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Pulse timing.
    timing: StepTiming,

    /// Named positions of interest.
    table: AngleTable,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Default inversion flag for sequence moves.
    inverted_mount: bool,

    /// Motion executor for current move (if any).
    executor: Option<MotionExecutor>,

    /// A pin write failed during the current move.
    faulted: bool,

    /// Type-state marker.
    _state: PhantomData<STATE>,
}

impl<STEP, DIR, DELAY, STATE> StepperMotor<STEP, DIR, DELAY, STATE>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    STATE: MotorState + StateName,
{
    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// Get current position in degrees.
    #[inline]
    pub fn position_degrees(&self) -> Degrees {
        self.position.degrees()
    }

    /// Check whether the stored position can be trusted.
    #[inline]
    pub fn is_position_verified(&self) -> bool {
        self.position.is_verified()
    }

    /// Get the revolution geometry.
    #[inline]
    pub fn geometry(&self) -> &RevolutionGeometry {
        self.position.geometry()
    }

    /// Get the pulse timing.
    #[inline]
    pub fn timing(&self) -> StepTiming {
        self.timing
    }

    /// Get the angle table.
    #[inline]
    pub fn angle_table(&self) -> &AngleTable {
        &self.table
    }

    /// Default inversion flag applied to sequence moves.
    #[inline]
    pub fn inverted_mount(&self) -> bool {
        self.inverted_mount
    }

    /// Get the current state name.
    #[inline]
    pub fn state_name(&self) -> &'static str {
        STATE::name()
    }

    fn transition<NEXT: MotorState>(
        self,
        executor: Option<MotionExecutor>,
    ) -> StepperMotor<STEP, DIR, DELAY, NEXT> {
        StepperMotor {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            delay: self.delay,
            position: self.position,
            current_direction: self.current_direction,
            timing: self.timing,
            table: self.table,
            name: self.name,
            invert_direction: self.invert_direction,
            inverted_mount: self.inverted_mount,
            executor,
            faulted: false,
            _state: PhantomData,
        }
    }

    /// Record a pin failure: position is kept but no longer trusted.
    fn fault(&mut self) {
        self.faulted = true;
        self.current_direction = None;
        self.position.mark_unverified();
        error!(
            "{}: pin write failed, position {} unverified",
            self.name.as_str(),
            self.position.steps().0
        );
    }
}

impl<STEP, DIR, DELAY> StepperMotor<STEP, DIR, DELAY, Idle>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Start building a motor.
    pub fn builder() -> StepperMotorBuilder<STEP, DIR, DELAY> {
        StepperMotorBuilder::new()
    }

    /// Create a new motor in the Idle state at the zero reference.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        geometry: RevolutionGeometry,
        timing: StepTiming,
        table: AngleTable,
        name: heapless::String<32>,
        invert_direction: bool,
        inverted_mount: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            position: Position::new(geometry),
            current_direction: None,
            timing,
            table,
            name,
            invert_direction,
            inverted_mount,
            executor: None,
            faulted: false,
            _state: PhantomData,
        }
    }

    /// Plan a move from the current position without executing it.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PositionUnverified` after a fault until the motor is re-homed.
    pub fn plan(&self, request: MoveRequest) -> Result<MovePlan> {
        if !self.position.is_verified() {
            warn!("{}: refusing to plan from an unverified position", self.name.as_str());
            return Err(Error::Motor(MotorError::PositionUnverified));
        }
        Ok(request.plan(self.position.steps(), self.position.geometry()))
    }

    /// Start a move to an absolute position.
    ///
    /// Sets the direction pin and returns a motor in the `Moving` state. Pulses are
    /// emitted by [`StepperMotor::step`].
    pub fn move_to(
        mut self,
        request: MoveRequest,
    ) -> core::result::Result<StepperMotor<STEP, DIR, DELAY, Moving>, (Self, Error)> {
        let plan = match self.plan(request) {
            Ok(plan) => plan,
            Err(e) => return Err((self, e)),
        };

        if !plan.is_zero() && self.set_direction(plan.direction).is_err() {
            self.fault();
            return Err((self, Error::Motor(MotorError::PinError)));
        }

        let executor = MotionExecutor::new(plan, self.timing);
        Ok(self.transition(Some(executor)))
    }

    /// Move to an absolute position and run to completion (blocking).
    ///
    /// This is a convenience method that combines `move_to` and `run_to_completion`.
    pub fn move_to_blocking(
        self,
        request: MoveRequest,
    ) -> core::result::Result<Self, (Self, Error)> {
        self.move_to(request)?.run_to_completion()
    }

    /// Move to the angle table entry at `index` (blocking).
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidPosition` if `index` is outside the table.
    pub fn move_to_index(
        self,
        index: usize,
        inversion: bool,
    ) -> core::result::Result<Self, (Self, Error)> {
        self.move_to_position(&PositionRef::Index(index), inversion)
    }

    /// Move to the angle table entry called `name` (blocking).
    pub fn move_to_named(
        self,
        name: &str,
        inversion: bool,
    ) -> core::result::Result<Self, (Self, Error)> {
        match self.table.by_name(name) {
            Ok(target) => self.move_to_blocking(MoveRequest::new(target).inverted(inversion)),
            Err(e) => Err((self, e)),
        }
    }

    /// Move to a referenced angle table entry (blocking).
    pub fn move_to_position(
        self,
        position: &PositionRef,
        inversion: bool,
    ) -> core::result::Result<Self, (Self, Error)> {
        match self.table.resolve(position) {
            Ok(target) => self.move_to_blocking(MoveRequest::new(target).inverted(inversion)),
            Err(e) => Err((self, e)),
        }
    }

    /// Run a move sequence to completion, pausing after each move for its settle time.
    ///
    /// Every target is resolved before the first pulse, so a bad reference never
    /// leaves a sequence half-run.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is for another motor, a target does not
    /// resolve, or a move fails.
    pub fn run_sequence(
        mut self,
        sequence: &MoveSequence,
    ) -> core::result::Result<Self, (Self, Error)> {
        if sequence.motor.as_str() != self.name.as_str() {
            let err = SequenceError::WrongMotor {
                expected: sequence.motor.clone(),
                actual: self.name.clone(),
            };
            return Err((self, err.into()));
        }

        for m in sequence.moves.iter() {
            if let Err(e) = m.target(&self.table) {
                return Err((self, e));
            }
        }

        info!("{}: running sequence of {} moves", self.name.as_str(), sequence.len());

        for m in sequence.moves.iter() {
            let target = match m.target(&self.table) {
                Ok(target) => target,
                Err(e) => return Err((self, e)),
            };
            let request = MoveRequest::new(target).inverted(m.inversion(self.inverted_mount));
            self = self.move_to_blocking(request)?;
            self.settle(m.settle_ms);
        }

        Ok(self)
    }

    /// Look up a sequence by name and run it.
    pub fn run_named_sequence(
        self,
        sequence_name: &str,
        registry: &SequenceRegistry,
    ) -> core::result::Result<Self, (Self, Error)> {
        match registry.get_or_error(sequence_name) {
            Ok(sequence) => self.run_sequence(sequence),
            Err(e) => Err((self, e)),
        }
    }

    /// Wait in place.
    pub fn settle(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    /// Set the current position as the origin (zero) and trust it again.
    pub fn set_origin(&mut self) {
        self.position.set_origin();
    }

    /// Re-home: declare the shaft to be at `steps` and trust it again.
    pub fn rehome_at(&mut self, steps: Steps) {
        self.position.rehome_at(steps);
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }

    fn set_direction(&mut self, direction: Direction) -> core::result::Result<(), ()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Backward => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| ())?;
        } else {
            self.dir_pin.set_low().map_err(|_| ())?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<STEP, DIR, DELAY> StepperMotor<STEP, DIR, DELAY, Moving>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Execute one step pulse.
    ///
    /// Returns `true` if the move is complete. On a pin error the move is aborted:
    /// further calls keep failing and [`finish`](Self::finish) leaves the position
    /// unchanged and unverified.
    pub fn step(&mut self) -> Result<bool> {
        if self.faulted {
            return Err(Error::Motor(MotorError::PinError));
        }

        let timing = match self.executor.as_ref() {
            Some(executor) if executor.is_complete() => return Ok(true),
            Some(executor) => executor.timing(),
            None => return Err(Error::Motor(MotorError::NotInitialized)),
        };

        if self.pulse(timing).is_err() {
            self.fault();
            return Err(Error::Motor(MotorError::PinError));
        }

        let executor = self.executor.as_mut().ok_or(MotorError::NotInitialized)?;
        let has_more = executor.advance();
        trace!(
            "{}: step {}/{}",
            self.name.as_str(),
            executor.current_step(),
            executor.total_steps()
        );

        // Sets the step rate
        self.delay.delay_ms(timing.inter_step_delay_ms);

        Ok(!has_more)
    }

    fn pulse(&mut self, timing: StepTiming) -> core::result::Result<(), ()> {
        self.step_pin.set_high().map_err(|_| ())?;
        self.delay.delay_ms(timing.pulse_high_ms);
        self.step_pin.set_low().map_err(|_| ())
    }

    /// Check if the move is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.executor
            .as_ref()
            .map(|e| e.is_complete())
            .unwrap_or(true)
    }

    /// Check if a pin write failed during this move.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Get move progress (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.executor.as_ref().map(|e| e.progress()).unwrap_or(1.0)
    }

    /// Steps still to emit.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.executor
            .as_ref()
            .map(|e| e.steps_remaining())
            .unwrap_or(0)
    }

    /// Direction of the move in progress.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.executor.as_ref().map(|e| e.direction())
    }

    /// The plan being executed.
    #[inline]
    pub fn current_plan(&self) -> Option<&MovePlan> {
        self.executor.as_ref().map(|e| e.plan())
    }

    /// Complete the move and return to Idle state.
    ///
    /// After a full move the position becomes the plan's effective target. If the
    /// move was cut short the position reached so far is stored. After a fault the
    /// position is left unchanged.
    pub fn finish(mut self) -> StepperMotor<STEP, DIR, DELAY, Idle> {
        if let Some(executor) = self.executor.take() {
            if self.faulted {
                warn!(
                    "{}: move aborted by fault after {} of {} steps",
                    self.name.as_str(),
                    executor.current_step(),
                    executor.total_steps()
                );
            } else if executor.is_complete() {
                self.position.set_steps(executor.plan().effective_target);
                info!(
                    "{}: reached {} steps",
                    self.name.as_str(),
                    self.position.steps().0
                );
            } else {
                let reached = executor.position(self.position.geometry());
                self.position.set_steps(reached);
                info!(
                    "{}: stopped at {} steps, {} short of target",
                    self.name.as_str(),
                    reached.0,
                    executor.steps_remaining()
                );
            }
        }
        self.transition(None)
    }

    /// Stop between steps and return to Idle, keeping the position reached so far.
    pub fn abort(self) -> StepperMotor<STEP, DIR, DELAY, Idle> {
        self.finish()
    }

    /// Run the move to completion (blocking).
    ///
    /// # Errors
    ///
    /// On a pin error the motor is returned idle alongside the error, with its
    /// position unchanged and unverified.
    pub fn run_to_completion(
        mut self,
    ) -> core::result::Result<StepperMotor<STEP, DIR, DELAY, Idle>, (StepperMotor<STEP, DIR, DELAY, Idle>, Error)>
    {
        while !self.is_complete() {
            if let Err(e) = self.step() {
                return Err((self.finish(), e));
            }
        }
        Ok(self.finish())
    }
}
