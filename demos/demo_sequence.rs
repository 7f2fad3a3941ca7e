//! Reference valve sequence.
//!
//! Runs the positions 0, 2, 1, 3, 0 of the reference angle table on console
//! pins, dwelling 3 s at positions 2, 1 and 3. Time is simulated, so the demo
//! finishes immediately and reports how long the real hardware would take.

use std::cell::Cell;
use std::rc::Rc;

use stepper_indexer::{Microsteps, SequenceBuilder, StepperMotor};

/// Simulated clock.
#[derive(Clone, Default)]
struct SimDelay {
    elapsed_ms: Rc<Cell<u64>>,
}

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ns as u64 / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ms as u64);
    }
}

/// Counts STEP pulses.
#[derive(Clone, Default)]
struct StepCounter {
    pulses: Rc<Cell<u32>>,
}

impl embedded_hal::digital::OutputPin for StepCounter {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pulses.set(self.pulses.get() + 1);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for StepCounter {
    type Error = core::convert::Infallible;
}

/// Prints every DIR change.
struct ConsoleDirPin;

impl embedded_hal::digital::OutputPin for ConsoleDirPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("  DIR -> high (forward)");
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        println!("  DIR -> low (backward)");
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for ConsoleDirPin {
    type Error = core::convert::Infallible;
}

fn main() {
    println!("=== Reference Valve Sequence ===\n");

    let step = StepCounter::default();
    let delay = SimDelay::default();

    let mut valve = StepperMotor::builder()
        .name("valve")
        .steps_per_revolution(200)
        .microsteps(Microsteps::SIXTEENTH)
        .reference_table()
        .step_pin(step.clone())
        .dir_pin(ConsoleDirPin)
        .delay(delay.clone())
        .build()
        .expect("Failed to build motor");

    println!(
        "Motor '{}': {} steps/rev, {:.1} steps/s",
        valve.name(),
        valve.geometry().steps_per_revolution(),
        valve.timing().steps_per_second()
    );
    for (index, entry) in valve.angle_table().iter().enumerate() {
        println!("  #{} {:<8} {:>5} steps", index, entry.name.as_str(), entry.steps.0);
    }
    println!();

    // Only the three middle stops dwell.
    for (index, settle_ms) in [(0usize, 0), (2, 3000), (1, 3000), (3, 3000), (0, 0)] {
        let single = SequenceBuilder::new()
            .motor("valve")
            .move_to(index)
            .settle(settle_ms)
            .build()
            .expect("Failed to build sequence");

        let before = step.pulses.get();
        valve = match valve.run_sequence(&single) {
            Ok(valve) => valve,
            Err((_, e)) => {
                eprintln!("Move to #{} failed: {}", index, e);
                std::process::exit(1);
            }
        };

        println!(
            "Moved to #{}: {} steps ({:.1}°), {} pulses",
            index,
            valve.position_steps().0,
            valve.position_degrees().value(),
            step.pulses.get() - before
        );
    }

    println!(
        "\nDone: {} pulses, {:.1} s of motor time",
        step.pulses.get(),
        delay.elapsed_ms.get() as f64 / 1000.0
    );
}
