//! The mutation gate: advisory serialization of interactive gestures.
//!
//! Interactive operations (navigate, zoom, pan, reorder) must not overlap:
//! a new structural mutation is refused while an earlier one is still in
//! flight. The gate makes that policy an explicit state machine rather than
//! a scattering of boolean flags. It is advisory in the same sense the
//! original per-track busy flags are: there is no true parallelism to guard
//! against, only user-initiated operations to serialize.

/// The phase a viewport's mutation cycle is in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    /// No structural mutation is in flight.
    #[default]
    Idle,

    /// Structural state (region windows, resolution, indices) is being
    /// rewritten synchronously.
    Mutating,

    /// Structural state is committed; tracks are re-rendering and layout
    /// has not yet settled.
    Settling,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Mutating => write!(f, "mutating"),
            Phase::Settling => write!(f, "settling"),
        }
    }
}

/// The error returned when a mutation is refused because another is in
/// flight.
#[derive(Debug, Eq, PartialEq)]
pub struct BusyError(Phase);

impl BusyError {
    /// Gets the phase the gate was in when the mutation was refused.
    pub fn phase(&self) -> Phase {
        self.0
    }
}

impl std::fmt::Display for BusyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a structural mutation is already in flight ({})", self.0)
    }
}

impl std::error::Error for BusyError {}

/// The mutation gate for one viewport.
#[derive(Debug, Default)]
pub struct MutationGate {
    /// The current phase.
    phase: Phase,
}

impl MutationGate {
    /// Gets the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Indicates whether a mutation is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Attempts to begin a structural mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::viewport::gate::MutationGate;
    ///
    /// let mut gate = MutationGate::default();
    /// assert!(gate.try_begin().is_ok());
    /// assert!(gate.try_begin().is_err());
    ///
    /// gate.begin_settling();
    /// assert!(gate.try_begin().is_err());
    ///
    /// gate.finish();
    /// assert!(gate.try_begin().is_ok());
    /// ```
    pub fn try_begin(&mut self) -> Result<(), BusyError> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Mutating;
                Ok(())
            }
            phase => Err(BusyError(phase)),
        }
    }

    /// Marks the synchronous rewrite as committed; tracks are now
    /// re-rendering.
    pub fn begin_settling(&mut self) {
        debug_assert_eq!(self.phase, Phase::Mutating);

        self.phase = Phase::Settling;
    }

    /// Ends the mutation cycle.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_the_gate_walks_its_phases() {
        let mut gate = MutationGate::default();
        assert_eq!(gate.phase(), Phase::Idle);
        assert!(!gate.is_busy());

        gate.try_begin().unwrap();
        assert_eq!(gate.phase(), Phase::Mutating);
        assert!(gate.is_busy());

        gate.begin_settling();
        assert_eq!(gate.phase(), Phase::Settling);

        gate.finish();
        assert_eq!(gate.phase(), Phase::Idle);
    }

    #[test]
    fn test_a_busy_gate_refuses_a_second_mutation() {
        let mut gate = MutationGate::default();
        gate.try_begin().unwrap();

        let err = gate.try_begin().unwrap_err();
        assert_eq!(err.phase(), Phase::Mutating);
        assert_eq!(
            err.to_string(),
            "a structural mutation is already in flight (mutating)"
        );
    }
}
