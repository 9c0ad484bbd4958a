use crate::error::Result;

/// What a single unit of work did to the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Work remains; the simulation can advance again.
    Advanced,
    /// The unit just performed was the last one.
    Done,
}

/// A simulation that advances one discrete unit of work at a time.
///
/// Implementations own their data set and all per-run progress. The
/// [`Simulator`](super::Simulator) holding a kernel guarantees `advance`
/// is never called after it has returned [`StepOutcome::Done`] and never
/// concurrently with a reconfiguration.
pub trait Stepwise {
    /// Render-ready copy of the current state.
    type Frame;

    /// Check configuration and data before a run starts.
    fn validate(&self) -> Result<()>;

    /// Perform exactly one unit of work.
    fn advance(&mut self) -> StepOutcome;

    /// Discard run progress, keeping the current data set.
    fn rewind(&mut self);

    /// Discard everything and draw a fresh data set.
    fn regenerate(&mut self);

    /// Units of work performed since the last rewind.
    fn units_done(&self) -> usize;

    /// Clusters discovered so far (or configured, for fixed-k kernels).
    fn clusters_found(&self) -> usize;

    /// Snapshot the state for the render collaborator.
    fn frame(&self) -> Self::Frame;
}
