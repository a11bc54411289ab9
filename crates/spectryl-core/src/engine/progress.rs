use std::fmt;

/// Pipeline phase of an averaged-spectrum calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Applying trimming rules and computing the kept-mask.
    Trim,
    /// Broadening each kept conformer's bars into a spectrum.
    Synthesize,
    /// Collapsing per-conformer results by Boltzmann population.
    Average,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Trim => write!(f, "Trimming"),
            Phase::Synthesize => write!(f, "Synthesis"),
            Phase::Average => write!(f, "Averaging"),
        }
    }
}

/// Progress events emitted while a calculation runs.
///
/// Task events carry per-conformer granularity within the enclosing phase;
/// `Message` carries occasional human-readable notes such as trimming
/// summaries.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { phase: Phase },
    PhaseFinish { phase: Phase },

    TaskStart { total: u64 },
    TaskIncrement { amount: u64 },
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn phases_display_their_pipeline_names() {
        assert_eq!(Phase::Trim.to_string(), "Trimming");
        assert_eq!(Phase::Synthesize.to_string(), "Synthesis");
        assert_eq!(Phase::Average.to_string(), "Averaging");
    }

    #[test]
    fn reporter_forwards_events_to_the_callback() {
        let seen: Mutex<Vec<Phase>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { phase } = event {
                seen.lock().unwrap().push(phase);
            }
        }));
        reporter.report(Progress::PhaseStart { phase: Phase::Trim });
        reporter.report(Progress::TaskStart { total: 3 });
        reporter.report(Progress::PhaseFinish { phase: Phase::Trim });
        assert_eq!(*seen.lock().unwrap(), vec![Phase::Trim]);
    }

    #[test]
    fn reporter_without_callback_swallows_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("no listener".to_string()));
    }
}
