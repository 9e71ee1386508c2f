// self
use crate::obs::{ComponentKind, EventOutcome};

/// Records a component event via the global metrics recorder (when enabled).
pub fn record_component_event(kind: ComponentKind, outcome: EventOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"relay_core_event_total",
			"component" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
