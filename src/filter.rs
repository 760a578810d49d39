//! Process filter — last-chance veto before a notification goes out.
//!
//! How a filter decides is up to the owner. The monitor only asks.

/// Decides whether the next detected change should be swallowed.
///
/// Must be free of side effects; it is consulted on the monitor thread
/// once per detected change.
pub trait ProcessFilter: Send + Sync {
    fn should_suppress(&self) -> bool;
}

impl<F> ProcessFilter for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_suppress(&self) -> bool {
        self()
    }
}

/// `None` never suppresses.
pub fn suppresses(filter: Option<&dyn ProcessFilter>) -> bool {
    filter.is_some_and(|f| f.should_suppress())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_filter_never_suppresses() {
        assert!(!suppresses(None));
    }

    #[test]
    fn closures_are_filters() {
        let always = || true;
        let never = || false;
        assert!(suppresses(Some(&always)));
        assert!(!suppresses(Some(&never)));
    }
}
