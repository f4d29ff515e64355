//! Routes each effect to every adapter that supports it.

use tracing::{debug, warn};

use crate::{EffectDispatcher, EffectName, EffectParams, Result};

/// A dispatcher made of other dispatchers.
///
/// An effect is offered to every registered adapter that supports it. One
/// adapter failing does not stop the others; the first error is returned
/// after all of them ran.
#[derive(Default)]
pub struct EffectRouter {
    dispatchers: Vec<Box<dyn EffectDispatcher>>,
}

impl EffectRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with(mut self, dispatcher: impl EffectDispatcher + 'static) -> Self {
        self.push(Box::new(dispatcher));
        self
    }

    pub fn push(&mut self, dispatcher: Box<dyn EffectDispatcher>) {
        debug!(dispatcher = dispatcher.name(), "registered effect dispatcher");
        self.dispatchers.push(dispatcher);
    }

    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.dispatchers.iter().map(|d| d.name()).collect()
    }
}

impl std::fmt::Debug for EffectRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRouter")
            .field("dispatchers", &self.names())
            .finish()
    }
}

impl EffectDispatcher for EffectRouter {
    fn name(&self) -> &str {
        "router"
    }

    fn supports(&self, effect: EffectName) -> bool {
        self.dispatchers.iter().any(|d| d.supports(effect))
    }

    fn trigger_named_effect(&self, name: &str, params: &EffectParams) -> Result<()> {
        let effect: EffectName = name.parse()?;
        let mut first_error = None;
        let mut handled = false;

        for dispatcher in self.dispatchers.iter().filter(|d| d.supports(effect)) {
            handled = true;
            if let Err(e) = dispatcher.trigger_named_effect(name, params) {
                warn!(dispatcher = dispatcher.name(), effect = %effect, error = %e, "effect failed");
                first_error.get_or_insert(e);
            }
        }

        if !handled {
            debug!(effect = %effect, "no dispatcher handles effect");
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectError;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        handles: Vec<EffectName>,
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EffectDispatcher for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, effect: EffectName) -> bool {
            self.handles.contains(&effect)
        }

        fn trigger_named_effect(&self, name: &str, _params: &EffectParams) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, name));
            if self.fail {
                Err(EffectError::Status {
                    status: 503,
                    url: "http://fake".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recorder(
        name: &'static str,
        handles: Vec<EffectName>,
        fail: bool,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Recorder {
        Recorder {
            name,
            handles,
            fail,
            log: Arc::clone(log),
        }
    }

    #[test]
    fn test_fans_out_to_supporting_dispatchers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = EffectRouter::new()
            .with(recorder("ha", vec![EffectName::LightsOn], false, &log))
            .with(recorder("st", vec![EffectName::LightsOn], false, &log))
            .with(recorder("media", vec![EffectName::NextTrack], false, &log));

        router
            .trigger_named_effect("lights_on", &EffectParams::new())
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["ha:lights_on", "st:lights_on"]);
    }

    #[test]
    fn test_failure_does_not_stop_other_dispatchers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = EffectRouter::new()
            .with(recorder("ha", vec![EffectName::LightsOff], true, &log))
            .with(recorder("st", vec![EffectName::LightsOff], false, &log));

        let result = router.trigger_named_effect("lights_off", &EffectParams::new());
        assert!(matches!(result, Err(EffectError::Status { status: 503, .. })));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unhandled_effect_is_ok() {
        let router = EffectRouter::new();
        assert!(!router.supports(EffectName::Gong));
        assert!(router
            .trigger_named_effect("gong", &EffectParams::new())
            .is_ok());
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let router = EffectRouter::new();
        let err = router
            .trigger_named_effect("fog_machine", &EffectParams::new())
            .unwrap_err();
        assert!(matches!(err, EffectError::UnknownEffect(_)));
    }
}
