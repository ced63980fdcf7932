//! Fluent builder for constructing a [`Model`].

use ibm_core::{SimConfig, SimRng};
use ibm_events::{Listener, Scheduler};
use ibm_state::{StateStore, StateStoreBuilder};

use crate::{Model, Process, SimError, SimResult};

/// Fluent builder for [`Model`].
///
/// | Method                      | Default                               |
/// |-----------------------------|---------------------------------------|
/// | `.states(names)`            | required unless `.state_store(..)`    |
/// | `.initial_states(names)`    | everyone in the first state           |
/// | `.register_attribute::<T>()`| no attribute columns                  |
/// | `.state_store(store)`       | built from the three methods above    |
/// | `.events(names)`            | no event labels                       |
/// | `.listener(event, l)`       | none                                  |
/// | `.process(p)`               | none                                  |
///
/// ```rust,ignore
/// let mut model = ModelBuilder::new(config)
///     .states(["S", "I", "R"])
///     .initial_states(&initial)
///     .events(["Recovery"])
///     .listener("Recovery", recover)
///     .process(infection)
///     .build()?;
/// model.run(&mut NoopObserver)?;
/// ```
pub struct ModelBuilder {
    config:      SimConfig,
    store:       StateStoreBuilder,
    prebuilt:    Option<StateStore>,
    events:      Vec<String>,
    listeners:   Vec<(String, Box<dyn Listener>)>,
    processes:   Vec<Box<dyn Process>>,
}

impl ModelBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            store: StateStoreBuilder::new(config.population),
            config,
            prebuilt: None,
            events: Vec::new(),
            listeners: Vec::new(),
            processes: Vec::new(),
        }
    }

    /// Declare the state labels in code order.
    pub fn states<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.store = self.store.labels(names);
        self
    }

    /// Initial state of every person, by name.
    pub fn initial_states<S: AsRef<str>>(mut self, initial: &[S]) -> Self {
        self.store = self.store.initial_states(initial);
        self
    }

    /// Register a per-person attribute column `T`.
    pub fn register_attribute<T: Default + Send + 'static>(mut self) -> Self {
        self.store = self.store.register_attribute::<T>();
        self
    }

    /// Use a state store built elsewhere.  Overrides `states`,
    /// `initial_states`, and `register_attribute`.
    pub fn state_store(mut self, store: StateStore) -> Self {
        self.prebuilt = Some(store);
        self
    }

    /// Declare the event labels in code order (= firing order).
    pub fn events<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.events = names.into_iter().map(Into::into).collect();
        self
    }

    /// Register a listener for `event`.
    pub fn listener<L: Listener>(mut self, event: &str, listener: L) -> Self {
        self.listeners.push((event.to_owned(), Box::new(listener)));
        self
    }

    /// Append a per-step process.
    pub fn process<P: Process>(mut self, process: P) -> Self {
        self.processes.push(Box::new(process));
        self
    }

    /// Validate the configuration and inputs and return a model at step 0.
    pub fn build(self) -> SimResult<Model> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let state = match self.prebuilt {
            Some(store) => store,
            None => self.store.build()?,
        };
        if state.count() != self.config.population {
            return Err(SimError::PopulationMismatch {
                expected: self.config.population,
                got:      state.count(),
                what:     "state store",
            });
        }

        let mut scheduler = Scheduler::with_events(self.config.population, self.events)?;
        for (event, listener) in self.listeners {
            scheduler.register_boxed(&event, listener)?;
        }

        Ok(Model {
            clock:     self.config.make_clock(),
            rng:       SimRng::new(self.config.seed),
            config:    self.config,
            state,
            scheduler,
            processes: self.processes,
        })
    }
}
