//! Fluent builder for constructing a [`Sim`].

use bl_core::Horizon;
use bl_data::{DemandTable, Registry, ScenarioConfig, WeatherTable};
use bl_engine::{AllocationEngine, EngineParams, ScoringModel};
use bl_state::FacilityStore;

use crate::{Ledger, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`] — constants + horizon year
/// - [`Registry`] — plants, farms, distance table
/// - [`WeatherTable`] / [`DemandTable`] — sized to the horizon and registry
/// - `M: ScoringModel` — delivery scoring (e.g. [`bl_engine::NetCarbonModel`])
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                  |
/// |-------------------|--------------------------|
/// | `.engine_params(p)` | [`EngineParams::default`] |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, registry, weather, demand, NetCarbonModel)
///     .engine_params(EngineParams { panic_fill_ratio: 0.9, ..Default::default() })
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: ScoringModel> {
    config: ScenarioConfig,
    registry: Registry,
    weather: WeatherTable,
    demand: DemandTable,
    model: M,
    params: Option<EngineParams>,
}

impl<M: ScoringModel> SimBuilder<M> {
    /// Create a builder with all required inputs.
    pub fn new(
        config: ScenarioConfig,
        registry: Registry,
        weather: WeatherTable,
        demand: DemandTable,
        model: M,
    ) -> Self {
        Self { config, registry, weather, demand, model, params: None }
    }

    /// Override the engine's dispatch policy.
    pub fn engine_params(mut self, params: EngineParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Validate every input against every other, then return a ready-to-run
    /// [`Sim`] positioned at January 1 with empty plants.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for invalid constants, [`SimError::CountMismatch`]
    /// when a table doesn't cover the scenario's days, zones, or farms.
    /// Nothing is mutated before validation passes.
    pub fn build(self) -> SimResult<Sim<M>> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;
        let horizon = Horizon::new(self.config.horizon_year);

        let expect = |expected: usize, got: usize, what: &'static str| -> SimResult<()> {
            if expected == got {
                Ok(())
            } else {
                Err(SimError::CountMismatch { expected, got, what })
            }
        };

        expect(horizon.num_days() as usize, self.weather.num_days(), "weather days")?;
        expect(self.registry.zones.len(), self.weather.num_zones(), "weather zones")?;
        expect(horizon.num_days() as usize, self.demand.num_days(), "demand days")?;
        expect(self.registry.farm_count(), self.demand.num_farms(), "demand farms")?;

        let store = FacilityStore::new(&self.registry);
        let engine = AllocationEngine::new(self.model, self.params.unwrap_or_default());

        Ok(Sim {
            config: self.config,
            horizon,
            registry: self.registry,
            weather: self.weather,
            demand: self.demand,
            store,
            engine,
            ledger: Ledger::new(),
        })
    }
}
