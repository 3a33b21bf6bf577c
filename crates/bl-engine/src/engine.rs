//! The `AllocationEngine` and its per-day greedy planning pass.

use bl_core::{Day, FarmId, StpId};
use bl_data::{DemandTable, Registry, ScenarioConfig};
use bl_state::FacilityStore;

use crate::scoring::{DeliveryContext, DeliveryImpact, ScoringModel, truck_count};

// ── Plan types ────────────────────────────────────────────────────────────────

/// One planned truck run (possibly several truck-loads) for one day.
///
/// Day-scoped: consumed by the state store the same day and recorded in the
/// day record; shipments have no cross-day identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub stp: StpId,
    pub farm: FarmId,
    pub tons: f64,
    /// `ceil(tons / truck_capacity)`.
    pub trucks: u32,
    pub distance_km: f64,
}

/// The engine's output for one day: ordered shipments plus the day's carbon
/// accounting (overflow penalties are booked by the simulation loop, which
/// owns the production step).
#[derive(Debug, Clone, Default)]
pub struct DayPlan {
    pub shipments: Vec<Shipment>,
    pub credits_kg: f64,
    pub emissions_kg: f64,
    pub penalties_kg: f64,
}

impl DayPlan {
    /// Net carbon delta of the planned shipments.
    #[inline]
    pub fn net_kg(&self) -> f64 {
        self.credits_kg - self.emissions_kg - self.penalties_kg
    }

    fn book(&mut self, impact: DeliveryImpact) {
        self.credits_kg += impact.credits_kg;
        self.emissions_kg += impact.emissions_kg;
        self.penalties_kg += impact.penalties_kg;
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Tunable dispatch policy.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Above this storage occupancy a plant dispatches even at a negative
    /// score — accepting minor debits beats an overflow penalty.
    pub panic_fill_ratio: f64,
    /// Loads below this are not worth sending a truck for.
    pub min_dispatch_tons: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self { panic_fill_ratio: 0.8, min_dispatch_tons: 1.0 }
    }
}

/// Read-only per-day inputs assembled by the simulation loop.
pub struct PlanningContext<'a> {
    pub day: Day,
    pub registry: &'a Registry,
    pub demand: &'a DemandTable,
    pub config: &'a ScenarioConfig,
}

impl PlanningContext<'_> {
    /// The farm's total nitrogen demand today, kg N (per-ha demand × area).
    #[inline]
    pub fn farm_demand_kg_n(&self, farm: FarmId) -> f64 {
        self.demand.kg_n_per_ha(self.day.index(), farm) * self.registry.farm(farm).area_ha
    }
}

/// A scored candidate delivery, before dispatch.
struct Candidate {
    farm: FarmId,
    score: f64,
    /// Load the score was computed at.
    load_tons: f64,
    distance_km: f64,
}

/// The daily scheduler.  Stateless across days; all mutable state lives in
/// the [`FacilityStore`].
pub struct AllocationEngine<M: ScoringModel> {
    model: M,
    params: EngineParams,
}

impl<M: ScoringModel> AllocationEngine<M> {
    pub fn new(model: M, params: EngineParams) -> Self {
        Self { model, params }
    }

    /// Plan one day's shipments against the post-production store state.
    ///
    /// The store is read-only here; the returned plan is feasible by
    /// construction (every shipment respects plant inventory, farm intake,
    /// and rain locks as of this snapshot).
    pub fn plan_day(&self, ctx: &PlanningContext<'_>, store: &FacilityStore) -> DayPlan {
        let mut plan = DayPlan::default();
        let mut served = vec![false; store.farm_count()];

        for stp in self.triage(store) {
            let mut available = store.inventory_tons(stp);
            if available < self.params.min_dispatch_tons {
                continue;
            }
            let fill = store.fill_ratio(stp);

            let mut candidates = self.score_candidates(ctx, store, stp, available, &served);
            // Best score first; equal scores go to the lower farm ID.
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.farm.cmp(&b.farm)));

            for cand in candidates {
                if available < self.params.min_dispatch_tons {
                    break;
                }
                if cand.score <= 0.0 && fill <= self.params.panic_fill_ratio {
                    // Sorted descending: every later candidate is worse.
                    // Better to hold the mass and wait for demand or drier
                    // farms tomorrow.
                    break;
                }

                let tons = available.min(cand.load_tons);
                if tons < self.params.min_dispatch_tons {
                    continue;
                }

                // Re-assess at the dispatched load; the candidate may have
                // been scored before earlier dispatches shrank `available`.
                let impact = self.model.assess(&DeliveryContext {
                    config: ctx.config,
                    distance_km: cand.distance_km,
                    load_tons: tons,
                    farm_demand_kg_n: ctx.farm_demand_kg_n(cand.farm),
                });
                plan.book(impact);
                plan.shipments.push(Shipment {
                    stp,
                    farm: cand.farm,
                    tons,
                    trucks: truck_count(tons, ctx.config.logistics.truck_capacity_tons),
                    distance_km: cand.distance_km,
                });

                served[cand.farm.index()] = true;
                available -= tons;
            }
        }

        plan
    }

    /// Plants in descending occupancy order, the overflow-critical first.
    /// Ties go to the lower plant ID.
    fn triage(&self, store: &FacilityStore) -> Vec<StpId> {
        let mut order: Vec<StpId> = (0..store.stp_count()).map(|i| StpId(i as u16)).collect();
        order.sort_by(|a, b| {
            store
                .fill_ratio(*b)
                .total_cmp(&store.fill_ratio(*a))
                .then(a.cmp(b))
        });
        order
    }

    /// Score every eligible farm for `stp`.  Pure reads only — with the
    /// `parallel` feature this is the pass that fans out to Rayon.
    fn score_candidates(
        &self,
        ctx: &PlanningContext<'_>,
        store: &FacilityStore,
        stp: StpId,
        available: f64,
        served: &[bool],
    ) -> Vec<Candidate> {
        let eligible: Vec<FarmId> = (0..store.farm_count())
            .map(|i| FarmId(i as u32))
            .filter(|&farm| {
                !served[farm.index()]
                    && !store.is_locked(farm)
                    && store.residual_intake_tons(farm) > 0.0
            })
            .collect();

        let score_one = |farm: FarmId| {
            let load_tons = available.min(store.residual_intake_tons(farm));
            let distance_km = ctx.registry.distance_km(stp, farm);
            let score = self.model.score(&DeliveryContext {
                config: ctx.config,
                distance_km,
                load_tons,
                farm_demand_kg_n: ctx.farm_demand_kg_n(farm),
            });
            Candidate { farm, score, load_tons, distance_km }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            eligible.into_par_iter().map(score_one).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            eligible.into_iter().map(score_one).collect()
        }
    }
}
