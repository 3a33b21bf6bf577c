//! Carbon accounting for a single delivery, and the pluggable scoring trait.

use bl_data::ScenarioConfig;

/// Trucks needed for a load: `ceil(tons / capacity)`.  Zero for an empty
/// load.
#[inline]
pub fn truck_count(tons: f64, truck_capacity_tons: f64) -> u32 {
    if tons <= 0.0 {
        return 0;
    }
    (tons / truck_capacity_tons).ceil() as u32
}

/// Everything a scoring model may consider for one candidate delivery.
pub struct DeliveryContext<'a> {
    pub config: &'a ScenarioConfig,
    /// Route distance, plant to farm, km.
    pub distance_km: f64,
    /// Proposed load, tons.
    pub load_tons: f64,
    /// The farm's total nitrogen demand today (kg N), already scaled by area.
    pub farm_demand_kg_n: f64,
}

/// Carbon effect of one delivery, split into the three signed channels the
/// day record reports.  All magnitudes are non-negative kg CO₂e.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeliveryImpact {
    /// Synthetic-fertilizer offset + soil organic-carbon gain.
    pub credits_kg: f64,
    /// Transport emissions (trucks × km × diesel factor).
    pub emissions_kg: f64,
    /// Leaching penalty for nitrogen beyond the buffered demand.
    pub penalties_kg: f64,
}

impl DeliveryImpact {
    /// Net carbon effect: credits minus emissions minus penalties.
    #[inline]
    pub fn net_kg(&self) -> f64 {
        self.credits_kg - self.emissions_kg - self.penalties_kg
    }
}

/// Pluggable delivery scoring.
///
/// The engine ranks candidate deliveries by [`score`][Self::score] and books
/// the day's carbon delta from [`assess`][Self::assess].  Implementations
/// must be deterministic and monotone: more mass to a higher-yield farm never
/// lowers the credit channel.
///
/// The engine may score candidates in parallel (`parallel` feature), so
/// implementations must be `Send + Sync` and side-effect-free.
pub trait ScoringModel: Send + Sync {
    /// Full carbon breakdown for the candidate delivery.
    fn assess(&self, ctx: &DeliveryContext<'_>) -> DeliveryImpact;

    /// Ranking score.  Defaults to the net carbon effect.
    fn score(&self, ctx: &DeliveryContext<'_>) -> f64 {
        self.assess(ctx).net_kg()
    }
}

/// The default net-carbon-impact model.
///
/// Credits: nitrogen uptake (capped at the farm's demand) times the
/// synthetic-N offset factor, plus soil organic-carbon gain per kg of mass
/// applied.  Debits: diesel emissions per truck-km, and a leaching penalty
/// for nitrogen applied beyond demand plus the application buffer.
pub struct NetCarbonModel;

impl ScoringModel for NetCarbonModel {
    fn assess(&self, ctx: &DeliveryContext<'_>) -> DeliveryImpact {
        let ag = &ctx.config.agronomic;
        let lg = &ctx.config.logistics;

        let n_applied_kg = ctx.load_tons * ag.nitrogen_content_kg_per_ton_biosolid;
        let uptake_kg = n_applied_kg.min(ctx.farm_demand_kg_n);

        let credits_kg = uptake_kg * ag.synthetic_n_offset_credit_kg_co2_per_kg_n
            + ctx.load_tons * 1_000.0 * ag.soil_organic_carbon_gain_kg_co2_per_kg_biosolid;

        let trucks = truck_count(ctx.load_tons, lg.truck_capacity_tons);
        let emissions_kg =
            ctx.distance_km * lg.diesel_emission_factor_kg_co2_per_km * trucks as f64;

        let max_safe_n_kg = ctx.farm_demand_kg_n * (1.0 + ctx.config.buffer_fraction());
        let excess_n_kg = (n_applied_kg - max_safe_n_kg).max(0.0);
        let penalties_kg = excess_n_kg * ag.leaching_penalty_kg_co2_per_kg_excess_n;

        DeliveryImpact { credits_kg, emissions_kg, penalties_kg }
    }
}
