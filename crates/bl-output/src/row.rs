//! Plain data row types written by output backends.

/// One shipment of the solution relation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRow {
    pub day: u16,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    /// External plant identifier, e.g. `STP_TVM`.
    pub stp_id: String,
    /// External farm identifier, e.g. `F0001`.
    pub farm_id: String,
    pub tons: f64,
    pub trucks: u32,
}

/// One day of the daily-score relation.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyScoreRow {
    pub day: u16,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    /// Cumulative carbon credits after this day, kg CO₂e.
    pub credits_cum: f64,
    pub rain_locked_farms: u32,
    /// Storage occupancy ratio per plant, `[0, 1]`, indexed by `StpId`.
    pub occupancy: Vec<f64>,
}
