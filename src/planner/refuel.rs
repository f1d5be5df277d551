use super::PlanningParameters;

/// Fuel bought at a stop and the range available when leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Refill {
    pub gallons: f64,
    pub range_after: f64,
}

pub trait RefuelPolicy {
    fn refill(&self, params: &PlanningParameters, remaining_range: f64) -> Refill;
}

/// Always buys a whole tank, whatever was left in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullTank;

impl RefuelPolicy for FullTank {
    fn refill(&self, params: &PlanningParameters, _remaining_range: f64) -> Refill {
        Refill {
            gallons: params.max_range / params.fuel_efficiency,
            range_after: params.max_range,
        }
    }
}

/// Buys back only what was burned since the last fill.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopUp;

impl RefuelPolicy for TopUp {
    fn refill(&self, params: &PlanningParameters, remaining_range: f64) -> Refill {
        let consumed = params.max_range - remaining_range.max(0.0);

        Refill {
            gallons: consumed / params.fuel_efficiency,
            range_after: params.max_range,
        }
    }
}

#[test]
fn full_tank_ignores_what_is_left() {
    let params = PlanningParameters::new(500.0, 10.0);

    assert_eq!(FullTank.refill(&params, 90.0).gallons, 50.0);
    assert_eq!(FullTank.refill(&params, -20.0).gallons, 50.0);
    assert_eq!(FullTank.refill(&params, 90.0).range_after, 500.0);
}

#[test]
fn top_up_buys_consumed_fuel() {
    let params = PlanningParameters::new(500.0, 10.0);

    assert_eq!(TopUp.refill(&params, 100.0).gallons, 40.0);
    assert_eq!(TopUp.refill(&params, -20.0).gallons, 50.0);
    assert_eq!(TopUp.refill(&params, 100.0).range_after, 500.0);
}
