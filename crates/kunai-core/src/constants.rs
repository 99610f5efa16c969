/// Expansion horizon for rules with neither COUNT nor UNTIL, in years past
/// the anchor. Callers that need more supply an explicit window end.
pub const DEFAULT_HORIZON_YEARS: u16 = 50;

/// Hard ceiling on period iterations within a single expansion call.
///
/// A rule whose BY rule parts never match (`FREQ=MONTHLY;BYMONTHDAY=31`
/// stepping over short months) must still terminate.
pub const MAX_PERIOD_STEPS: u32 = 100_000;
