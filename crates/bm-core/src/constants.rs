/// Unit given to composites constructed without an explicit one.
pub const DEFAULT_UNIT: &str = "parts";

/// Decimal places used when rendering quantities.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Tolerance for comparing quantities that went through rebalancing.
pub const EPSILON: f64 = 1e-9;
