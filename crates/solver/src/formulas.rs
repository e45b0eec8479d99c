//! The formula catalog referenced by the response templates.

pub const ELASTICITY_DEMAND: &str =
    "Price Elasticity of Demand = (% Change in Quantity Demanded) / (% Change in Price)";

pub const ELASTICITY_SUPPLY: &str =
    "Price Elasticity of Supply = (% Change in Quantity Supplied) / (% Change in Price)";

pub const CONSUMER_SURPLUS: &str = "Consumer Surplus = 0.5 × Base × Height";

pub const PRODUCER_SURPLUS: &str = "Producer Surplus = 0.5 × Base × Height";

pub const GDP_NOMINAL: &str = "Nominal GDP = Price × Quantity for all goods and services";

pub const GDP_REAL: &str = "Real GDP = Nominal GDP / GDP Deflator × 100";

pub const INFLATION_RATE: &str = "Inflation Rate = ((CPI_new - CPI_old) / CPI_old) × 100";

pub const UNEMPLOYMENT_RATE: &str = "Unemployment Rate = (Unemployed / Labor Force) × 100";
