pub mod costs;
pub mod evaluator;

pub use costs::{CostModel, FeeModel, ProfitBreakdown, ShippingTable};
pub use evaluator::DealEvaluator;
