pub mod aggregation_service;
pub mod budget_service;
pub mod dashboard_service;
pub mod expense_service;
pub mod export_service;
pub mod goal_service;
pub mod period_service;
pub mod proration_service;
