// ═══════════════════════════════════════════════════════════════════
// Service Tests: PeriodService, ProrationService, AggregationService,
// ExpenseService, BudgetService, GoalService, DashboardService
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::budget::{Budget, BudgetPeriod, BudgetStatus, BudgetUpdate, NewBudget};
use finance_tracker_core::models::date_range::{end_of_day, start_of_day, DateRange};
use finance_tracker_core::models::expense::{Category, Expense, ExpenseUpdate, NewExpense};
use finance_tracker_core::models::goal::{Contribution, GoalStatus, GoalUpdate, NewGoal};
use finance_tracker_core::services::aggregation_service::{AggregationService, TREND_SEGMENTS};
use finance_tracker_core::services::budget_service::BudgetService;
use finance_tracker_core::services::dashboard_service::DashboardService;
use finance_tracker_core::services::expense_service::ExpenseService;
use finance_tracker_core::services::goal_service::GoalService;
use finance_tracker_core::services::period_service::PeriodService;
use finance_tracker_core::services::proration_service::{inclusive_day_count, ProrationService};
use finance_tracker_core::storage::memory::MemoryStore;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

fn june() -> DateRange {
    DateRange::from_dates(d(2024, 6, 1), d(2024, 6, 30)).unwrap()
}

fn expense(category: Category, amount: f64, date: NaiveDateTime) -> Expense {
    Expense::new("u1", NewExpense::new(category, amount, date))
}

fn weekly_budget(total: f64, reference: NaiveDate) -> Budget {
    let window = PeriodService::new().compute_window(BudgetPeriod::Weekly, reference);
    Budget::new("u1", BudgetPeriod::Weekly, total, "", window)
}

fn monthly_budget(total: f64, reference: NaiveDate) -> Budget {
    let window = PeriodService::new().compute_window(BudgetPeriod::Monthly, reference);
    Budget::new("u1", BudgetPeriod::Monthly, total, "", window)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// PeriodService
// ═══════════════════════════════════════════════════════════════════

mod period {
    use super::*;

    #[test]
    fn weekly_window_for_wednesday() {
        let window = PeriodService::new().compute_window(BudgetPeriod::Weekly, d(2024, 6, 12));
        assert_eq!(window.start, start_of_day(d(2024, 6, 10)));
        assert_eq!(window.end, end_of_day(d(2024, 6, 16)));
    }

    #[test]
    fn weekly_window_on_monday_and_sunday() {
        let service = PeriodService::new();
        let monday = service.compute_window(BudgetPeriod::Weekly, d(2024, 6, 10));
        let sunday = service.compute_window(BudgetPeriod::Weekly, d(2024, 6, 16));
        assert_eq!(monday, sunday);
        assert_eq!(monday.start_date(), d(2024, 6, 10));
    }

    #[test]
    fn weekly_window_across_year_boundary() {
        let window = PeriodService::new().compute_window(BudgetPeriod::Weekly, d(2025, 1, 1));
        assert_eq!(window.start_date(), d(2024, 12, 30));
        assert_eq!(window.end_date(), d(2025, 1, 5));
    }

    #[test]
    fn weekly_window_is_clamped_at_calendar_ends() {
        let service = PeriodService::new();
        let first = service.compute_window(BudgetPeriod::Weekly, NaiveDate::MIN);
        assert_eq!(first.start_date(), NaiveDate::MIN);
        assert!(first.start <= first.end);

        let last = service.compute_window(BudgetPeriod::Weekly, NaiveDate::MAX);
        assert_eq!(last.end_date(), NaiveDate::MAX);
        assert!(last.start <= last.end);
        assert!(last.contains(start_of_day(NaiveDate::MAX)));
    }

    #[test]
    fn monthly_window_at_calendar_ends() {
        let service = PeriodService::new();
        let first = service.compute_window(BudgetPeriod::Monthly, NaiveDate::MIN);
        assert_eq!(first.start_date(), NaiveDate::MIN);
        let last = service.compute_window(BudgetPeriod::Monthly, NaiveDate::MAX);
        assert_eq!(last.end_date(), NaiveDate::MAX);
        assert!(last.start <= last.end);
    }

    #[test]
    fn monthly_window_in_leap_february() {
        let window = PeriodService::new().compute_window(BudgetPeriod::Monthly, d(2024, 2, 15));
        assert_eq!(window.start, start_of_day(d(2024, 2, 1)));
        assert_eq!(window.end, end_of_day(d(2024, 2, 29)));
    }

    #[test]
    fn monthly_window_in_common_february_and_december() {
        let service = PeriodService::new();
        assert_eq!(
            service.compute_window(BudgetPeriod::Monthly, d(2023, 2, 28)).end_date(),
            d(2023, 2, 28)
        );
        let december = service.compute_window(BudgetPeriod::Monthly, d(2024, 12, 31));
        assert_eq!(december.start_date(), d(2024, 12, 1));
        assert_eq!(december.end_date(), d(2024, 12, 31));
    }

    #[test]
    fn every_window_contains_its_reference() {
        let service = PeriodService::new();
        let mut day = d(2024, 1, 1);
        while day <= d(2024, 12, 31) {
            for period in [BudgetPeriod::Weekly, BudgetPeriod::Monthly] {
                let window = service.compute_window(period, day);
                assert!(window.contains(start_of_day(day)), "{period} window misses {day}");
                assert!(window.start <= window.end);
            }
            day = day.succ_opt().unwrap();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// ProrationService
// ═══════════════════════════════════════════════════════════════════

mod proration {
    use super::*;

    #[test]
    fn inclusive_day_count_rounds_up_and_adds_one() {
        let at = dt(2024, 6, 10, 0, 0);
        assert_eq!(inclusive_day_count(at, at), 1);
        assert_eq!(inclusive_day_count(at, dt(2024, 6, 10, 0, 1)), 2);
        // A weekly window ending at 23:59:59.999 counts eight days.
        assert_eq!(inclusive_day_count(at, end_of_day(d(2024, 6, 16))), 8);
    }

    #[test]
    fn fully_contained_budget_is_not_prorated() {
        let service = ProrationService::new();
        let budget = weekly_budget(80.0, d(2024, 6, 12));
        assert!(approx(service.prorated_amount(&budget, &june()), 80.0));

        let monthly = monthly_budget(300.0, d(2024, 6, 1));
        assert!(approx(service.prorated_amount(&monthly, &june()), 300.0));
    }

    #[test]
    fn partial_overlap_uses_day_counts() {
        let service = ProrationService::new();
        let monthly = monthly_budget(310.0, d(2024, 6, 1));
        let first_half = DateRange::from_dates(d(2024, 6, 1), d(2024, 6, 15)).unwrap();
        // 16 of 31 counted days
        assert!(approx(service.prorated_amount(&monthly, &first_half), 160.0));

        let weekly = weekly_budget(80.0, d(2024, 6, 12));
        let one_day = DateRange::from_dates(d(2024, 6, 12), d(2024, 6, 12)).unwrap();
        // 2 of 8 counted days
        assert!(approx(service.prorated_amount(&weekly, &one_day), 20.0));
    }

    #[test]
    fn disjoint_budget_prorates_to_zero() {
        let service = ProrationService::new();
        let july = DateRange::from_dates(d(2024, 7, 1), d(2024, 7, 31)).unwrap();
        assert_eq!(service.prorated_amount(&monthly_budget(300.0, d(2024, 6, 1)), &july), 0.0);
        assert_eq!(service.prorated_amount(&weekly_budget(80.0, d(2024, 5, 1)), &june()), 0.0);
    }

    #[test]
    fn open_bounds_default_to_query_edges() {
        let service = ProrationService::new();
        assert!(approx(service.prorate(100.0, None, None, &june()), 100.0));
        assert!(approx(
            service.prorate(70.0, Some(dt(2024, 6, 10, 0, 0)), None, &june()),
            70.0
        ));
    }

    #[test]
    fn inverted_budget_window_is_zero() {
        let service = ProrationService::new();
        let amount = service.prorate(
            100.0,
            Some(dt(2024, 6, 20, 0, 0)),
            Some(dt(2024, 6, 5, 0, 0)),
            &june(),
        );
        assert_eq!(amount, 0.0);
    }

    #[test]
    fn malformed_totals_never_go_negative() {
        let service = ProrationService::new();
        let mut budget = monthly_budget(0.0, d(2024, 6, 1));
        budget.total_budget = f64::NAN;
        assert_eq!(service.prorated_amount(&budget, &june()), 0.0);
        budget.total_budget = -50.0;
        assert_eq!(service.prorated_amount(&budget, &june()), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService
// ═══════════════════════════════════════════════════════════════════

mod aggregation {
    use super::*;

    #[test]
    fn empty_input_yields_zeros() {
        let summary = AggregationService::new().aggregate(&[], &[], &june());
        assert_eq!(summary.totals.total_expenses, 0.0);
        assert_eq!(summary.totals.total_budget, 0.0);
        assert_eq!(summary.totals.remaining_budget, 0.0);
        assert_eq!(summary.totals.spent_percentage, 0.0);
        assert_eq!(summary.totals.remaining_percentage, 100.0);
        assert!(summary.top_categories.is_empty());
        assert!(summary.recent_transactions.is_empty());
        assert_eq!(summary.expense_trend.len(), TREND_SEGMENTS as usize);
        assert!(summary.expense_trend.iter().all(|p| p.amount == 0.0));
        assert!(summary.budget_comparison.iter().all(|p| p.budget == 0.0));
    }

    #[test]
    fn two_food_expenses_without_budgets() {
        let expenses = vec![
            expense(Category::Food, 100.0, dt(2024, 6, 3, 12, 0)),
            expense(Category::Food, 50.0, dt(2024, 6, 20, 12, 0)),
        ];
        let summary = AggregationService::new().aggregate(&expenses, &[], &june());
        assert_eq!(summary.totals.total_expenses, 150.0);
        assert_eq!(summary.top_categories.len(), 1);
        assert_eq!(summary.top_categories[0].name, Category::Food);
        assert_eq!(summary.top_categories[0].value, 150.0);
        assert_eq!(summary.totals.remaining_budget, -150.0);
        assert_eq!(summary.totals.spent_percentage, 0.0);
    }

    #[test]
    fn totals_and_percentages() {
        let expenses = vec![expense(Category::Housing, 150.0, dt(2024, 6, 3, 12, 0))];
        let budgets = vec![monthly_budget(300.0, d(2024, 6, 1))];
        let totals = AggregationService::new().totals(&expenses, &budgets, &june());
        assert!(approx(totals.total_budget, 300.0));
        assert!(approx(totals.remaining_budget, 150.0));
        assert!(approx(totals.spent_percentage, 50.0));
        assert!(approx(totals.remaining_percentage, 50.0));
    }

    #[test]
    fn overspending_goes_negative() {
        let expenses = vec![expense(Category::Housing, 450.0, dt(2024, 6, 3, 12, 0))];
        let budgets = vec![monthly_budget(300.0, d(2024, 6, 1))];
        let totals = AggregationService::new().totals(&expenses, &budgets, &june());
        assert!(approx(totals.remaining_budget, -150.0));
        assert!(approx(totals.spent_percentage, 150.0));
        assert!(approx(totals.spent_percentage + totals.remaining_percentage, 100.0));
    }

    #[test]
    fn budgets_outside_the_window_are_ignored() {
        let budgets = vec![
            weekly_budget(80.0, d(2024, 6, 12)),
            monthly_budget(300.0, d(2024, 6, 1)),
            monthly_budget(999.0, d(2024, 7, 1)),
        ];
        let service = AggregationService::new();
        assert!(approx(service.total_budget(&budgets, &june()), 380.0));
    }

    #[test]
    fn segments_cover_the_range_contiguously() {
        let range = june();
        let segments = AggregationService::new().segments(&range);
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[0].start, range.start);
        assert_eq!(segments[5].end, range.end);
        assert!(segments[5].is_last);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(!pair[0].is_last);
        }
    }

    #[test]
    fn expense_at_range_end_lands_in_last_bucket() {
        let range = june();
        let expenses = vec![
            expense(Category::Food, 10.0, range.start),
            expense(Category::Food, 40.0, range.end),
        ];
        let summary = AggregationService::new().aggregate(&expenses, &[], &range);
        assert_eq!(summary.expense_trend[0].amount, 10.0);
        assert_eq!(summary.expense_trend[5].amount, 40.0);
        let trend_total: f64 = summary.expense_trend.iter().map(|p| p.amount).sum();
        assert_eq!(trend_total, summary.totals.total_expenses);
    }

    #[test]
    fn trend_sums_to_total() {
        let expenses: Vec<Expense> = (1..=30)
            .map(|day| expense(Category::Food, day as f64, dt(2024, 6, day, 18, 30)))
            .collect();
        let summary = AggregationService::new().aggregate(&expenses, &[], &june());
        let trend_total: f64 = summary.expense_trend.iter().map(|p| p.amount).sum();
        assert!(approx(trend_total, 465.0));
        assert!(approx(summary.totals.total_expenses, 465.0));
        for (trend, comparison) in summary.expense_trend.iter().zip(&summary.budget_comparison) {
            assert_eq!(trend.label, comparison.label);
            assert_eq!(trend.amount, comparison.expenses);
        }
    }

    #[test]
    fn budget_comparison_averages_overlapping_budgets() {
        let budgets = vec![weekly_budget(80.0, d(2024, 6, 12)), monthly_budget(300.0, d(2024, 6, 1))];
        let summary = AggregationService::new().aggregate(&[], &budgets, &june());
        let points = &summary.budget_comparison;
        assert!(approx(points[0].budget, 300.0));
        assert!(approx(points[1].budget, 190.0));
        assert!(approx(points[4].budget, 300.0));
        assert!(approx(points[5].budget, 300.0));
    }

    #[test]
    fn labels_for_a_week() {
        let range = DateRange::new(dt(2024, 6, 10, 0, 0), dt(2024, 6, 16, 0, 0)).unwrap();
        let labels: Vec<String> = AggregationService::new()
            .segments(&range)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["10", "11", "12", "13", "14", "15"]);
    }

    #[test]
    fn labels_for_a_month() {
        let range = DateRange::new(dt(2024, 6, 1, 0, 0), dt(2024, 7, 1, 0, 0)).unwrap();
        let labels: Vec<String> = AggregationService::new()
            .segments(&range)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["Jun 1", "Jun 6", "Jun 11", "Jun 16", "Jun 21", "Jun 26"]);
    }

    #[test]
    fn labels_for_a_year() {
        let range = DateRange::new(dt(2024, 1, 1, 0, 0), dt(2025, 1, 1, 0, 0)).unwrap();
        let labels: Vec<String> = AggregationService::new()
            .segments(&range)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(
            labels,
            vec!["Jan 2024", "Mar 2024", "May 2024", "Jul 2024", "Sep 2024", "Nov 2024"]
        );
    }

    #[test]
    fn top_categories_are_capped_and_sorted() {
        let at = dt(2024, 6, 5, 9, 0);
        let expenses = vec![
            expense(Category::Other, 10.0, at),
            expense(Category::Food, 35.0, at),
            expense(Category::Travel, 50.0, at),
            expense(Category::Food, 25.0, at),
            expense(Category::Housing, 40.0, at),
            expense(Category::Utilities, 30.0, at),
            expense(Category::Shopping, 20.0, at),
        ];
        let service = AggregationService::new();
        let top = service.top_categories(&expenses);
        assert_eq!(top.len(), 5);
        let names: Vec<Category> = top.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                Category::Food,
                Category::Travel,
                Category::Housing,
                Category::Utilities,
                Category::Shopping
            ]
        );
        assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
        let top_sum: f64 = top.iter().map(|c| c.value).sum();
        assert!(top_sum <= service.total_expenses(&expenses));
    }

    #[test]
    fn recent_transactions_are_newest_five() {
        let expenses: Vec<Expense> = (1..=7)
            .map(|day| expense(Category::Food, 1.0, dt(2024, 6, day, 8, 0)))
            .collect();
        let recent = AggregationService::new().recent_transactions(&expenses);
        let days: Vec<u32> = recent.iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(days, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn malformed_amounts_count_as_zero() {
        let mut broken = expense(Category::Food, 1.0, dt(2024, 6, 5, 9, 0));
        broken.amount = f64::NAN;
        let expenses = vec![broken, expense(Category::Food, 12.0, dt(2024, 6, 6, 9, 0))];
        let summary = AggregationService::new().aggregate(&expenses, &[], &june());
        assert_eq!(summary.totals.total_expenses, 12.0);
        assert_eq!(summary.top_categories[0].value, 12.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ExpenseService
// ═══════════════════════════════════════════════════════════════════

mod expense_service {
    use super::*;

    fn service() -> ExpenseService {
        ExpenseService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_then_get() {
        let service = service();
        let created = service
            .create(
                "u1",
                NewExpense::new(Category::Food, 12.5, dt(2024, 6, 3, 12, 0)).with_description("Lunch"),
            )
            .await
            .unwrap();
        let fetched = service.get("u1", created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.description, "Lunch");
    }

    #[tokio::test]
    async fn invalid_amount_is_rejected_before_storage() {
        let service = service();
        let err = service
            .create("u1", NewExpense::new(Category::Food, 0.0, dt(2024, 6, 3, 12, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(service.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_users_records_are_not_found() {
        let service = service();
        let created = service
            .create("u1", NewExpense::new(Category::Food, 5.0, dt(2024, 6, 3, 12, 0)))
            .await
            .unwrap();
        let err = service.get("u2", created.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Expense", .. }));
        assert!(service.delete("u2", created.id).await.is_err());
        assert!(service.list("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let service = service();
        for day in [5, 1, 20, 10] {
            service
                .create("u1", NewExpense::new(Category::Food, 1.0, dt(2024, 6, day, 12, 0)))
                .await
                .unwrap();
        }
        let dates: Vec<NaiveDateTime> = service.list("u1").await.unwrap().iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                dt(2024, 6, 20, 12, 0),
                dt(2024, 6, 10, 12, 0),
                dt(2024, 6, 5, 12, 0),
                dt(2024, 6, 1, 12, 0)
            ]
        );
    }

    #[tokio::test]
    async fn list_in_range_is_inclusive() {
        let service = service();
        for date in [
            dt(2024, 5, 31, 23, 59),
            dt(2024, 6, 1, 0, 0),
            dt(2024, 6, 30, 23, 59),
            dt(2024, 7, 1, 0, 0),
        ] {
            service
                .create("u1", NewExpense::new(Category::Food, 1.0, date))
                .await
                .unwrap();
        }
        let found = service.list_in_range("u1", &june()).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn update_changes_fields_and_keeps_order() {
        let service = service();
        let first = service
            .create("u1", NewExpense::new(Category::Food, 1.0, dt(2024, 6, 1, 12, 0)))
            .await
            .unwrap();
        service
            .create("u1", NewExpense::new(Category::Food, 2.0, dt(2024, 6, 10, 12, 0)))
            .await
            .unwrap();

        let updated = service
            .update(
                "u1",
                first.id,
                ExpenseUpdate {
                    amount: Some(9.0),
                    date: Some(dt(2024, 6, 20, 12, 0)),
                    category: Some(Category::Travel),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, 9.0);
        assert_eq!(updated.category, Category::Travel);
        assert_eq!(service.list("u1").await.unwrap()[0].id, first.id);
    }

    #[tokio::test]
    async fn update_rejects_non_positive_amount() {
        let service = service();
        let created = service
            .create("u1", NewExpense::new(Category::Food, 3.0, dt(2024, 6, 1, 12, 0)))
            .await
            .unwrap();
        let err = service
            .update(
                "u1",
                created.id,
                ExpenseUpdate {
                    amount: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(service.get("u1", created.id).await.unwrap().amount, 3.0);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let service = service();
        let created = service
            .create("u1", NewExpense::new(Category::Food, 3.0, dt(2024, 6, 1, 12, 0)))
            .await
            .unwrap();
        service.delete("u1", created.id).await.unwrap();
        assert!(matches!(
            service.delete("u1", created.id).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(service.get("u1", created.id).await.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// BudgetService
// ═══════════════════════════════════════════════════════════════════

mod budget_service {
    use super::*;

    fn service() -> BudgetService {
        BudgetService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_derives_window_from_reference() {
        let view = service()
            .create(
                "u1",
                NewBudget::new(BudgetPeriod::Weekly, 80.0).starting(d(2024, 6, 12)),
                dt(2024, 6, 12, 9, 0),
            )
            .await
            .unwrap();
        assert_eq!(view.budget.start_date, start_of_day(d(2024, 6, 10)));
        assert_eq!(view.budget.end_date, end_of_day(d(2024, 6, 16)));
        assert_eq!(view.status, BudgetStatus::Active);
    }

    #[tokio::test]
    async fn create_defaults_reference_to_now() {
        let view = service()
            .create("u1", NewBudget::new(BudgetPeriod::Monthly, 300.0), dt(2024, 2, 15, 9, 0))
            .await
            .unwrap();
        assert_eq!(view.budget.window(), DateRange::from_dates(d(2024, 2, 1), d(2024, 2, 29)).unwrap());
    }

    #[tokio::test]
    async fn past_window_is_expired() {
        let service = service();
        let now = dt(2024, 7, 1, 0, 0);
        let view = service
            .create(
                "u1",
                NewBudget::new(BudgetPeriod::Monthly, 300.0).starting(d(2024, 6, 1)),
                now,
            )
            .await
            .unwrap();
        assert_eq!(view.status, BudgetStatus::Expired);
        let fetched = service.get("u1", view.budget.id, dt(2024, 6, 30, 0, 0)).await.unwrap();
        assert_eq!(fetched.status, BudgetStatus::Active);
    }

    #[tokio::test]
    async fn negative_total_is_rejected() {
        let err = service()
            .create("u1", NewBudget::new(BudgetPeriod::Weekly, -1.0), dt(2024, 6, 1, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn changing_period_recomputes_window() {
        let service = service();
        let now = dt(2024, 6, 12, 9, 0);
        let view = service
            .create("u1", NewBudget::new(BudgetPeriod::Weekly, 80.0), now)
            .await
            .unwrap();
        let updated = service
            .update(
                "u1",
                view.budget.id,
                BudgetUpdate {
                    period: Some(BudgetPeriod::Monthly),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(updated.budget.period, BudgetPeriod::Monthly);
        assert_eq!(updated.budget.window(), june());
    }

    #[tokio::test]
    async fn changing_total_keeps_window() {
        let service = service();
        let now = dt(2024, 6, 12, 9, 0);
        let view = service
            .create("u1", NewBudget::new(BudgetPeriod::Weekly, 80.0), now)
            .await
            .unwrap();
        let updated = service
            .update(
                "u1",
                view.budget.id,
                BudgetUpdate {
                    total_budget: Some(120.0),
                    notes: Some("groceries".into()),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(updated.budget.total_budget, 120.0);
        assert_eq!(updated.budget.notes, "groceries");
        assert_eq!(updated.budget.window(), view.budget.window());
    }

    #[tokio::test]
    async fn list_is_latest_window_first_and_user_scoped() {
        let service = service();
        let now = dt(2024, 6, 12, 9, 0);
        for reference in [d(2024, 5, 1), d(2024, 7, 1), d(2024, 6, 1)] {
            service
                .create("u1", NewBudget::new(BudgetPeriod::Monthly, 1.0).starting(reference), now)
                .await
                .unwrap();
        }
        service
            .create("u2", NewBudget::new(BudgetPeriod::Monthly, 1.0), now)
            .await
            .unwrap();

        let starts: Vec<NaiveDate> = service
            .list("u1", now)
            .await
            .unwrap()
            .iter()
            .map(|v| v.budget.start_date.date())
            .collect();
        assert_eq!(starts, vec![d(2024, 7, 1), d(2024, 6, 1), d(2024, 5, 1)]);
    }

    #[tokio::test]
    async fn delete_and_cross_user_access() {
        let service = service();
        let now = dt(2024, 6, 12, 9, 0);
        let view = service
            .create("u1", NewBudget::new(BudgetPeriod::Weekly, 80.0), now)
            .await
            .unwrap();
        assert!(matches!(
            service.get("u2", view.budget.id, now).await,
            Err(CoreError::NotFound { entity: "Budget", .. })
        ));
        assert!(service.delete("u2", view.budget.id).await.is_err());
        service.delete("u1", view.budget.id).await.unwrap();
        assert!(service.list("u1", now).await.unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// GoalService
// ═══════════════════════════════════════════════════════════════════

mod goal_service {
    use super::*;

    fn service() -> GoalService {
        GoalService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_and_contribute() {
        let service = service();
        let now = dt(2024, 6, 1, 0, 0);
        let view = service
            .create("u1", NewGoal::new("Bike", 400.0, dt(2024, 6, 11, 0, 0)), now)
            .await
            .unwrap();
        assert_eq!(view.days_remaining, 10);
        assert_eq!(view.status, GoalStatus::Active);
        assert_eq!(view.goal.current, 0.0);

        let after = service
            .contribute("u1", view.goal.id, Contribution { amount: 100.0 }, now)
            .await
            .unwrap();
        assert_eq!(after.goal.current, 100.0);
        assert_eq!(after.progress_pct, 25.0);
    }

    #[tokio::test]
    async fn past_deadline_is_rejected() {
        let err = service()
            .create("u1", NewGoal::new("Bike", 400.0, dt(2024, 5, 1, 0, 0)), dt(2024, 6, 1, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_contribution_is_rejected() {
        let service = service();
        let now = dt(2024, 6, 1, 0, 0);
        let view = service
            .create("u1", NewGoal::new("Bike", 400.0, dt(2024, 7, 1, 0, 0)), now)
            .await
            .unwrap();
        let err = service
            .contribute("u1", view.goal.id, Contribution { amount: 0.0 }, now)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_and_expiry() {
        let service = service();
        let now = dt(2024, 6, 1, 0, 0);
        let view = service
            .create("u1", NewGoal::new("Bike", 400.0, dt(2024, 7, 1, 0, 0)), now)
            .await
            .unwrap();
        let updated = service
            .update(
                "u1",
                view.goal.id,
                GoalUpdate {
                    name: Some("Road bike".into()),
                    target: Some(800.0),
                    ..Default::default()
                },
                dt(2024, 7, 2, 0, 0),
            )
            .await
            .unwrap();
        assert_eq!(updated.goal.name, "Road bike");
        assert_eq!(updated.goal.target, 800.0);
        assert_eq!(updated.status, GoalStatus::Expired);
        assert_eq!(updated.days_remaining, -1);
    }

    #[tokio::test]
    async fn list_orders_by_deadline() {
        let service = service();
        let now = dt(2024, 6, 1, 0, 0);
        for (name, month) in [("Later", 12), ("Sooner", 7), ("Middle", 9)] {
            service
                .create("u1", NewGoal::new(name, 1.0, dt(2024, month, 1, 0, 0)), now)
                .await
                .unwrap();
        }
        let names: Vec<String> = service
            .list("u1", now)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.goal.name)
            .collect();
        assert_eq!(names, vec!["Sooner", "Middle", "Later"]);
    }

    #[tokio::test]
    async fn delete_is_user_scoped() {
        let service = service();
        let now = dt(2024, 6, 1, 0, 0);
        let view = service
            .create("u1", NewGoal::new("Bike", 1.0, dt(2024, 7, 1, 0, 0)), now)
            .await
            .unwrap();
        assert!(matches!(
            service.delete("u2", view.goal.id).await,
            Err(CoreError::NotFound { entity: "Goal", .. })
        ));
        service.delete("u1", view.goal.id).await.unwrap();
        assert!(service.get("u1", view.goal.id, now).await.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// DashboardService (over the in-memory store)
// ═══════════════════════════════════════════════════════════════════

mod dashboard_service {
    use super::*;

    async fn seeded() -> DashboardService {
        let store = Arc::new(MemoryStore::new());
        let expenses = ExpenseService::new(store.clone());
        let budgets = BudgetService::new(store.clone());
        let now = dt(2024, 6, 12, 9, 0);

        expenses
            .create("u1", NewExpense::new(Category::Food, 100.0, dt(2024, 6, 3, 12, 0)))
            .await
            .unwrap();
        expenses
            .create("u1", NewExpense::new(Category::Food, 50.0, dt(2024, 6, 20, 12, 0)))
            .await
            .unwrap();
        expenses
            .create("u1", NewExpense::new(Category::Travel, 500.0, dt(2024, 7, 2, 12, 0)))
            .await
            .unwrap();
        expenses
            .create("u2", NewExpense::new(Category::Food, 999.0, dt(2024, 6, 5, 12, 0)))
            .await
            .unwrap();
        budgets
            .create("u1", NewBudget::new(BudgetPeriod::Monthly, 300.0), now)
            .await
            .unwrap();

        DashboardService::new(store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn dashboard_only_sees_the_users_window() {
        let summary = seeded().await.build_dashboard("u1", &june()).await.unwrap();
        assert_eq!(summary.totals.total_expenses, 150.0);
        assert!(approx(summary.totals.total_budget, 300.0));
        assert!(approx(summary.totals.spent_percentage, 50.0));
        assert_eq!(summary.top_categories.len(), 1);
        assert_eq!(summary.recent_transactions.len(), 2);
        assert_eq!(summary.date_range, june());
    }

    #[tokio::test]
    async fn report_document_matches_dashboard_totals() {
        let service = seeded().await;
        let summary = service.build_dashboard("u1", &june()).await.unwrap();
        let doc = service
            .build_report_document("u1", &june(), dt(2024, 7, 1, 8, 0))
            .await
            .unwrap();
        assert_eq!(doc.totals, summary.totals);
        assert_eq!(doc.top_categories, summary.top_categories);
        assert_eq!(doc.recent_transactions, summary.recent_transactions);
        assert_eq!(doc.user_id, "u1");
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_dashboard() {
        let summary = seeded().await.build_dashboard("nobody", &june()).await.unwrap();
        assert_eq!(summary.totals.total_expenses, 0.0);
        assert_eq!(summary.totals.remaining_percentage, 100.0);
    }
}
