use crate::errors::CoreError;
use crate::models::expense::Expense;

const CSV_HEADER: &str = "id,date,category,amount,description,budgetId";

/// Expense export in CSV (RFC 4180) and JSON.
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// One header line, then one CRLF-terminated row per expense in the
    /// given order.
    pub fn expenses_to_csv(&self, expenses: &[Expense]) -> String {
        let mut out = String::with_capacity(64 * (expenses.len() + 1));
        out.push_str(CSV_HEADER);
        out.push_str("\r\n");
        for expense in expenses {
            let fields = [
                expense.id.to_string(),
                expense.date.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
                expense.category.as_str().to_string(),
                format!("{:.2}", expense.amount),
                expense.description.clone(),
                expense.budget_id.map(|id| id.to_string()).unwrap_or_default(),
            ];
            let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
            out.push_str(&row.join(","));
            out.push_str("\r\n");
        }
        out
    }

    /// Pretty-printed JSON array using the camelCase record layout.
    pub fn expenses_to_json(&self, expenses: &[Expense]) -> Result<String, CoreError> {
        serde_json::to_string_pretty(expenses).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a field when it contains a comma, quote, CR or LF; inner quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
