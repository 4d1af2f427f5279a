use std::fmt::Write;

use crate::models::report::ReportDocument;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;color:#1f2937;margin:32px}\
h1{font-size:22px;margin-bottom:4px}h2{font-size:16px;margin-top:28px}\
.muted{color:#6b7280;font-size:12px}table{width:100%;border-collapse:collapse;margin-top:8px}\
th,td{padding:6px 8px;border-bottom:1px solid #e5e7eb;text-align:left;font-size:13px}\
td.num,th.num{text-align:right}.negative{color:#b91c1c}";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1234.5` → `"1,234.50 USD"`. Negative amounts keep their sign.
pub fn format_money(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02} {currency}", cents % 100)
}

/// Build the self-contained HTML page handed to a [`super::traits::ReportRenderer`].
pub fn render_report_html(doc: &ReportDocument, currency: &str) -> String {
    let t = &doc.totals;
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Financial Report</title>\
         <style>{STYLE}</style></head><body>\
         <h1>Financial Report</h1>\
         <p class=\"muted\">{} &ndash; {} &middot; generated {}</p>",
        doc.date_range.start_date(),
        doc.date_range.end_date(),
        doc.generated_at.format("%Y-%m-%d %H:%M"),
    );

    let remaining_class = if t.remaining_budget < 0.0 { " negative" } else { "" };
    let _ = write!(
        html,
        "<h2>Summary</h2><table>\
         <tr><th>Total expenses</th><td class=\"num\">{}</td></tr>\
         <tr><th>Total budget</th><td class=\"num\">{}</td></tr>\
         <tr><th>Remaining budget</th><td class=\"num{remaining_class}\">{}</td></tr>\
         <tr><th>Spent</th><td class=\"num\">{:.1}%</td></tr>\
         <tr><th>Remaining</th><td class=\"num\">{:.1}%</td></tr>\
         </table>",
        format_money(t.total_expenses, currency),
        format_money(t.total_budget, currency),
        format_money(t.remaining_budget, currency),
        t.spent_percentage,
        t.remaining_percentage,
    );

    html.push_str("<h2>Top categories</h2>");
    if doc.top_categories.is_empty() {
        html.push_str("<p class=\"muted\">No expenses in this period.</p>");
    } else {
        html.push_str("<table><tr><th>Category</th><th class=\"num\">Spent</th></tr>");
        for category in &doc.top_categories {
            let _ = write!(
                html,
                "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
                escape_html(category.name.as_str()),
                format_money(category.value, currency),
            );
        }
        html.push_str("</table>");
    }

    html.push_str("<h2>Recent transactions</h2>");
    if doc.recent_transactions.is_empty() {
        html.push_str("<p class=\"muted\">No transactions in this period.</p>");
    } else {
        html.push_str(
            "<table><tr><th>Date</th><th>Category</th><th>Description</th>\
             <th class=\"num\">Amount</th></tr>",
        );
        for expense in &doc.recent_transactions {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                expense.date.format("%Y-%m-%d"),
                escape_html(expense.category.as_str()),
                escape_html(&expense.description),
                format_money(expense.amount, currency),
            );
        }
        html.push_str("</table>");
    }

    html.push_str("</body></html>");
    html
}
