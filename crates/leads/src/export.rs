use crate::lead::Lead;

const HEADER: &str = "Name,Email,Phone,Business,Service,City,Status,Date\n";

/// Renders leads as CSV, one row per lead, every field quoted.
pub fn to_csv(leads: &[Lead]) -> String {
    let mut csv = String::from(HEADER);
    for lead in leads {
        let timestamp = lead.timestamp.to_rfc3339();
        let fields = [
            lead.name.as_str(),
            lead.email.as_str(),
            lead.phone.as_deref().unwrap_or_default(),
            lead.business.as_deref().unwrap_or_default(),
            lead.service.as_deref().unwrap_or_default(),
            lead.city.as_deref().unwrap_or_default(),
            lead.status.as_str(),
            timestamp.as_str(),
        ];
        let row: Vec<String> = fields.into_iter().map(quote).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
