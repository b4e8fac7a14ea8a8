use serde::Deserialize;

/// Column headers for the client inquiry sheet, in stored order.
pub const CONTACT_HEADERS: &[&str] = &[
    "Timestamp",
    "Name",
    "Email",
    "Phone",
    "Age",
    "Mortgage Amount",
    "Coverage Interest",
    "Referrer",
    "Notes",
];

/// Column headers for the partner application sheet, in stored order.
pub const PARTNER_HEADERS: &[&str] = &[
    "Timestamp",
    "Name",
    "Company",
    "Email",
    "Phone",
    "Role",
    "Notes",
    "Status",
];

/// Roles that get the high-priority marker in the operator notification.
pub const HIGH_PRIORITY_ROLES: &[&str] = &["mortgage-broker", "insurance-broker"];

/// Initial value of the partner sheet's Status column; edited out-of-band.
pub const PARTNER_STATUS_NEW: &str = "New";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub mortgage_amount: Option<String>,
    pub coverage_interest: Option<String>,
    pub referrer: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerSubmission {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

impl ContactSubmission {
    /// Cells in sheet order, excluding the server-assigned timestamp.
    pub fn row_cells(&self) -> Vec<String> {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.age,
            &self.mortgage_amount,
            &self.coverage_interest,
            &self.referrer,
            &self.notes,
        ]
        .into_iter()
        .map(stored)
        .collect()
    }
}

impl PartnerSubmission {
    /// Cells in sheet order, excluding the timestamp. The role is stored as
    /// its human-readable label, and the fixed Status literal goes last.
    pub fn row_cells(&self) -> Vec<String> {
        let role_cell = match self.role.as_deref() {
            Some(r) if !r.is_empty() => role_label(Some(r)),
            _ => String::new(),
        };
        vec![
            stored(&self.name),
            stored(&self.company),
            stored(&self.email),
            stored(&self.phone),
            role_cell,
            stored(&self.notes),
            PARTNER_STATUS_NEW.to_string(),
        ]
    }

    pub fn is_high_priority(&self) -> bool {
        self.role
            .as_deref()
            .map_or(false, |r| HIGH_PRIORITY_ROLES.contains(&r))
    }
}

/// Storage policy: absent fields become empty cells.
fn stored(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Render policy: absent or empty fields show an explicit fallback.
/// Whitespace-only values are kept as-is.
pub fn display_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Human-readable label for a partner's submitted role value.
pub fn role_label(role: Option<&str>) -> String {
    match role {
        Some("mortgage-broker") => "Mortgage Broker".to_string(),
        Some("insurance-broker") => "P&C Insurance Broker".to_string(),
        Some("realtor") => "Real Estate Agent".to_string(),
        Some("financial-planner") => "Financial Planner".to_string(),
        Some("other") => "Other".to_string(),
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => "Not specified".to_string(),
    }
}
