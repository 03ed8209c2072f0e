use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Normalized absence classification. Raw records carry a free-text type
/// column; normalization happens once, when rows are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AbsenceKind {
    Unjustified,
    Justified,
}

impl AbsenceKind {
    /// Map a raw absence-type string onto the closed enum. The token
    /// table covers the values the admin UI writes (English and the
    /// Spanish forms found in historical rows); the substring check is a
    /// last resort for free-text entries. Anything else defaults to
    /// justified, with a warning so a typo in the type column does not
    /// silently dock pay.
    pub fn from_raw(raw: &str) -> Self {
        let norm = raw.trim().to_lowercase();
        match norm.as_str() {
            "unjustified" | "unexcused" | "injustificada" | "injustificado"
            | "no justificada" | "no justificado" => AbsenceKind::Unjustified,
            "justified" | "justificada" | "justificado" | "sick" | "medical"
            | "vacation" | "personal" | "maternity" => AbsenceKind::Justified,
            _ => {
                if norm.contains("injust") || norm.contains("unjust") {
                    AbsenceKind::Unjustified
                } else {
                    warn!(absence_type = %raw, "Unrecognized absence type, treating as justified");
                    AbsenceKind::Justified
                }
            }
        }
    }
}

/// An absence record covering an inclusive date range. Records for one
/// employee may overlap; coverage is tested per day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Absence {
    #[schema(example = 12)]
    pub employee_id: u64,
    pub kind: AbsenceKind,
    #[schema(example = "2026-01-06", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "medical leave", nullable = true)]
    pub reason: Option<String>,
}

impl Absence {
    /// Boundary-inclusive on both ends.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}
