//! Required reservation columns and tolerant header matching
//!
//! Every required column has a canonical name and a set of accepted aliases.
//! Headers are compared after normalization (trimmed, lowercased, underscores
//! treated as spaces, internal whitespace collapsed), so `" arrival  "`,
//! `"ARRIVAL"` and `"Check-in"` all resolve to [`Column::Arrival`].

use std::collections::BTreeSet;

/// A required reservation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ReservationNumber,
    Apartment,
    GuestName,
    Channel,
    Arrival,
    Departure,
    BookingDate,
    Nights,
    BaseRevenue,
    TotalRevenue,
}

impl Column {
    /// All required columns, in input sheet order
    pub const ALL: [Column; 10] = [
        Column::ReservationNumber,
        Column::Apartment,
        Column::GuestName,
        Column::Channel,
        Column::Arrival,
        Column::Departure,
        Column::BookingDate,
        Column::Nights,
        Column::BaseRevenue,
        Column::TotalRevenue,
    ];

    /// Columns holding calendar dates
    pub const DATES: [Column; 3] = [Column::Arrival, Column::Departure, Column::BookingDate];

    /// Header written to output sheets
    pub fn canonical_name(self) -> &'static str {
        match self {
            Column::ReservationNumber => "Reservation Number",
            Column::Apartment => "Apartment",
            Column::GuestName => "Guest Name",
            Column::Channel => "Channel",
            Column::Arrival => "Arrival",
            Column::Departure => "Departure",
            Column::BookingDate => "Booking Date",
            Column::Nights => "Nights",
            Column::BaseRevenue => "Base Revenue",
            Column::TotalRevenue => "Total Revenue",
        }
    }

    /// Accepted headers, already normalized
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::ReservationNumber => &[
                "reservation number",
                "reservation no",
                "reservation no.",
                "reservation #",
                "reservation id",
                "booking number",
                "booking reference",
            ],
            Column::Apartment => &["apartment", "unit", "property", "listing"],
            Column::GuestName => &["guest name", "guest", "guest full name"],
            Column::Channel => &["channel", "sub channel", "booking channel", "source"],
            Column::Arrival => &["arrival", "arrival date", "check in", "check-in", "checkin"],
            Column::Departure => &[
                "departure",
                "departure date",
                "check out",
                "check-out",
                "checkout",
            ],
            Column::BookingDate => &["booking date", "booked on", "created", "reservation date"],
            Column::Nights => &["nights", "no of nights", "number of nights", "los"],
            Column::BaseRevenue => &["base revenue", "base amount", "accommodation revenue"],
            Column::TotalRevenue => &["total revenue", "total amount", "gross revenue"],
        }
    }

    /// Resolve a raw header to a required column
    pub fn from_header(raw: &str) -> Option<Column> {
        let normalized = normalize_header(raw);
        Column::ALL
            .into_iter()
            .find(|c| c.aliases().contains(&normalized.as_str()))
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Normalize a header for comparison
pub fn normalize_header(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Required columns missing from the input header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub missing: Vec<Column>,
    /// Headers that were present, as read
    pub found: Vec<String>,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(|c| c.canonical_name()).collect();
        write!(
            f,
            "missing required column{}: {}",
            if missing.len() == 1 { "" } else { "s" },
            missing.join(", ")
        )?;
        if self.found.is_empty() {
            write!(f, " (the sheet has no header row)")
        } else {
            write!(f, " (found: {})", self.found.join(", "))
        }
    }
}

impl std::error::Error for SchemaError {}

/// Position of every required column in a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; 10],
}

impl ColumnMap {
    /// Match headers against the required columns
    ///
    /// Headers equal to a canonical name claim their column first; aliases
    /// only fill columns still missing. Within each pass the first matching
    /// header wins and the rest are kept as ordinary extra columns.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let normalized: Vec<String> =
            headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let mut found: [Option<usize>; 10] = [None; 10];

        for column in Column::ALL {
            let canonical = normalize_header(column.canonical_name());
            found[column as usize] = normalized.iter().position(|h| *h == canonical);
        }

        for (idx, header) in headers.iter().enumerate() {
            if found.contains(&Some(idx)) {
                continue;
            }
            let Some(column) = Column::from_header(header.as_ref()) else {
                continue;
            };
            let slot = &mut found[column as usize];
            if slot.is_none() {
                *slot = Some(idx);
            } else {
                log::debug!(
                    "Header '{}' duplicates column '{}', keeping it as an extra column",
                    header.as_ref(),
                    column
                );
            }
        }

        let missing: BTreeSet<Column> = Column::ALL
            .into_iter()
            .filter(|c| found[*c as usize].is_none())
            .collect();

        if !missing.is_empty() {
            return Err(SchemaError {
                missing: missing.into_iter().collect(),
                found: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
            });
        }

        let mut indices = [0usize; 10];
        for column in Column::ALL {
            if let Some(idx) = found[column as usize] {
                indices[column as usize] = idx;
            }
        }
        Ok(Self { indices })
    }

    /// Index of a required column in the input header
    pub fn index(&self, column: Column) -> usize {
        self.indices[column as usize]
    }

    /// Required column at a header position, if any
    pub fn column_at(&self, idx: usize) -> Option<Column> {
        Column::ALL.into_iter().find(|c| self.index(*c) == idx)
    }

    /// Output headers: canonical names for required columns, trimmed names otherwise
    pub fn canonical_headers<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        headers
            .iter()
            .enumerate()
            .map(|(idx, h)| match self.column_at(idx) {
                Some(column) => column.canonical_name().to_string(),
                None => h.as_ref().trim().to_string(),
            })
            .collect()
    }
}
