use chrono::NaiveDate;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "PG" | "GUARD" => Some(Self::PointGuard),
            "SG" => Some(Self::ShootingGuard),
            "SF" | "FORWARD" => Some(Self::SmallForward),
            "PF" => Some(Self::PowerForward),
            "C" | "CENTER" => Some(Self::Center),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::PointGuard => 1,
            Self::ShootingGuard => 2,
            Self::SmallForward => 3,
            Self::PowerForward => 4,
            Self::Center => 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BioFields {
    pub height: Option<String>,
    pub weight: Option<u32>,
    pub age: Option<u32>,
    pub position: Option<u8>,
}

impl BioFields {
    pub fn is_complete(&self) -> bool {
        self.height.is_some()
            && self.weight.is_some()
            && self.age.is_some()
            && self.position.is_some()
    }

    /// Precedence merge: values already present win, `fallback` only fills the gaps.
    pub fn or_fill_from(self, fallback: BioFields) -> BioFields {
        BioFields {
            height: self.height.or(fallback.height),
            weight: self.weight.or(fallback.weight),
            age: self.age.or(fallback.age),
            position: self.position.or(fallback.position),
        }
    }
}

/// Normalizes `6'9"`, `6-9`, `6 9` or a bare `6` into `"F-I"`.
pub fn parse_height(raw: Option<&str>) -> Option<String> {
    let mut numbers = raw?
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|part| !part.is_empty());
    let feet = numbers.next()?.parse::<u32>().ok()?;
    let inches = match numbers.next() {
        Some(part) => part.parse::<u32>().ok()?,
        None => 0,
    };
    Some(format!("{feet}-{inches}"))
}

pub fn map_position(raw: Option<&str>) -> Option<u8> {
    let upper = raw?.trim().to_ascii_uppercase();
    let first = upper.split(['-', '/']).next()?.trim();
    Position::from_token(first).map(Position::code)
}

pub fn parse_weight(raw: Option<&str>) -> Option<u32> {
    let trimmed = raw?.trim();
    if let Ok(lbs) = trimmed.parse::<u32>() {
        return Some(lbs);
    }
    // Some feeds render integer columns as floats ("250.0").
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) || value.fract() != 0.0 {
        return None;
    }
    Some(value as u32)
}

pub fn parse_birth_date(raw: Option<&str>) -> Option<NaiveDate> {
    let trimmed = raw?.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn age_on(birth_date: Option<&str>, reference: NaiveDate) -> Option<u32> {
    let born = parse_birth_date(birth_date)?;
    let days = reference.signed_duration_since(born).num_days();
    if days < 0 {
        return None;
    }
    let years = (days as f64 / DAYS_PER_YEAR).floor();
    u32::try_from(years as i64).ok()
}
