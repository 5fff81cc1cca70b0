use std::fmt;

/// BTCUSD inverse settles funding every eight hours.
pub const FUNDINGS_PER_DAY: f64 = 3.0;

pub const CALENDAR_YEAR_DAYS: f64 = 365.0;
pub const SHORT_YEAR_DAYS: f64 = 364.0;

/// Year length used to annualise the observed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearBasis {
    #[default]
    Calendar,
    /// 52 weeks.
    Short,
}

impl YearBasis {
    pub fn days(self) -> f64 {
        match self {
            YearBasis::Calendar => CALENDAR_YEAR_DAYS,
            YearBasis::Short => SHORT_YEAR_DAYS,
        }
    }
}

/// Summary of a run of funding rates. `total` and `annualised` are
/// fractions; rendering multiplies them by 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub days: f64,
    pub total: f64,
    pub annualised: f64,
}

impl Report {
    pub fn from_rates(rates: &[f64], basis: YearBasis) -> Self {
        let days = rates.len() as f64 / FUNDINGS_PER_DAY;
        let total: f64 = rates.iter().sum();

        // no samples, nothing to extrapolate
        let annualised = if rates.is_empty() {
            0.0
        } else {
            total / (days / basis.days())
        };

        Self {
            days,
            total,
            annualised,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Days:  {:.1}", self.days)?;
        writeln!(f, "Total: {:.2}%", self.total * 100.0)?;
        writeln!(f, "APR:   {:.2}%", self.annualised * 100.0)
    }
}
