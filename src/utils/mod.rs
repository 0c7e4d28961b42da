pub mod month_year;

pub use month_year::{MonthYear, MonthYearParseError};
