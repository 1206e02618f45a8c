use chrono::NaiveDate;

/// Day-first formats accepted on input, plus the ISO form the store writes.
const INPUT_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y-%m-%d"];

const STORAGE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Lenient date parsing: day-first French formats and ISO are accepted,
/// anything else (including the empty string) is simply absent.
pub fn parse_lenient(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

pub fn to_storage(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(STORAGE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn to_display(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_first() {
        assert_eq!(
            parse_lenient("12/05/2024"),
            NaiveDate::from_ymd_opt(2024, 5, 12)
        );
        assert_eq!(
            parse_lenient("01-09-2025"),
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
    }

    #[test]
    fn parses_iso() {
        assert_eq!(
            parse_lenient("2024-05-12"),
            NaiveDate::from_ymd_opt(2024, 5, 12)
        );
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_lenient("not-a-date"), None);
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("   "), None);
        assert_eq!(parse_lenient("32/13/2024"), None);
    }

    #[test]
    fn storage_and_display_forms() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 12);
        assert_eq!(to_storage(date), "2024-05-12");
        assert_eq!(to_display(date), "12/05/2024");
        assert_eq!(to_storage(None), "");
        assert_eq!(to_display(None), "");
    }

    #[test]
    fn storage_form_round_trips() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 3);
        assert_eq!(parse_lenient(&to_storage(date)), date);
        assert_eq!(parse_lenient(&to_display(date)), date);
    }
}
