use csv::StringRecord;
use std::collections::HashMap;

/// One row of the airport directory
#[derive(Clone, Debug, PartialEq)]
pub struct AirportRecord {
    /// ISO 3166 alpha-3 country code
    pub country_code: String,
    pub iata_code: String,
    pub name: String,
    /// NaN when the directory held something unparseable
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportRecord {
    /// Whether the coordinates can be placed on the map
    pub fn is_plottable(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Display name of the airport's country
    pub fn country(&self) -> &str {
        country_name(&self.country_code)
    }
}

/// Immutable airport table indexed by IATA code
#[derive(Clone, Debug, Default)]
pub struct AirportDirectory {
    records: Vec<AirportRecord>,
    by_code: HashMap<String, usize>,
}

impl AirportDirectory {
    pub fn new(records: Vec<AirportRecord>) -> Self {
        let mut by_code = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            // First row wins for duplicate codes
            by_code.entry(record.iata_code.clone()).or_insert(idx);
        }
        Self { records, by_code }
    }

    pub fn get(&self, iata_code: &str) -> Option<&AirportRecord> {
        self.by_code.get(iata_code).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse the semicolon-delimited directory: `country;iata;name;lat;lon`.
///
/// The first line is a header. Missing columns read as empty, bad coordinates
/// as NaN, and rows without an IATA code are dropped. Quote characters are
/// plain text.
pub fn parse_airport_directory(text: &str) -> AirportDirectory {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.trim().as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(row) => records.extend(parse_airport_row(&row)),
            Err(e) => tracing::warn!("skipping airport directory row: {e}"),
        }
    }
    AirportDirectory::new(records)
}

fn parse_airport_row(row: &StringRecord) -> Option<AirportRecord> {
    let field = |idx: usize| row.get(idx).unwrap_or("").trim();

    let iata_code = field(1);
    if iata_code.is_empty() {
        return None;
    }

    Some(AirportRecord {
        country_code: field(0).to_string(),
        iata_code: iata_code.to_string(),
        name: field(2).to_string(),
        latitude: parse_coord(field(3)),
        longitude: parse_coord(field(4)),
    })
}

#[inline]
fn parse_coord(field: &str) -> f64 {
    field.trim().parse().unwrap_or(f64::NAN)
}

/// Resolve an ISO 3166 alpha-3 code to a country name, or echo the code back
pub fn country_name(code: &str) -> &str {
    match code {
        "AFG" => "Afghanistan",
        "ALB" => "Albania",
        "DZA" => "Algeria",
        "AND" => "Andorra",
        "ARE" => "United Arab Emirates",
        "ARG" => "Argentina",
        "AUS" => "Australia",
        "AUT" => "Austria",
        "BEL" => "Belgium",
        "BRA" => "Brazil",
        "CAN" => "Canada",
        "CHE" => "Switzerland",
        "CHL" => "Chile",
        "CHN" => "China",
        "COL" => "Colombia",
        "CZE" => "Czechia",
        "DEU" => "Germany",
        "DNK" => "Denmark",
        "EGY" => "Egypt",
        "ESP" => "Spain",
        "FIN" => "Finland",
        "FRA" => "France",
        "GBR" => "United Kingdom",
        "GRC" => "Greece",
        "HKG" => "Hong Kong",
        "HUN" => "Hungary",
        "IDN" => "Indonesia",
        "IND" => "India",
        "IRL" => "Ireland",
        "ISL" => "Iceland",
        "ISR" => "Israel",
        "ITA" => "Italy",
        "JPN" => "Japan",
        "KEN" => "Kenya",
        "KOR" => "South Korea",
        "MAR" => "Morocco",
        "MEX" => "Mexico",
        "MYS" => "Malaysia",
        "NLD" => "Netherlands",
        "NOR" => "Norway",
        "NZL" => "New Zealand",
        "PER" => "Peru",
        "PHL" => "Philippines",
        "POL" => "Poland",
        "PRT" => "Portugal",
        "QAT" => "Qatar",
        "ROU" => "Romania",
        "RUS" => "Russia",
        "SAU" => "Saudi Arabia",
        "SGP" => "Singapore",
        "SWE" => "Sweden",
        "THA" => "Thailand",
        "TUR" => "Türkiye",
        "TWN" => "Taiwan",
        "UKR" => "Ukraine",
        "USA" => "United States",
        "VNM" => "Vietnam",
        "ZAF" => "South Africa",
        "ZWE" => "Zimbabwe",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = "\
country;iata;name;lat;lon
USA;JFK;John F Kennedy Intl;40.6398;-73.7789
GBR;LHR;Heathrow;51.4706;-0.461941
FRA;CDG;Charles de Gaulle;not-a-number;2.55
";

    #[test]
    fn test_parse_skips_header() {
        let dir = parse_airport_directory(DIRECTORY);
        assert_eq!(dir.len(), 3);
        assert!(dir.get("iata").is_none());

        let jfk = dir.get("JFK").unwrap();
        assert_eq!(jfk.name, "John F Kennedy Intl");
        assert_eq!(jfk.country(), "United States");
        assert!((jfk.latitude - 40.6398).abs() < 1e-9);
        assert!(jfk.is_plottable());
    }

    #[test]
    fn test_bad_coordinate_is_nan_not_fatal() {
        let dir = parse_airport_directory(DIRECTORY);
        let cdg = dir.get("CDG").unwrap();
        assert!(cdg.latitude.is_nan());
        assert!((cdg.longitude - 2.55).abs() < 1e-9);
        assert!(!cdg.is_plottable());
        // Neighbouring rows unaffected
        assert!(dir.get("LHR").unwrap().is_plottable());
    }

    #[test]
    fn test_crlf_and_short_rows() {
        let dir = parse_airport_directory("h\r\nDEU;FRA;Frankfurt;50.03;8.57\r\nESP;MAD\r\n;;\r\n");
        assert_eq!(dir.len(), 2);
        assert!((dir.get("FRA").unwrap().longitude - 8.57).abs() < 1e-9);

        let mad = dir.get("MAD").unwrap();
        assert_eq!(mad.name, "");
        assert!(!mad.is_plottable());
    }

    #[test]
    fn test_duplicate_code_resolves_to_first() {
        let dir = parse_airport_directory("h\nUSA;PDX;First;45.5;-122.6\nUSA;PDX;Second;0;0\n");
        assert_eq!(dir.get("PDX").unwrap().name, "First");
    }

    #[test]
    fn test_out_of_range_not_plottable() {
        let dir = parse_airport_directory("h\nXXX;BAD;Nowhere;95.0;10.0\n");
        assert!(!dir.get("BAD").unwrap().is_plottable());
    }

    #[test]
    fn test_country_name_fallback() {
        assert_eq!(country_name("JPN"), "Japan");
        assert_eq!(country_name("ATA"), "ATA");
    }

    #[test]
    fn test_quotes_are_plain_text() {
        let dir = parse_airport_directory("h\nUSA;ORD;Chicago \"O'Hare\";41.97;-87.90\n");
        assert_eq!(dir.get("ORD").unwrap().name, "Chicago \"O'Hare\"");
    }

    #[test]
    fn test_padded_and_suffixed_coordinates() {
        let dir = parse_airport_directory("h\nUSA;JFK;Kennedy;40.6 ;40.69N\nUSA;LGA;LaGuardia;40.77;-73.87\n");
        let jfk = dir.get("JFK").unwrap();
        assert!((jfk.latitude - 40.6).abs() < 1e-9);
        assert!(jfk.longitude.is_nan());
        assert!(dir.get("LGA").unwrap().is_plottable());
    }

    #[test]
    fn test_empty_directory() {
        assert!(parse_airport_directory("").is_empty());
        assert!(parse_airport_directory("header only").is_empty());
    }
}
