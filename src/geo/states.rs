//! Static FIPS and postal-code tables for the 50 states plus DC.

/// Every FIPS code in the table, in ascending order.
pub const FIPS_CODES: [u32; 51] = [
    1, 2, 4, 5, 6, 8, 9, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28,
    29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 44, 45, 46, 47, 48, 49, 50, 51, 53,
    54, 55, 56,
];

pub const FIPS_ALASKA: u32 = 2;
pub const FIPS_HAWAII: u32 = 15;

pub fn code_for_fips(fips: u32) -> Option<&'static str> {
    let code = match fips {
        1 => "AL",
        2 => "AK",
        4 => "AZ",
        5 => "AR",
        6 => "CA",
        8 => "CO",
        9 => "CT",
        10 => "DE",
        11 => "DC",
        12 => "FL",
        13 => "GA",
        15 => "HI",
        16 => "ID",
        17 => "IL",
        18 => "IN",
        19 => "IA",
        20 => "KS",
        21 => "KY",
        22 => "LA",
        23 => "ME",
        24 => "MD",
        25 => "MA",
        26 => "MI",
        27 => "MN",
        28 => "MS",
        29 => "MO",
        30 => "MT",
        31 => "NE",
        32 => "NV",
        33 => "NH",
        34 => "NJ",
        35 => "NM",
        36 => "NY",
        37 => "NC",
        38 => "ND",
        39 => "OH",
        40 => "OK",
        41 => "OR",
        42 => "PA",
        44 => "RI",
        45 => "SC",
        46 => "SD",
        47 => "TN",
        48 => "TX",
        49 => "UT",
        50 => "VT",
        51 => "VA",
        53 => "WA",
        54 => "WV",
        55 => "WI",
        56 => "WY",
        _ => return None,
    };
    Some(code)
}

pub fn name_for_code(code: &str) -> Option<&'static str> {
    let name = match code {
        "AL" => "Alabama",
        "AK" => "Alaska",
        "AZ" => "Arizona",
        "AR" => "Arkansas",
        "CA" => "California",
        "CO" => "Colorado",
        "CT" => "Connecticut",
        "DE" => "Delaware",
        "DC" => "District of Columbia",
        "FL" => "Florida",
        "GA" => "Georgia",
        "HI" => "Hawaii",
        "ID" => "Idaho",
        "IL" => "Illinois",
        "IN" => "Indiana",
        "IA" => "Iowa",
        "KS" => "Kansas",
        "KY" => "Kentucky",
        "LA" => "Louisiana",
        "ME" => "Maine",
        "MD" => "Maryland",
        "MA" => "Massachusetts",
        "MI" => "Michigan",
        "MN" => "Minnesota",
        "MS" => "Mississippi",
        "MO" => "Missouri",
        "MT" => "Montana",
        "NE" => "Nebraska",
        "NV" => "Nevada",
        "NH" => "New Hampshire",
        "NJ" => "New Jersey",
        "NM" => "New Mexico",
        "NY" => "New York",
        "NC" => "North Carolina",
        "ND" => "North Dakota",
        "OH" => "Ohio",
        "OK" => "Oklahoma",
        "OR" => "Oregon",
        "PA" => "Pennsylvania",
        "RI" => "Rhode Island",
        "SC" => "South Carolina",
        "SD" => "South Dakota",
        "TN" => "Tennessee",
        "TX" => "Texas",
        "UT" => "Utah",
        "VT" => "Vermont",
        "VA" => "Virginia",
        "WA" => "Washington",
        "WV" => "West Virginia",
        "WI" => "Wisconsin",
        "WY" => "Wyoming",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_fips_maps_to_a_named_unique_code() {
        let mut seen = HashSet::new();
        for fips in FIPS_CODES {
            let code = code_for_fips(fips).unwrap();
            assert!(name_for_code(code).is_some(), "{} has no name", code);
            assert!(seen.insert(code), "{} repeated", code);
        }
        assert_eq!(seen.len(), 51);
    }

    #[test]
    fn territories_are_unmapped() {
        assert_eq!(code_for_fips(72), None);
        assert_eq!(code_for_fips(3), None);
        assert_eq!(name_for_code("PR"), None);
    }
}
