//! Country dial codes and the local digit count each one requires.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub dial_code: &'static str,
    /// Digits expected after the dial code.
    pub length: usize,
}

pub const COUNTRIES: [Country; 10] = [
    Country {
        name: "India",
        dial_code: "+91",
        length: 10,
    },
    Country {
        name: "United States",
        dial_code: "+1",
        length: 10,
    },
    Country {
        name: "United Kingdom",
        dial_code: "+44",
        length: 10,
    },
    Country {
        name: "Australia",
        dial_code: "+61",
        length: 9,
    },
    Country {
        name: "Canada",
        dial_code: "+1",
        length: 10,
    },
    Country {
        name: "Germany",
        dial_code: "+49",
        length: 11,
    },
    Country {
        name: "France",
        dial_code: "+33",
        length: 9,
    },
    Country {
        name: "Singapore",
        dial_code: "+65",
        length: 8,
    },
    Country {
        name: "UAE",
        dial_code: "+971",
        length: 9,
    },
    Country {
        name: "China",
        dial_code: "+86",
        length: 11,
    },
];

/// First country with this dial code. `+1` resolves to the United States.
pub fn lookup(dial_code: &str) -> Option<&'static Country> {
    let dial_code = dial_code.trim();
    COUNTRIES.iter().find(|c| c.dial_code == dial_code)
}

/// Distinct dial codes in table order, for selection controls.
pub fn dial_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = Vec::with_capacity(COUNTRIES.len());
    for country in &COUNTRIES {
        if !codes.contains(&country.dial_code) {
            codes.push(country.dial_code);
        }
    }
    codes
}
