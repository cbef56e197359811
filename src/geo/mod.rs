
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::error;

/// A state or union territory known to the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateInfo {
    pub name: &'static str,
    /// Boundary GeoJSON served alongside the frontend
    pub boundary_path: &'static str,
    pub longitude: f64,
    pub latitude: f64,
    /// Compact label for tooltips
    pub short_name: Option<&'static str>,
}

impl StateInfo {
    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.short_name.unwrap_or(self.name)
    }

    /// `[longitude, latitude]`, the order map projections expect
    #[inline]
    pub fn centroid(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

pub static STATES: &[StateInfo] = &[
    StateInfo {
        name: "Uttar Pradesh",
        boundary_path: "/geojson/states/uttar-pradesh.geojson",
        longitude: 80.9462,
        latitude: 26.8467,
        short_name: Some("U.P."),
    },
    StateInfo {
        name: "Maharashtra",
        boundary_path: "/geojson/states/maharashtra.geojson",
        longitude: 75.7139,
        latitude: 19.7515,
        short_name: None,
    },
    StateInfo {
        name: "Karnataka",
        boundary_path: "/geojson/states/karnataka.geojson",
        longitude: 76.6394,
        latitude: 15.3173,
        short_name: None,
    },
    StateInfo {
        name: "Tamil Nadu",
        boundary_path: "/geojson/states/tamil-nadu.geojson",
        longitude: 78.6569,
        latitude: 11.1271,
        short_name: None,
    },
    StateInfo {
        name: "West Bengal",
        boundary_path: "/geojson/states/west-bengal.geojson",
        longitude: 87.855,
        latitude: 22.9868,
        short_name: None,
    },
    StateInfo {
        name: "Gujarat",
        boundary_path: "/geojson/states/gujarat.geojson",
        longitude: 71.1924,
        latitude: 22.2587,
        short_name: None,
    },
    StateInfo {
        name: "Rajasthan",
        boundary_path: "/geojson/states/rajasthan.geojson",
        longitude: 73.5714,
        latitude: 27.0238,
        short_name: None,
    },
    StateInfo {
        name: "Bihar",
        boundary_path: "/geojson/states/bihar.geojson",
        longitude: 85.3131,
        latitude: 25.0961,
        short_name: None,
    },
    StateInfo {
        name: "Andhra Pradesh",
        boundary_path: "/geojson/states/andhra-pradesh.geojson",
        longitude: 79.0193,
        latitude: 15.9129,
        short_name: Some("Andhra"),
    },
    StateInfo {
        name: "Odisha",
        boundary_path: "/geojson/states/odisha.geojson",
        longitude: 85.0985,
        latitude: 20.9517,
        short_name: None,
    },
    StateInfo {
        name: "Telangana",
        boundary_path: "/geojson/states/telangana.geojson",
        longitude: 78.4744,
        latitude: 17.385,
        short_name: None,
    },
    StateInfo {
        name: "Punjab",
        boundary_path: "/geojson/states/punjab.geojson",
        longitude: 75.3412,
        latitude: 30.901,
        short_name: None,
    },
    StateInfo {
        name: "Haryana",
        boundary_path: "/geojson/states/haryana.geojson",
        longitude: 76.7794,
        latitude: 29.0588,
        short_name: None,
    },
    StateInfo {
        name: "Chhattisgarh",
        boundary_path: "/geojson/states/chhattisgarh.geojson",
        longitude: 81.8661,
        latitude: 21.2787,
        short_name: None,
    },
    StateInfo {
        name: "Jharkhand",
        boundary_path: "/geojson/states/jharkhand.geojson",
        longitude: 85.2799,
        latitude: 23.6102,
        short_name: None,
    },
    StateInfo {
        name: "Assam",
        boundary_path: "/geojson/states/assam.geojson",
        longitude: 91.3662,
        latitude: 26.2006,
        short_name: None,
    },
    StateInfo {
        name: "Kerala",
        boundary_path: "/geojson/states/kerala.geojson",
        longitude: 76.2711,
        latitude: 10.8505,
        short_name: None,
    },
    StateInfo {
        name: "Uttarakhand",
        boundary_path: "/geojson/states/uttarakhand.geojson",
        longitude: 79.0193,
        latitude: 30.0668,
        short_name: None,
    },
    StateInfo {
        name: "Himachal Pradesh",
        boundary_path: "/geojson/states/himachal-pradesh.geojson",
        longitude: 77.165,
        latitude: 31.1048,
        short_name: Some("Himachal"),
    },
    StateInfo {
        name: "Tripura",
        boundary_path: "/geojson/states/tripura.geojson",
        longitude: 91.9882,
        latitude: 23.9408,
        short_name: None,
    },
    StateInfo {
        name: "Meghalaya",
        boundary_path: "/geojson/states/meghalaya.geojson",
        longitude: 91.3662,
        latitude: 25.467,
        short_name: None,
    },
    StateInfo {
        name: "Manipur",
        boundary_path: "/geojson/states/manipur.geojson",
        longitude: 93.9063,
        latitude: 24.6637,
        short_name: None,
    },
    StateInfo {
        name: "Nagaland",
        boundary_path: "/geojson/states/nagaland.geojson",
        longitude: 94.5624,
        latitude: 26.1584,
        short_name: None,
    },
    StateInfo {
        name: "Goa",
        boundary_path: "/geojson/states/goa.geojson",
        longitude: 74.124,
        latitude: 15.2993,
        short_name: None,
    },
    StateInfo {
        name: "Arunachal Pradesh",
        boundary_path: "/geojson/states/arunachal-pradesh.geojson",
        longitude: 94.7278,
        latitude: 28.218,
        short_name: Some("Arunachal"),
    },
    StateInfo {
        name: "Mizoram",
        boundary_path: "/geojson/states/mizoram.geojson",
        longitude: 92.9376,
        latitude: 23.1645,
        short_name: None,
    },
    StateInfo {
        name: "Sikkim",
        boundary_path: "/geojson/states/sikkim.geojson",
        longitude: 88.5122,
        latitude: 27.533,
        short_name: None,
    },
    StateInfo {
        name: "Dadra and Nagar Haveli and Daman and Diu",
        boundary_path: "/geojson/states/dadra-daman-diu.geojson",
        longitude: 72.8397,
        latitude: 20.1809,
        short_name: Some("DNH & DD"),
    },
    StateInfo {
        name: "Chandigarh",
        boundary_path: "/geojson/states/chandigarh.geojson",
        longitude: 76.7794,
        latitude: 30.7333,
        short_name: None,
    },
    StateInfo {
        name: "Puducherry",
        boundary_path: "/geojson/states/puducherry.geojson",
        longitude: 79.8083,
        latitude: 11.9416,
        short_name: None,
    },
    StateInfo {
        name: "Andaman and Nicobar Islands",
        boundary_path: "/geojson/states/andaman-and-nicobar-islands.geojson",
        longitude: 92.6586,
        latitude: 11.7401,
        short_name: Some("Andaman & Nicobar"),
    },
    StateInfo {
        name: "Lakshadweep",
        boundary_path: "/geojson/states/lakshadweep.geojson",
        longitude: 72.6369,
        latitude: 10.328,
        short_name: None,
    },
    StateInfo {
        name: "Madhya Pradesh",
        boundary_path: "/geojson/states/madhya-pradesh.geojson",
        longitude: 78.6569,
        latitude: 22.9734,
        short_name: Some("M.P."),
    },
    StateInfo {
        name: "Delhi",
        boundary_path: "/geojson/states/delhi.geojson",
        longitude: 77.1025,
        latitude: 28.7041,
        short_name: None,
    },
    StateInfo {
        name: "Jammu and Kashmir",
        boundary_path: "/geojson/states/jammu-and-kashmir.geojson",
        longitude: 74.7973,
        latitude: 33.7782,
        short_name: Some("J&K"),
    },
    StateInfo {
        name: "Ladakh",
        boundary_path: "/geojson/states/ladakh.geojson",
        longitude: 77.5619,
        latitude: 34.1526,
        short_name: None,
    },
];

/// Major cities and historical regions mapped to their present-day state
pub static CITY_ALIASES: &[(&str, &str)] = &[
    ("lucknow", "Uttar Pradesh"),
    ("mumbai", "Maharashtra"),
    ("bengaluru", "Karnataka"),
    ("bangalore", "Karnataka"),
    ("chennai", "Tamil Nadu"),
    ("kolkata", "West Bengal"),
    ("calcutta", "West Bengal"),
    ("ahmedabad", "Gujarat"),
    ("jaipur", "Rajasthan"),
    ("patna", "Bihar"),
    ("hyderabad", "Telangana"),
    ("bhubaneswar", "Odisha"),
    ("chandigarh", "Punjab"),
    ("dehradun", "Uttarakhand"),
    ("shimla", "Himachal Pradesh"),
    ("thiruvananthapuram", "Kerala"),
    ("trivandrum", "Kerala"),
    ("guwahati", "Assam"),
    ("ranchi", "Jharkhand"),
    ("raipur", "Chhattisgarh"),
    ("panaji", "Goa"),
    ("imphal", "Manipur"),
    ("kohima", "Nagaland"),
    ("shillong", "Meghalaya"),
    ("agartala", "Tripura"),
    ("aizawl", "Mizoram"),
    ("gangtok", "Sikkim"),
    ("itanagar", "Arunachal Pradesh"),
    ("awadh", "Uttar Pradesh"),
    ("mysore", "Karnataka"),
    ("vizag", "Andhra Pradesh"),
    ("visakhapatnam", "Andhra Pradesh"),
    ("pune", "Maharashtra"),
    ("nagpur", "Maharashtra"),
    ("coimbatore", "Tamil Nadu"),
    ("madurai", "Tamil Nadu"),
    ("kochi", "Kerala"),
    ("cochin", "Kerala"),
    ("varanasi", "Uttar Pradesh"),
    ("agra", "Uttar Pradesh"),
    ("amritsar", "Punjab"),
    ("jodhpur", "Rajasthan"),
    ("udaipur", "Rajasthan"),
    ("surat", "Gujarat"),
    ("vadodara", "Gujarat"),
];

#[inline]
pub fn state_info(name: &str) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.name == name)
}

#[inline]
pub fn is_known_state(name: &str) -> bool {
    state_info(name).is_some()
}

/// Case-insensitive lookup by canonical name, short name or city alias
#[inline]
pub fn find_state(query: &str) -> Option<&'static StateInfo> {
    let needle = query.trim().to_lowercase();

    STATES
        .iter()
        .find(|s| {
            s.name.to_lowercase() == needle
                || s.short_name.is_some_and(|short| short.to_lowercase() == needle)
        })
        .or_else(|| {
            CITY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == needle)
                .and_then(|(_, state)| state_info(state))
        })
}

/// States mentioned in `text`, by canonical name or city alias.
///
/// Matching is a case-insensitive substring test with no word boundaries, so
/// a name embedded in a longer word still counts. Each state appears once:
/// canonical-name hits first in table order, then alias-only hits in alias
/// table order.
#[inline]
pub fn detect_states(text: &str) -> Vec<&'static str> {
    let haystack = text.to_lowercase();

    let mut detected: Vec<&'static str> = STATES
        .iter()
        .filter(|s| haystack.contains(&s.name.to_lowercase()))
        .map(|s| s.name)
        .collect();

    for (alias, state) in CITY_ALIASES {
        if haystack.contains(alias) && !detected.contains(state) {
            detected.push(*state);
        }
    }

    detected
}

/// Sidebar facts for one state, grouped by subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateFacts {
    pub history: Vec<String>,
    pub economy: Vec<String>,
    pub geography: Vec<String>,
    pub science: Vec<String>,
    pub concepts: Vec<String>,
}

impl StateFacts {
    /// Non-empty sections with their headings, in display order
    #[inline]
    pub fn sections(&self) -> Vec<(&'static str, &[String])> {
        [
            ("History", self.history.as_slice()),
            ("Economy", self.economy.as_slice()),
            ("Geography", self.geography.as_slice()),
            ("Science", self.science.as_slice()),
            ("Concepts", self.concepts.as_slice()),
        ]
        .into_iter()
        .filter(|(_, facts)| !facts.is_empty())
        .collect()
    }
}

const STATE_FACTS_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/state_facts.json"));

static STATE_FACTS: LazyLock<BTreeMap<String, StateFacts>> = LazyLock::new(|| {
    serde_json::from_str(STATE_FACTS_JSON).unwrap_or_else(|e| {
        error!("Bundled state facts are unreadable: {}", e);
        BTreeMap::new()
    })
});

#[inline]
pub fn state_facts(name: &str) -> Option<&'static StateFacts> {
    STATE_FACTS.get(name)
}
