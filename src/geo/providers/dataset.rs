//! Embedded reference data backing the static tier.

pub struct StaticCountry {
    pub code: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
    pub calling_code: &'static str,
    pub capital: &'static str,
    pub region: &'static str,
}

pub struct StaticCity {
    pub country: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
    pub postal_codes: &'static [&'static str],
}

macro_rules! country {
    ($code:literal, $name:literal, $cur:literal, $cc:literal, $cap:literal, $reg:literal) => {
        StaticCountry {
            code: $code,
            name: $name,
            currency: $cur,
            calling_code: $cc,
            capital: $cap,
            region: $reg,
        }
    };
}

macro_rules! city {
    ($cc:literal, $name:literal, $reg:literal, $pop:literal, $lat:literal, $lng:literal, [$($pc:literal),*]) => {
        StaticCity {
            country: $cc,
            name: $name,
            region: $reg,
            population: $pop,
            lat: $lat,
            lng: $lng,
            postal_codes: &[$($pc),*],
        }
    };
}

pub static COUNTRIES: &[StaticCountry] = &[
    country!("AR", "Argentina", "ARS", "+54", "Buenos Aires", "Americas"),
    country!("AT", "Austria", "EUR", "+43", "Vienna", "Europe"),
    country!("AU", "Australia", "AUD", "+61", "Canberra", "Oceania"),
    country!("BE", "Belgium", "EUR", "+32", "Brussels", "Europe"),
    country!("BR", "Brazil", "BRL", "+55", "Brasília", "Americas"),
    country!("CA", "Canada", "CAD", "+1", "Ottawa", "Americas"),
    country!("CH", "Switzerland", "CHF", "+41", "Bern", "Europe"),
    country!("CN", "China", "CNY", "+86", "Beijing", "Asia"),
    country!("DE", "Germany", "EUR", "+49", "Berlin", "Europe"),
    country!("DK", "Denmark", "DKK", "+45", "Copenhagen", "Europe"),
    country!("ES", "Spain", "EUR", "+34", "Madrid", "Europe"),
    country!("FR", "France", "EUR", "+33", "Paris", "Europe"),
    country!("GB", "United Kingdom", "GBP", "+44", "London", "Europe"),
    country!("IE", "Ireland", "EUR", "+353", "Dublin", "Europe"),
    country!("IN", "India", "INR", "+91", "New Delhi", "Asia"),
    country!("IT", "Italy", "EUR", "+39", "Rome", "Europe"),
    country!("JP", "Japan", "JPY", "+81", "Tokyo", "Asia"),
    country!("LU", "Luxembourg", "EUR", "+352", "Luxembourg", "Europe"),
    country!("MA", "Morocco", "MAD", "+212", "Rabat", "Africa"),
    country!("MX", "Mexico", "MXN", "+52", "Mexico City", "Americas"),
    country!("NL", "Netherlands", "EUR", "+31", "Amsterdam", "Europe"),
    country!("NO", "Norway", "NOK", "+47", "Oslo", "Europe"),
    country!("PL", "Poland", "PLN", "+48", "Warsaw", "Europe"),
    country!("PT", "Portugal", "EUR", "+351", "Lisbon", "Europe"),
    country!("SE", "Sweden", "SEK", "+46", "Stockholm", "Europe"),
    country!("SN", "Senegal", "XOF", "+221", "Dakar", "Africa"),
    country!("US", "United States", "USD", "+1", "Washington, D.C.", "Americas"),
];

pub static CITIES: &[StaticCity] = &[
    city!("FR", "Paris", "Île-de-France", 2_133_111, 48.8566, 2.3522, ["75001", "75002", "75003", "75004", "75005", "75006", "75007", "75008"]),
    city!("FR", "Marseille", "Provence-Alpes-Côte d'Azur", 870_321, 43.2965, 5.3698, ["13001", "13002", "13003", "13004"]),
    city!("FR", "Lyon", "Auvergne-Rhône-Alpes", 522_250, 45.7640, 4.8357, ["69001", "69002", "69003"]),
    city!("FR", "Toulouse", "Occitanie", 493_465, 43.6047, 1.4442, ["31000", "31100", "31200"]),
    city!("FR", "Nice", "Provence-Alpes-Côte d'Azur", 342_669, 43.7102, 7.2620, ["06000", "06100", "06200"]),
    city!("FR", "Nantes", "Pays de la Loire", 320_732, 47.2184, -1.5536, ["44000", "44100", "44200"]),
    city!("FR", "Pau", "Nouvelle-Aquitaine", 75_665, 43.2951, -0.3708, ["64000"]),
    city!("DE", "Berlin", "Berlin", 3_664_088, 52.5200, 13.4050, ["10115", "10117", "10119"]),
    city!("DE", "Hamburg", "Hamburg", 1_852_478, 53.5511, 9.9937, ["20095", "20097", "20099"]),
    city!("DE", "München", "Bayern", 1_488_202, 48.1351, 11.5820, ["80331", "80333", "80335"]),
    city!("DE", "Köln", "Nordrhein-Westfalen", 1_083_498, 50.9375, 6.9603, ["50667", "50668"]),
    city!("DE", "Frankfurt am Main", "Hessen", 764_104, 50.1109, 8.6821, ["60311", "60313"]),
    city!("GB", "London", "England", 8_982_000, 51.5074, -0.1278, ["SW1A 1AA", "EC1A 1BB", "W1A 0AX"]),
    city!("GB", "Manchester", "England", 553_230, 53.4808, -2.2426, ["M1 1AE", "M2 3WQ"]),
    city!("GB", "Edinburgh", "Scotland", 527_620, 55.9533, -3.1883, ["EH1 1YZ", "EH2 2BY"]),
    city!("ES", "Madrid", "Comunidad de Madrid", 3_305_408, 40.4168, -3.7038, ["28001", "28002", "28003"]),
    city!("ES", "Barcelona", "Cataluña", 1_636_762, 41.3874, 2.1686, ["08001", "08002", "08003"]),
    city!("IT", "Roma", "Lazio", 2_872_800, 41.9028, 12.4964, ["00118", "00119", "00120"]),
    city!("IT", "Milano", "Lombardia", 1_396_059, 45.4642, 9.1900, ["20121", "20122", "20123"]),
    city!("NL", "Amsterdam", "Noord-Holland", 872_680, 52.3676, 4.9041, ["1011 AB", "1012 JS"]),
    city!("NL", "Rotterdam", "Zuid-Holland", 651_446, 51.9244, 4.4777, ["3011 AA", "3012 CL"]),
    city!("BE", "Bruxelles", "Bruxelles-Capitale", 185_103, 50.8503, 4.3517, ["1000", "1020"]),
    city!("BE", "Antwerpen", "Vlaanderen", 529_247, 51.2194, 4.4025, ["2000", "2018"]),
    city!("CH", "Zürich", "Zürich", 421_878, 47.3769, 8.5417, ["8001", "8002", "8003"]),
    city!("CH", "Genève", "Genève", 203_856, 46.2044, 6.1432, ["1201", "1202"]),
    city!("US", "New York", "New York", 8_336_817, 40.7128, -74.0060, ["10001", "10002", "10003"]),
    city!("US", "Los Angeles", "California", 3_979_576, 34.0522, -118.2437, ["90001", "90002"]),
    city!("US", "Chicago", "Illinois", 2_693_976, 41.8781, -87.6298, ["60601", "60602"]),
    city!("CA", "Toronto", "Ontario", 2_731_571, 43.6532, -79.3832, ["M5H 2N2", "M5V 3L9"]),
    city!("CA", "Montréal", "Québec", 1_704_694, 45.5017, -73.5673, ["H2Y 1C6", "H3B 1A7"]),
    city!("JP", "Tokyo", "Tokyo", 13_960_000, 35.6762, 139.6503, ["100-0001", "100-0005"]),
    city!("JP", "Osaka", "Osaka", 2_691_000, 34.6937, 135.5023, ["530-0001", "530-0003"]),
    city!("PT", "Lisboa", "Lisboa", 505_526, 38.7223, -9.1393, ["1100-148", "1200-109"]),
    city!("PT", "Porto", "Porto", 231_800, 41.1579, -8.6291, ["4000-322", "4050-011"]),
    city!("PL", "Warszawa", "Mazowieckie", 1_790_658, 52.2297, 21.0122, ["00-001", "00-002"]),
    city!("SE", "Stockholm", "Stockholm", 975_551, 59.3293, 18.0686, ["111 20", "111 21"]),
    city!("MA", "Casablanca", "Casablanca-Settat", 3_359_818, 33.5731, -7.5898, ["20000", "20250"]),
    city!("SN", "Dakar", "Dakar", 1_146_053, 14.7167, -17.4677, ["10000", "10200"]),
];

/// Look up a country by code (case-insensitive).
pub fn country(code: &str) -> Option<&'static StaticCountry> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Calling code for a country, used to back-fill remote sources that omit it.
pub fn calling_code(code: &str) -> Option<&'static str> {
    country(code).map(|c| c.calling_code)
}
