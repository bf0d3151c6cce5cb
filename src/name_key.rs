use unicode_normalization::UnicodeNormalization;

const GENERATIONAL_SUFFIXES: &[&str] = &["iii", "ii", "iv", "jr", "sr"];

/// Join key shared by every source: lower-cased ASCII alphanumerics with a trailing
/// generational suffix removed. Two names with the same key are the same player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(normalize(name))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn normalize(name: &str) -> String {
    let mut out: String = name
        .nfkd()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect();

    // Repeat so that "Jr. Jr." and a second pass over an already-normalized key agree.
    while let Some(stripped) = strip_suffix(&out) {
        out.truncate(stripped);
    }
    out
}

fn strip_suffix(key: &str) -> Option<usize> {
    GENERATIONAL_SUFFIXES.iter().find_map(|suffix| {
        let rest = key.strip_suffix(suffix)?;
        (!rest.is_empty()).then_some(rest.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ignores_case_punctuation_and_suffix() {
        let expected = "lebronjames";
        assert_eq!(normalize("LeBron James"), expected);
        assert_eq!(normalize("lebron-james"), expected);
        assert_eq!(normalize("LEBRON JAMES JR."), expected);
    }

    #[test]
    fn normalize_strips_accents() {
        assert_eq!(normalize("Nikola Jokić"), "nikolajokic");
        assert_eq!(normalize("Luka Dončić"), normalize("Luka Doncic"));
        assert_eq!(normalize("Dennis Schröder"), "dennisschroder");
    }

    #[test]
    fn normalize_strips_roman_suffixes() {
        assert_eq!(normalize("Trey Murphy III"), "treymurphy");
        assert_eq!(normalize("Gary Trent Jr."), "garytrent");
        assert_eq!(normalize("Marvin Bagley III"), normalize("Marvin Bagley"));
        assert_eq!(normalize("Robert Williams IV"), "robertwilliams");
        assert_eq!(normalize("Larry Nance Sr"), "larrynance");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "De'Aaron Fox",
            "Kelly Oubre Jr.",
            "Jr. Jr.",
            "Jr",
            "Tim Hardaway Jr Jr",
            "O.G. Anunoby",
            "",
            "Šarūnas Jasikevičius",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn suffix_alone_is_kept() {
        assert_eq!(normalize("Jr."), "jr");
        assert_eq!(normalize("II"), "ii");
    }

    #[test]
    fn name_key_equality_follows_normalization() {
        assert_eq!(NameKey::new("P.J. Washington"), NameKey::new("PJ Washington"));
        assert_ne!(NameKey::new("Jalen Williams"), NameKey::new("Jaylin Williams"));
        assert_eq!(normalize("Shai Gilgeous-Alexander"), "shaigilgeousalexander");
    }
}
