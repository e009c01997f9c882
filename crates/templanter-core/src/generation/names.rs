//! Name generation for walk-in hires

use rand::Rng;

/// Random "Given Family" name.
pub fn generate_name(rng: &mut impl Rng) -> String {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
    format!("{given} {family}")
}

static GIVEN_NAMES: &[&str] = &[
    "Ana", "Bea", "Chidi", "Dewi", "Emil", "Farah", "Gus", "Hana", "Ivo", "Jun", "Kofi", "Lena",
    "Mateo", "Nia", "Oskar", "Pia", "Quinn", "Rosa", "Sami", "Tove", "Umar", "Vera", "Wren",
    "Yara", "Zeke",
];

static FAMILY_NAMES: &[&str] = &[
    "Abara", "Berg", "Castillo", "Dalton", "Eze", "Fischer", "Gupta", "Holm", "Ito", "Jovanovic",
    "Keane", "Lindqvist", "Moreau", "Novak", "Okafor", "Park", "Quispe", "Reyes", "Sato",
    "Tran", "Urquhart", "Varga", "Weiss", "Yilmaz", "Zamora",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = generate_name(&mut rng);
        let mut parts = name.split(' ');
        assert!(parts.next().is_some_and(|g| GIVEN_NAMES.contains(&g)));
        assert!(parts.next().is_some_and(|f| FAMILY_NAMES.contains(&f)));
    }

    #[test]
    fn test_name_variety() {
        let mut rng = StdRng::seed_from_u64(11);
        let names: std::collections::HashSet<String> =
            (0..100).map(|_| generate_name(&mut rng)).collect();
        assert!(names.len() > 50);
    }
}
