//! Species shown in the gallery when no custom list is loaded.

/// Binomial names of the default gallery, in display order.
pub const DEFAULT_SPECIES: &[&str] = &[
    "Canis lupus familiaris",
    "Felis catus",
    "Pica pica",
    "Podarcis muralis",
    "Quercus robur",
    "Prunus avium",
    "Poa pratensis",
    "Taraxacum officinale",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_species() {
        assert_eq!(DEFAULT_SPECIES.len(), 8);
        assert_eq!(DEFAULT_SPECIES[2], "Pica pica");
    }
}
