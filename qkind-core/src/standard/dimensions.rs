//! SI base dimensions.

use once_cell::sync::Lazy;

use crate::dimension::Dimension;

pub static LENGTH: Lazy<Dimension> = Lazy::new(|| Dimension::base("L", "length"));
pub static MASS: Lazy<Dimension> = Lazy::new(|| Dimension::base("M", "mass"));
pub static TIME: Lazy<Dimension> = Lazy::new(|| Dimension::base("T", "time"));
pub static ELECTRIC_CURRENT: Lazy<Dimension> = Lazy::new(|| Dimension::base("I", "electric current"));
pub static TEMPERATURE: Lazy<Dimension> = Lazy::new(|| Dimension::base("Θ", "thermodynamic temperature"));
pub static AMOUNT_OF_SUBSTANCE: Lazy<Dimension> = Lazy::new(|| Dimension::base("N", "amount of substance"));
pub static LUMINOUS_INTENSITY: Lazy<Dimension> = Lazy::new(|| Dimension::base("J", "luminous intensity"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_dimensions_use_the_fast_path() {
        for dimension in [
            &*LENGTH,
            &*MASS,
            &*TIME,
            &*ELECTRIC_CURRENT,
            &*TEMPERATURE,
            &*AMOUNT_OF_SUBSTANCE,
            &*LUMINOUS_INTENSITY,
        ] {
            assert!(dimension.factor_vector().is_some(), "{dimension}");
        }
    }
}
