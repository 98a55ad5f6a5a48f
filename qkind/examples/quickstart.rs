//! Minimal end-to-end example: infer kinds for products and quotients, then convert the results.

use qkind::{kinds, units, Measurement, Quantity};

fn main() {
    let force = Quantity::of(100.0, &kinds::FORCE);
    let length = Quantity::new(Measurement::new(200.0, units::CENTIMETRE.clone()), &kinds::LENGTH).unwrap();
    let work = &force * &length;
    assert_eq!(work.kind(), &*kinds::ENERGY);
    println!("{work}");

    let joules = work.convert_to(&units::JOULE).unwrap();
    assert!((joules.value() - 200.0).abs() < 1e-9);
    println!("= {joules}");

    let speed = Quantity::of(1.5, &kinds::LENGTH) / Quantity::of(1.0, &kinds::TIME);
    assert_eq!(speed.kind(), &*kinds::VELOCITY);
    println!("{speed}");

    let boiling = Quantity::new(Measurement::new(100.0, units::CELSIUS.clone()), &kinds::ABSOLUTE_TEMPERATURE).unwrap();
    let freezing = Quantity::new(Measurement::new(32.0, units::FAHRENHEIT.clone()), &kinds::ABSOLUTE_TEMPERATURE).unwrap();
    let span = &boiling - &freezing;
    assert_eq!(span.kind(), &*kinds::TEMPERATURE_DELTA);
    assert!((span.value() - 100.0).abs() < 1e-9);
    println!("{boiling} - {freezing} = {span}");
}
